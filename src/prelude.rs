//! # classscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the classscope library. Import this module to get quick access to the essential
//! types for reflecting over compiled JVM classes.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all classscope operations
pub use crate::Error;

/// The result type used throughout classscope
pub use crate::Result;

/// Options controlling how unresolvable metadata is handled
pub use crate::LibraryConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Registry of all types, entry point for every lookup and query
pub use crate::Library;

/// Low-level cursor over signature text
pub use crate::Parser;

// ================================================================================================
// Decoder Boundary
// ================================================================================================

/// Callback traits a class-file decoder drives
pub use crate::metadata::classfile::{
    AnnotationVisitor, ClassProvider, ClassVisitor, MemberVisitor,
};

/// In-memory class definitions and the provider replaying them
pub use crate::metadata::classfile::{
    core_classes, AnnotationDefinition, ClassDefinition, ElementDefinition, FieldDefinition,
    MemoryProvider, MethodDefinition,
};

// ================================================================================================
// Type System
// ================================================================================================

/// Core type system components
pub use crate::metadata::typesystem::{
    Bindings, GenericOwner, LoadPhase, Scope, TypeFlavor, TypeId, TypeInfo, TypeKind,
    WildcardKind, OBJECT_CLASS, STRING_CLASS,
};

/// Primitive types, numeric tags and constants
pub use crate::metadata::typesystem::{ConstantValue, NumericTypeKind, PrimitiveKind};

// ================================================================================================
// Members and Annotations
// ================================================================================================

/// Resolved fields, methods and parameters
pub use crate::metadata::members::{FieldInfo, MethodInfo, ParameterInfo};

/// Reconstructed annotations
pub use crate::metadata::annotations::{AnnotationArgument, AnnotationValue};

/// Access flags of classes, members and parameters
pub use crate::metadata::flags::AccessFlags;

// ================================================================================================
// Signatures
// ================================================================================================

/// Parsed signature structures
pub use crate::metadata::signatures::{
    ClassSignature, ClassTypeSignature, FormalTypeParameter, MethodDescriptor, MethodSignature,
    TypeSignature,
};

/// Signature and descriptor parsing entry points
pub use crate::metadata::signatures::{
    parse_class_signature, parse_field_descriptor, parse_method_descriptor,
    parse_method_signature, parse_type_signature,
};

// ================================================================================================
// Diagnostics
// ================================================================================================

/// Non-fatal problems collected while resolving members
pub use crate::metadata::diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics,
};
