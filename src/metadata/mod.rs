//! Metadata reflection over compiled JVM classes.
//!
//! This module contains everything between the class-file decoder and the compiler's
//! semantic checker: the decoder boundary, the signature grammar, the type system and
//! the reconstructed annotations.
//!
//! # Key Components
//!
//! - [`classfile`] - Visitor traits a decoder drives, outline collection, in-memory provider
//! - [`signatures`] - Generic signature and descriptor parsing
//! - [`typesystem`] - The [`typesystem::Library`] and its lazily resolved types
//! - [`members`] - Resolved fields, methods and parameters
//! - [`annotations`] - Annotation values and the builders that rebuild them
//! - [`flags`] - Access flags of classes, members and parameters
//! - [`diagnostics`] - Non-fatal problems found during resolution
//!
//! # Examples
//!
//! ```rust
//! use classscope::{ClassDefinition, FieldDefinition, Library, MemoryProvider};
//!
//! let provider = MemoryProvider::with_core_classes().define(
//!     ClassDefinition::class("com/example/Names")
//!         .field(FieldDefinition::new("names", "Ljava/util/List;")
//!             .signature("Ljava/util/List<Ljava/lang/String;>;")),
//! );
//! let library = Library::new(provider);
//!
//! let names = library.get_type("com/example/Names")?;
//! let field = &library.fields(names)?[0];
//! assert_eq!(library.info(field.field_type)?.name, "java/util/List<java/lang/String>");
//! # Ok::<(), classscope::Error>(())
//! ```

/// Annotation values and their reconstruction from recorded callbacks
pub mod annotations;
/// The decoder boundary: visitor traits, outline collection and in-memory definitions
pub mod classfile;
/// Non-fatal problems collected while resolving members
pub mod diagnostics;
/// Access flags of classes, members and parameters
pub mod flags;
/// Resolved fields, methods and parameters
pub mod members;
/// Generic signature and descriptor grammar
pub mod signatures;
/// Types, their lazy phases and the library that owns them
pub mod typesystem;
