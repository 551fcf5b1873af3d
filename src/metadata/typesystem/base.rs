use std::fmt;

use strum::{Display, EnumDiscriminants};

use crate::metadata::typesystem::{
    node::{ArrayNode, ClassNode, GenericInstanceNode, GenericParameterNode, RawNode, WildcardNode},
    PrimitiveKind,
};

/// Index of a type in the [`crate::Library`] arena.
///
/// Ids are handed out in insertion order and stay valid for the lifetime of the
/// library that produced them. Using an id with another library is a logic error
/// that the library reports as [`crate::Error::TypeError`] when the index is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// Create an id from its raw index
    #[must_use]
    pub const fn new(index: u32) -> Self {
        TypeId(index)
    }

    /// The arena index this id refers to
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lazy phases of a [`ClassNode`], in their mandatory order.
///
/// A node always advances one phase at a time; asking for a later phase runs all the
/// earlier ones first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum LoadPhase {
    /// Only the raw outline is known
    #[strum(serialize = "outline")]
    Outline,
    /// Generic parameters, base type, interfaces and class annotations are resolved
    #[strum(serialize = "base types")]
    BaseResolved,
    /// Fields are resolved
    #[strum(serialize = "fields")]
    FieldsResolved,
    /// Methods are resolved
    #[strum(serialize = "methods")]
    MethodsResolved,
    /// Nested types are known
    #[strum(serialize = "nested types")]
    NestedResolved,
}

impl LoadPhase {
    /// The phase that follows this one, `None` for [`LoadPhase::NestedResolved`]
    #[must_use]
    pub fn next(self) -> Option<LoadPhase> {
        match self {
            LoadPhase::Outline => Some(LoadPhase::BaseResolved),
            LoadPhase::BaseResolved => Some(LoadPhase::FieldsResolved),
            LoadPhase::FieldsResolved => Some(LoadPhase::MethodsResolved),
            LoadPhase::MethodsResolved => Some(LoadPhase::NestedResolved),
            LoadPhase::NestedResolved => None,
        }
    }
}

/// Bound direction of a wildcard type argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum WildcardKind {
    /// `?`
    #[strum(serialize = "?")]
    Unbounded,
    /// `? extends Bound`
    #[strum(serialize = "? extends")]
    Extends,
    /// `? super Bound`
    #[strum(serialize = "? super")]
    Super,
}

/// Declaration site of a generic parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericOwner {
    /// A type parameter of a class or interface
    Type(TypeId),
    /// A type parameter of a generic method
    Method {
        /// Class declaring the method
        declaring_type: TypeId,
        /// Method name
        name: String,
        /// Method descriptor, to tell overloads apart
        descriptor: String,
    },
}

/// The different shapes a type can take.
///
/// The discriminant enum [`TypeFlavor`] is derived for cheap matching without access
/// to the payloads.
#[derive(Debug, EnumDiscriminants)]
#[strum_discriminants(
    name(TypeFlavor),
    derive(Display, Hash),
    doc = "The shape of a [`TypeKind`], without its payload"
)]
pub enum TypeKind {
    /// `boolean`, `int`, ..., `void`
    Primitive(PrimitiveKind),
    /// A class or interface loaded from the provider
    Class(ClassNode),
    /// A type variable
    GenericParameter(GenericParameterNode),
    /// A generic class applied to type arguments
    GenericInstance(GenericInstanceNode),
    /// The erasure of a generic class definition
    Raw(RawNode),
    /// An array type
    Array(ArrayNode),
    /// A wildcard type argument
    Wildcard(WildcardNode),
}

/// One entry of the [`crate::Library`] arena
#[derive(Debug)]
pub struct TypeInfo {
    /// Identity of this entry
    pub id: TypeId,
    /// Display name: binary name for classes (`java/util/List`), `List<String>`-style
    /// composite names for constructed types, the variable name for generic parameters
    pub name: String,
    /// Shape and payload
    pub kind: TypeKind,
}

impl TypeInfo {
    /// The shape of this type without its payload
    #[must_use]
    pub fn flavor(&self) -> TypeFlavor {
        TypeFlavor::from(&self.kind)
    }

    /// The class payload, if this is a class loaded from the provider
    #[must_use]
    pub fn as_class(&self) -> Option<&ClassNode> {
        match &self.kind {
            TypeKind::Class(node) => Some(node),
            _ => None,
        }
    }

    /// The generic parameter payload
    #[must_use]
    pub fn as_generic_parameter(&self) -> Option<&GenericParameterNode> {
        match &self.kind {
            TypeKind::GenericParameter(node) => Some(node),
            _ => None,
        }
    }

    /// The generic instance payload
    #[must_use]
    pub fn as_generic_instance(&self) -> Option<&GenericInstanceNode> {
        match &self.kind {
            TypeKind::GenericInstance(node) => Some(node),
            _ => None,
        }
    }

    /// The primitive kind, if this is a primitive
    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match &self.kind {
            TypeKind::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Element type of an array
    #[must_use]
    pub fn element_type(&self) -> Option<TypeId> {
        match &self.kind {
            TypeKind::Array(node) => Some(node.element),
            _ => None,
        }
    }

    /// Kind and bound of a wildcard
    #[must_use]
    pub fn wildcard(&self) -> Option<(WildcardKind, Option<TypeId>)> {
        match &self.kind {
            TypeKind::Wildcard(node) => Some((node.kind, node.bound)),
            _ => None,
        }
    }

    /// `true` for primitives, `void` included
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// `true` for array types
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }

    /// `true` for type variables
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.kind, TypeKind::GenericParameter(_))
    }

    /// `true` for the raw form of a generic class
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self.kind, TypeKind::Raw(_))
    }

    /// The class a constructed type is built on: itself for classes, the definition for
    /// generic instances and raw types, `None` otherwise
    #[must_use]
    pub fn definition(&self) -> Option<TypeId> {
        match &self.kind {
            TypeKind::Class(_) => Some(self.id),
            TypeKind::GenericInstance(node) => Some(node.definition),
            TypeKind::Raw(node) => Some(node.definition),
            _ => None,
        }
    }
}
