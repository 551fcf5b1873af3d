//! JVM type system reconstructed from compiled class metadata.
//!
//! This module turns class outlines delivered by a
//! [`crate::metadata::classfile::ClassProvider`] into a graph of types: classes and
//! interfaces, type variables, generic instances, raw types, arrays and wildcards. All
//! types live in the arena of a [`Library`] and refer to each other by [`TypeId`].
//!
//! # Key Components
//!
//! - [`Library`]: Registry of all types; lookups, memoized constructors and queries
//! - [`TypeInfo`] / [`TypeKind`]: One arena entry and its shape
//! - [`LoadPhase`]: Lazy phases a class goes through
//! - [`Scope`]: Lexical scopes of type variables
//! - [`PrimitiveKind`] / [`NumericTypeKind`]: Primitive types and wrapper tags
//!
//! # Type System Features
//!
//! - **Lazy loading**: a lookup decodes only the outline; supertypes and members are
//!   resolved phase by phase when queried
//! - **Generics**: signatures with type variables, bounds, wildcards and inner classes
//!   of generic outer classes
//! - **Raw types**: references to generic classes from non-generic contexts are erased
//! - **Substitution**: generic instances expose substituted supertypes and members
//!
//! # Examples
//!
//! ```rust
//! use classscope::{Library, MemoryProvider};
//!
//! let library = Library::new(MemoryProvider::with_core_classes());
//! let list = library.get_type("java/util/ArrayList")?;
//!
//! let parameters = library.generic_arguments(list)?;
//! assert_eq!(library.info(parameters[0])?.name, "E");
//! for interface in library.interfaces(list)? {
//!     println!("implements {}", library.info(interface)?.name);
//! }
//! # Ok::<(), classscope::Error>(())
//! ```

mod base;
mod generics;
mod hierarchy;
mod library;
mod loader;
mod node;
mod primitives;
mod resolver;
mod scope;

pub use base::{GenericOwner, LoadPhase, TypeFlavor, TypeId, TypeInfo, TypeKind, WildcardKind};
pub use generics::Bindings;
pub use hierarchy::ARRAY_INTERFACES;
pub use library::{Library, OBJECT_CLASS, STRING_CLASS};
pub use node::{
    ArrayNode, ClassNode, GenericInstanceNode, GenericParameterNode, RawNode, WildcardNode,
};
pub use primitives::{ConstantValue, NumericTypeKind, PrimitiveKind};
pub use scope::{Scope, ScopeFrameBuilder};
