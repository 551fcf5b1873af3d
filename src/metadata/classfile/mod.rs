//! The boundary between class-file decoding and the type system.
//!
//! Decoding class-file bytes is not part of this crate. A decoder implements
//! [`ClassProvider`] and reports each class as a sequence of visitor callbacks. The
//! library answers with an [`OutlineCollector`], which records names, descriptors,
//! signature strings and annotation events without resolving anything.
//!
//! # Key Components
//!
//! - [`ClassProvider`], [`ClassVisitor`], [`MemberVisitor`], [`AnnotationVisitor`] - Callback traits
//! - [`OutlineCollector`], [`RawClass`] - Unresolved outline of one class
//! - [`MemoryProvider`], [`ClassDefinition`] - Provider over in-memory definitions
//! - [`core_classes`] - Definitions of the platform classes the type system depends on

mod memory;
mod outline;
mod platform;
mod visitor;

pub use memory::*;
pub use outline::*;
pub use platform::core_classes;
pub use visitor::*;
