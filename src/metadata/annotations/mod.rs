//! Annotation reconstruction.
//!
//! Annotations reach the library as nested visitor callbacks. The outline collector
//! records them as flat [`AnnotationRecord`]s; the lazy phase that owns the annotated
//! element replays each record into a builder, which resolves referenced types and
//! yields an [`AnnotationValue`].
//!
//! # Element Values
//!
//! Every element value becomes one [`AnnotationArgument`]:
//! - **Scalars** - `boolean`, `byte`, `char`, `short`, `int`, `long`, `float`, `double`, `String`
//! - **Enum constants** - enum type plus constant name
//! - **Class literals** - a [`crate::metadata::typesystem::TypeId`], `void.class` included
//! - **Arrays** and **nested annotations** - recursively
//!
//! # Examples
//!
//! ```rust
//! use classscope::{AnnotationDefinition, ClassDefinition, Library, MemoryProvider};
//!
//! let provider = MemoryProvider::with_core_classes().define(
//!     ClassDefinition::class("com/example/Legacy")
//!         .annotate(AnnotationDefinition::new("Ljava/lang/Deprecated;").argument("since", "9")),
//! );
//! let library = Library::new(provider);
//!
//! let legacy = library.get_type("com/example/Legacy")?;
//! let annotations = library.annotations(legacy)?;
//! assert_eq!(annotations[0].argument("since").and_then(|v| v.as_str()), Some("9"));
//! # Ok::<(), classscope::Error>(())
//! ```

mod builder;
mod events;
mod types;

pub use builder::{
    resolve_annotation, resolve_default_value, AnnotationBuilder, ArrayBuilder,
    DefaultValueBuilder, Slot,
};
pub use events::*;
pub use types::*;
