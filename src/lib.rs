// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # classscope
//!
//! Lazy reflection over compiled JVM class metadata, built to sit between a class-file
//! decoder and a compiler's semantic checker.
//!
//! `classscope` reconstructs a semantic type model (classes, interfaces, fields,
//! methods, generic parameters and annotations) from the callbacks a class-file
//! decoder emits. Nothing is resolved before it is asked for: looking a class up
//! decodes only its outline, and supertypes, members and annotations are resolved in
//! separate lazy phases on first use.
//!
//! ## Features
//!
//! - **Generic signatures** - Full parser for class, method and type signatures, plus descriptors
//! - **Scopes** - Type variables of classes, inner classes and generic methods resolve lexically
//! - **Raw types** - References to generic classes from legacy code are erased consistently
//! - **Substitution** - `List<String>` exposes `get` returning `String`
//! - **Annotations** - Element values, arrays, enum constants, class literals and defaults
//! - **Thread safe** - A [`Library`] can be shared between threads; lookups never block
//!
//! ## Quick Start
//!
//! ```rust
//! use classscope::prelude::*;
//!
//! let library = Library::new(MemoryProvider::with_core_classes());
//!
//! let list = library.get_type("java/util/List")?;
//! let string = library.string_type()?;
//! let list_of_string = library.get_generic_type(list, &[string], None)?;
//!
//! let get = library
//!     .methods(list_of_string)?
//!     .iter()
//!     .find(|method| method.name == "get")
//!     .expect("List declares get");
//! assert_eq!(get.return_type, string);
//! # Ok::<(), classscope::Error>(())
//! ```
//!
//! ## Providing classes
//!
//! The library never reads class files itself. A decoder implements
//! [`metadata::classfile::ClassProvider`] and replays one class at a time into the
//! visitor it is handed. For tests and tools, [`MemoryProvider`] replays
//! [`ClassDefinition`]s built in code.
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - Decoder boundary, signatures, type system, members and annotations
//! - [`config`] - [`LibraryConfig`]
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]. Failures inside a lazy phase come
//! back as [`Error::Resolution`] naming the class, member and phase; the phase can be
//! retried and nothing partial is kept. Fields whose type cannot be resolved are, by
//! default, skipped and reported through [`metadata::diagnostics::Diagnostics`].

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Configuration of a [`Library`]
pub mod config;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the classscope library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use classscope::prelude::*;
///
/// let library = Library::new(MemoryProvider::with_core_classes());
/// let integer = library.get_type("java/lang/Integer")?;
/// assert_eq!(library.numeric_kind(integer)?, NumericTypeKind::Int);
/// # Ok::<(), classscope::Error>(())
/// ```
pub mod prelude;

/// Reflection over compiled class metadata
///
/// # Key Components
///
/// ## Decoder boundary
/// - [`metadata::classfile`] - Visitor traits, outline collection, [`MemoryProvider`]
///
/// ## Grammar
/// - [`metadata::signatures`] - Generic signatures and descriptors
///
/// ## Type System
/// - [`metadata::typesystem`] - [`Library`], types, lazy phases and scopes
/// - [`metadata::members`] - Fields, methods and parameters
/// - [`metadata::annotations`] - Annotation values and builders
///
/// # Examples
///
/// ```rust
/// use classscope::{Library, MemoryProvider};
///
/// let library = Library::new(MemoryProvider::with_core_classes());
/// let string = library.get_type("java/lang/String")?;
///
/// for interface in library.interfaces(string)? {
///     println!("{}", library.info(interface)?.name);
/// }
/// # Ok::<(), classscope::Error>(())
/// ```
pub mod metadata;

/// `classscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use classscope::{Library, Result};
///
/// fn superclass_name(library: &Library, name: &str) -> Result<Option<String>> {
///     let id = library.get_type(name)?;
///     match library.base_type(id)? {
///         Some(base) => Ok(Some(library.info(base)?.name.clone())),
///         None => Ok(None),
///     }
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `classscope` Error type
///
/// The main error type for all operations in this crate. See [`error::Error`] for the
/// individual categories.
///
/// # Examples
///
/// ```rust
/// use classscope::{Error, Library, MemoryProvider};
///
/// let library = Library::new(MemoryProvider::new());
/// match library.get_type("java/lang/Object") {
///     Ok(_) => println!("Loaded"),
///     Err(Error::TypeNotFound(name)) => println!("Missing class: {}", name),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// The type registry; see [`metadata::typesystem::Library`]
pub use metadata::typesystem::Library;

/// Library options; see [`config::LibraryConfig`]
pub use config::LibraryConfig;

/// In-memory class definitions; see [`metadata::classfile`]
pub use metadata::classfile::{
    AnnotationDefinition, ClassDefinition, FieldDefinition, MemoryProvider, MethodDefinition,
};

/// Cursor over signature text; see [`file::parser::Parser`]
pub use file::parser::Parser;
