//! Text decoding primitives shared by the metadata grammars.
//!
//! Class metadata arrives from the decoder already split into strings (names,
//! descriptors, generic signatures). This module holds the cursor those strings are
//! parsed with.
//!
//! # Key Components
//!
//! - [`crate::file::parser::Parser`] - Cursor over signature and descriptor text

pub mod parser;
