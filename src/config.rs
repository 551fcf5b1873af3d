//! Library configuration
//!
//! This module provides the options that control how a [`crate::Library`] reacts to
//! metadata it cannot fully resolve.

use crate::metadata::signatures::MAX_RECURSION_DEPTH;

/// Configuration for a [`crate::Library`]
///
/// The default is lenient: a field whose type cannot be resolved is skipped and
/// reported through [`crate::metadata::diagnostics::Diagnostics`]. Failures in base
/// types, methods and nested types are always fatal for the phase that hit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Make an unresolvable field abort the fields phase instead of skipping it
    pub strict_fields: bool,

    /// Maximum nesting depth accepted by the signature parser (default: 64)
    pub max_signature_depth: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            strict_fields: false,
            max_signature_depth: MAX_RECURSION_DEPTH,
        }
    }
}

impl LibraryConfig {
    /// Skip unresolvable fields and report them (the default)
    #[must_use]
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Treat every unresolvable member as fatal
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_fields: true,
            ..Self::default()
        }
    }

    /// Set [`LibraryConfig::strict_fields`]
    #[must_use]
    pub fn with_strict_fields(mut self, strict_fields: bool) -> Self {
        self.strict_fields = strict_fields;
        self
    }

    /// Set [`LibraryConfig::max_signature_depth`]
    #[must_use]
    pub fn with_max_signature_depth(mut self, depth: usize) -> Self {
        self.max_signature_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(!LibraryConfig::default().strict_fields);
        assert_eq!(LibraryConfig::lenient(), LibraryConfig::default());
        assert!(LibraryConfig::strict().strict_fields);
        assert_eq!(
            LibraryConfig::strict().max_signature_depth,
            MAX_RECURSION_DEPTH
        );
    }

    #[test]
    fn test_setters() {
        let config = LibraryConfig::default()
            .with_strict_fields(true)
            .with_max_signature_depth(8);
        assert!(config.strict_fields);
        assert_eq!(config.max_signature_depth, 8);
    }
}
