//! Lexical scopes for type variable resolution.
//!
//! A [`Scope`] is a persistent chain of immutable frames. Each frame maps the names of
//! formal type parameters declared at one level (a class, an inner class, a generic
//! method) to their [`TypeId`]. Entering a level produces a new chain that shares the
//! parent; leaving is simply going back to the parent, so push/pop always pair up.
//!
//! ```rust
//! use classscope::metadata::typesystem::{Scope, TypeId};
//!
//! let mut class_frame = Scope::root().enter();
//! class_frame.declare("T", TypeId::new(10))?;
//! let class_scope = class_frame.build();
//!
//! let mut method_frame = class_scope.enter();
//! method_frame.declare("T", TypeId::new(11))?;
//! let method_scope = method_frame.build();
//!
//! assert_eq!(method_scope.resolve("T")?, TypeId::new(11));
//! assert_eq!(method_scope.leave().resolve("T")?, TypeId::new(10));
//! # Ok::<(), classscope::Error>(())
//! ```

use std::sync::Arc;

use crate::{metadata::typesystem::TypeId, Error, Result};

struct ScopeFrame {
    bindings: Vec<(String, TypeId)>,
    parent: Scope,
}

/// A chain of type variable frames, innermost first
#[derive(Clone, Default)]
pub struct Scope(Option<Arc<ScopeFrame>>);

impl Scope {
    /// The empty scope, with no bindings
    #[must_use]
    pub fn root() -> Self {
        Scope(None)
    }

    /// Start a new frame whose parent is this scope
    #[must_use]
    pub fn enter(&self) -> ScopeFrameBuilder {
        ScopeFrameBuilder {
            bindings: Vec::new(),
            parent: self.clone(),
        }
    }

    /// The scope without its innermost frame
    #[must_use]
    pub fn leave(&self) -> Scope {
        match &self.0 {
            Some(frame) => frame.parent.clone(),
            None => Scope::root(),
        }
    }

    /// Number of frames in the chain
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(frame) = &current.0 {
            depth += 1;
            current = &frame.parent;
        }
        depth
    }

    /// Returns true if no frame was entered
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_none()
    }

    /// Find the innermost binding for `name`
    ///
    /// # Errors
    /// Returns [`Error::UnboundTypeVariable`] if no frame declares `name`
    pub fn resolve(&self, name: &str) -> Result<TypeId> {
        self.lookup(name).ok_or_else(|| Error::UnboundTypeVariable {
            name: name.to_string(),
        })
    }

    /// Find the innermost binding for `name`, if any
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        let mut current = self;
        while let Some(frame) = &current.0 {
            if let Some((_, id)) = frame.bindings.iter().find(|(bound, _)| bound == name) {
                return Some(*id);
            }
            current = &frame.parent;
        }
        None
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        let mut current = self;
        while let Some(frame) = &current.0 {
            list.entry(&frame.bindings);
            current = &frame.parent;
        }
        list.finish()
    }
}

/// Collects the declarations of one frame before it becomes visible
pub struct ScopeFrameBuilder {
    bindings: Vec<(String, TypeId)>,
    parent: Scope,
}

impl ScopeFrameBuilder {
    /// Declare a type variable in the frame
    ///
    /// # Errors
    /// Returns an error if `name` is already declared in this frame
    pub fn declare(&mut self, name: &str, id: TypeId) -> Result<()> {
        if self.bindings.iter().any(|(bound, _)| bound == name) {
            return Err(malformed_error!(
                "Type variable '{}' declared twice in one scope",
                name
            ));
        }

        self.bindings.push((name.to_string(), id));
        Ok(())
    }

    /// Finish the frame and return the scope that contains it
    #[must_use]
    pub fn build(self) -> Scope {
        Scope(Some(Arc::new(ScopeFrame {
            bindings: self.bindings,
            parent: self.parent,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innermost_binding_wins() {
        let mut outer = Scope::root().enter();
        outer.declare("T", TypeId::new(1)).unwrap();
        outer.declare("U", TypeId::new(2)).unwrap();
        let outer = outer.build();

        let mut inner = outer.enter();
        inner.declare("T", TypeId::new(3)).unwrap();
        let inner = inner.build();

        assert_eq!(inner.resolve("T").unwrap(), TypeId::new(3));
        assert_eq!(inner.resolve("U").unwrap(), TypeId::new(2));
        assert_eq!(inner.depth(), 2);
        assert_eq!(inner.leave().resolve("T").unwrap(), TypeId::new(1));
        assert_eq!(inner.leave().depth(), 1);
        assert!(inner.leave().leave().is_root());
    }

    #[test]
    fn test_unbound_variable() {
        let scope = Scope::root().enter().build();
        match scope.resolve("X") {
            Err(Error::UnboundTypeVariable { name }) => assert_eq!(name, "X"),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(Scope::root().leave().is_root());
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut frame = Scope::root().enter();
        frame.declare("T", TypeId::new(1)).unwrap();
        assert!(frame.declare("T", TypeId::new(2)).is_err());
    }

    #[test]
    fn test_sibling_frames_are_independent() {
        let mut class_frame = Scope::root().enter();
        class_frame.declare("T", TypeId::new(1)).unwrap();
        let class_scope = class_frame.build();

        let mut first = class_scope.enter();
        first.declare("M", TypeId::new(2)).unwrap();
        let first = first.build();

        let second = class_scope.enter().build();
        assert!(first.lookup("M").is_some());
        assert!(second.lookup("M").is_none());
        assert_eq!(second.resolve("T").unwrap(), TypeId::new(1));
    }
}
