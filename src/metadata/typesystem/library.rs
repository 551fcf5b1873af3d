//! The type registry.
//!
//! [`Library`] owns every type the compiler has asked about. Types live in an
//! append-only arena and are addressed by [`TypeId`]; the arena is never compacted, so
//! an id stays valid for the lifetime of the library.
//!
//! # Indices
//!
//! - **Name index**: binary class names and primitive names, in a `SkipMap` so that
//!   package listings come out sorted
//! - **Memo tables**: one `DashMap` per constructed shape (generic instance, raw, array,
//!   wildcard), so that structurally equal types share one id
//!
//! # Thread Safety
//!
//! Lookups never block. Inserts (new classes and constructed types) are serialized by
//! a single mutex, which is never held while a lazy phase runs. Phase state is
//! per-node; see [`crate::metadata::typesystem::LoadPhase`].
//!
//! # Examples
//!
//! ```rust
//! use classscope::{Library, MemoryProvider};
//!
//! let library = Library::new(MemoryProvider::with_core_classes());
//! let list = library.get_type("java/util/List")?;
//! let string = library.string_type()?;
//!
//! let list_of_string = library.get_generic_type(list, &[string], None)?;
//! assert_eq!(library.get_generic_type(list, &[string], None)?, list_of_string);
//! assert_eq!(library.info(list_of_string)?.name, "java/util/List<java/lang/String>");
//! # Ok::<(), classscope::Error>(())
//! ```

use std::{
    ops::Bound,
    sync::{Arc, Mutex, MutexGuard},
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    config::LibraryConfig,
    metadata::{
        classfile::{ClassProvider, OutlineCollector},
        diagnostics::Diagnostics,
        signatures::{
            ClassSignature, MethodDescriptor, MethodSignature, SignatureParser, TypeSignature,
        },
        typesystem::{
            node::{
                ArrayNode, ClassNode, GenericInstanceNode, GenericParameterNode, RawNode,
                WildcardNode,
            },
            PrimitiveKind, Scope, TypeId, TypeInfo, TypeKind, WildcardKind,
        },
    },
    Error::{GenericArity, TypeError, TypeNotFound},
    Result,
};

/// Binary name of the root class
pub const OBJECT_CLASS: &str = "java/lang/Object";
/// Binary name of the string class
pub const STRING_CLASS: &str = "java/lang/String";

type GenericKey = (TypeId, Vec<TypeId>, Option<TypeId>);

/// Registry of all types known to a compilation.
///
/// Classes are pulled from a [`ClassProvider`] the first time their name is asked for;
/// only the outline is decoded at that point. Everything else (supertypes, members,
/// annotations) is resolved by lazy phases when first queried.
pub struct Library {
    provider: Box<dyn ClassProvider>,
    config: LibraryConfig,
    diagnostics: Arc<Diagnostics>,
    types: boxcar::Vec<TypeInfo>,
    by_name: SkipMap<String, TypeId>,
    generic_instances: DashMap<GenericKey, TypeId>,
    raw_types: DashMap<TypeId, TypeId>,
    array_types: DashMap<TypeId, TypeId>,
    wildcards: DashMap<(WildcardKind, TypeId), TypeId>,
    primitives: [TypeId; PrimitiveKind::COUNT],
    unbounded_wildcard: TypeId,
    insert_lock: Mutex<()>,
}

impl Library {
    /// Create a lenient library over `provider`
    ///
    /// ## Arguments
    /// * 'provider' - The source of class outlines
    pub fn new(provider: impl ClassProvider + 'static) -> Self {
        Self::with_config(provider, LibraryConfig::default())
    }

    /// Create a library with explicit configuration
    ///
    /// ## Arguments
    /// * 'provider' - The source of class outlines
    /// * 'config'   - Resolution options
    pub fn with_config(provider: impl ClassProvider + 'static, config: LibraryConfig) -> Self {
        let types = boxcar::Vec::new();
        let by_name = SkipMap::new();

        let mut primitives = [TypeId::new(0); PrimitiveKind::COUNT];
        for (slot, kind) in primitives.iter_mut().zip(PrimitiveKind::iter()) {
            let id = TypeId::new(types.count() as u32);
            types.push(TypeInfo {
                id,
                name: kind.to_string(),
                kind: TypeKind::Primitive(kind),
            });
            by_name.insert(kind.to_string(), id);
            *slot = id;
        }

        let unbounded_wildcard = TypeId::new(types.count() as u32);
        types.push(TypeInfo {
            id: unbounded_wildcard,
            name: WildcardKind::Unbounded.to_string(),
            kind: TypeKind::Wildcard(WildcardNode {
                kind: WildcardKind::Unbounded,
                bound: None,
            }),
        });

        Library {
            provider: Box::new(provider),
            config,
            diagnostics: Arc::new(Diagnostics::new()),
            types,
            by_name,
            generic_instances: DashMap::new(),
            raw_types: DashMap::new(),
            array_types: DashMap::new(),
            wildcards: DashMap::new(),
            primitives,
            unbounded_wildcard,
            insert_lock: Mutex::new(()),
        }
    }

    /// Replace the diagnostics channel, e.g. to share one between several libraries
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The configuration this library was created with
    #[must_use]
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Non-fatal problems found while resolving members
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Number of types in the arena, constructed types included
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.count()
    }

    /// `true` if the arena is empty; never the case since primitives are preloaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.count() == 0
    }

    /// `true` if a class or primitive of that name is already loaded; never asks the provider
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// The arena entry of `id`
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `id` does not belong to this library
    pub fn info(&self, id: TypeId) -> Result<&TypeInfo> {
        self.types
            .get(id.index())
            .ok_or_else(|| TypeError(format!("Type id {id} is not part of this library")))
    }

    /// Display name of `id`
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn name(&self, id: TypeId) -> Result<&str> {
        Ok(self.info(id)?.name.as_str())
    }

    /// Iterate over all entries in id order
    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.iter().map(|(_, info)| info)
    }

    /// Loaded classes of a package, sorted by name; sub-packages are excluded
    ///
    /// ## Arguments
    /// * 'package' - Package in binary form, e.g. `java/util`
    #[must_use]
    pub fn types_in_package(&self, package: &str) -> Vec<TypeId> {
        let prefix = format!("{package}/");
        self.by_name
            .range((Bound::Included(prefix.clone()), Bound::Unbounded))
            .take_while(|entry| entry.key().starts_with(&prefix))
            .filter(|entry| !entry.key()[prefix.len()..].contains('/'))
            .map(|entry| *entry.value())
            .collect()
    }

    /// Look up a type by name, loading its outline from the provider on first use.
    ///
    /// Accepts binary class names (`java/util/Map$Entry`), primitive names (`int`) and
    /// array descriptors (`[Ljava/lang/String;`). Repeated calls return the same id.
    ///
    /// ## Arguments
    /// * 'name' - The name to look up
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the provider has no such class, or a
    /// decoding error if its outline is inconsistent. Nothing is inserted on failure.
    pub fn get_type(&self, name: &str) -> Result<TypeId> {
        if let Some(entry) = self.by_name.get(name) {
            return Ok(*entry.value());
        }
        if name.starts_with('[') {
            return self.type_from_descriptor(name);
        }

        self.load_class(name)
    }

    fn load_class(&self, name: &str) -> Result<TypeId> {
        let guard = lock!(self.insert_lock);
        if let Some(entry) = self.by_name.get(name) {
            return Ok(*entry.value());
        }

        let mut collector = OutlineCollector::new();
        if !self.provider.visit_class(name, &mut collector)? {
            return Err(TypeNotFound(name.to_string()));
        }
        let raw = collector.finish()?;
        if raw.name != name {
            return Err(malformed_error!(
                "Provider returned class '{}' for '{}'",
                raw.name,
                name
            ));
        }

        let id = self.insert(&guard, name.to_string(), TypeKind::Class(ClassNode::new(raw)))?;
        self.by_name.insert(name.to_string(), id);
        tracing::trace!(class = name, id = %id, "loaded class outline");
        Ok(id)
    }

    fn insert(&self, _guard: &MutexGuard<'_, ()>, name: String, kind: TypeKind) -> Result<TypeId> {
        let index = u32::try_from(self.types.count())
            .map_err(|_| TypeError("Type arena is full".to_string()))?;
        let id = TypeId::new(index);
        let pushed = self.types.push(TypeInfo { id, name, kind });
        debug_assert_eq!(pushed, id.index());
        Ok(id)
    }

    /// Insert a fresh generic parameter; parameters are never shared between owners
    pub(crate) fn insert_generic_parameter(
        &self,
        node: GenericParameterNode,
    ) -> Result<TypeId> {
        let guard = lock!(self.insert_lock);
        let name = node.name.clone();
        self.insert(&guard, name, TypeKind::GenericParameter(node))
    }

    /// The canonical id of a primitive kind
    #[must_use]
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        self.primitives[kind as usize]
    }

    /// `java/lang/Object`
    ///
    /// # Errors
    /// Returns an error if the provider has no definition for it
    pub fn object_type(&self) -> Result<TypeId> {
        self.get_type(OBJECT_CLASS)
    }

    /// `java/lang/String`
    ///
    /// # Errors
    /// Returns an error if the provider has no definition for it
    pub fn string_type(&self) -> Result<TypeId> {
        self.get_type(STRING_CLASS)
    }

    /// The `?` wildcard
    #[must_use]
    pub fn unbounded_wildcard(&self) -> TypeId {
        self.unbounded_wildcard
    }

    pub(crate) fn class_node(&self, id: TypeId) -> Result<&ClassNode> {
        let info = self.info(id)?;
        info.as_class()
            .ok_or_else(|| TypeError(format!("'{}' is not a class", info.name)))
    }

    /// Formal type parameter count of a class, read from its signature without
    /// resolving anything
    pub(crate) fn formal_count(&self, node: &ClassNode) -> Result<usize> {
        if let Some(count) = node.formal_count.get() {
            return Ok(*count);
        }

        let count = match node.signature.as_deref() {
            Some(signature) if signature.starts_with('<') => {
                self.parse_class_signature(signature)?.type_parameters.len()
            }
            _ => 0,
        };
        Ok(*node.formal_count.get_or_init(|| count))
    }

    /// The generic class `definition` applied to `arguments`.
    ///
    /// Structurally equal requests return the same id. A request without arguments for
    /// a non-generic class (and no generic enclosing instance) returns the class itself.
    ///
    /// ## Arguments
    /// * 'definition' - A class loaded from the provider
    /// * 'arguments'  - One type per formal parameter
    /// * 'enclosing'  - The enclosing instance for inner classes of a generic outer class
    ///
    /// # Errors
    /// Returns [`crate::Error::GenericArity`] if the argument count does not match, or
    /// [`crate::Error::TypeError`] if `definition` is not a class
    pub fn get_generic_type(
        &self,
        definition: TypeId,
        arguments: &[TypeId],
        enclosing: Option<TypeId>,
    ) -> Result<TypeId> {
        let info = self.info(definition)?;
        let node = self.class_node(definition)?;

        let expected = self.formal_count(node)?;
        if expected != arguments.len() {
            return Err(GenericArity {
                type_name: info.name.clone(),
                expected,
                actual: arguments.len(),
            });
        }

        let enclosing = match enclosing {
            Some(outer) if self.info(outer)?.as_generic_instance().is_some() => Some(outer),
            _ => None,
        };
        if arguments.is_empty() && enclosing.is_none() {
            return Ok(definition);
        }

        let key = (definition, arguments.to_vec(), enclosing);
        if let Some(existing) = self.generic_instances.get(&key) {
            return Ok(*existing);
        }

        let name = self.instance_name(info, node, arguments, enclosing)?;
        let guard = lock!(self.insert_lock);
        if let Some(existing) = self.generic_instances.get(&key) {
            return Ok(*existing);
        }
        let id = self.insert(
            &guard,
            name,
            TypeKind::GenericInstance(GenericInstanceNode::new(
                definition,
                arguments.to_vec(),
                enclosing,
            )),
        )?;
        self.generic_instances.insert(key, id);
        tracing::trace!(id = %id, definition = %definition, "created generic instance");
        Ok(id)
    }

    fn instance_name(
        &self,
        info: &TypeInfo,
        node: &ClassNode,
        arguments: &[TypeId],
        enclosing: Option<TypeId>,
    ) -> Result<String> {
        let mut name = match enclosing {
            Some(outer) => {
                let simple = match node.inner_name() {
                    Some(simple) => simple,
                    None => info.name.rsplit('$').next().unwrap_or(&info.name),
                };
                format!("{}.{}", self.name(outer)?, simple)
            }
            None => info.name.clone(),
        };

        if !arguments.is_empty() {
            let names = arguments
                .iter()
                .map(|argument| self.name(*argument))
                .collect::<Result<Vec<_>>>()?;
            name.push('<');
            name.push_str(&names.join(", "));
            name.push('>');
        }
        Ok(name)
    }

    /// `true` if `id` is a class that declares formal type parameters, or a non-static
    /// inner class of such a class.
    ///
    /// Members of an inner class may mention the type parameters of every non-static
    /// enclosing class, so a bare reference to it is raw as well. An enclosing class the
    /// provider cannot supply ends the walk.
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn is_generic_definition(&self, id: TypeId) -> Result<bool> {
        let mut current = id;
        for _ in 0..=self.config.max_signature_depth {
            let TypeKind::Class(node) = &self.info(current)?.kind else {
                return Ok(false);
            };
            if node.declares_type_parameters() {
                return Ok(true);
            }
            match node.enclosing_name() {
                Some(outer) if !node.modifiers().is_static() => match self.get_type(outer) {
                    Ok(outer) => current = outer,
                    Err(TypeNotFound(_)) => return Ok(false),
                    Err(error) => return Err(error),
                },
                _ => return Ok(false),
            }
        }
        Ok(false)
    }

    /// The raw form of a generic class; non-generic classes are their own raw form
    ///
    /// ## Arguments
    /// * 'definition' - A class loaded from the provider
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `definition` is not a class
    pub fn get_raw_type(&self, definition: TypeId) -> Result<TypeId> {
        if let Some(existing) = self.raw_types.get(&definition) {
            return Ok(*existing);
        }

        let info = self.info(definition)?;
        self.class_node(definition)?;
        if !self.is_generic_definition(definition)? {
            return Ok(definition);
        }

        let guard = lock!(self.insert_lock);
        if let Some(existing) = self.raw_types.get(&definition) {
            return Ok(*existing);
        }
        let id = self.insert(&guard, info.name.clone(), TypeKind::Raw(RawNode::new(definition)))?;
        self.raw_types.insert(definition, id);
        Ok(id)
    }

    /// The array type with elements of `element`
    ///
    /// ## Arguments
    /// * 'element' - Component type; anything but `void` and wildcards
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] for `void` or wildcard components
    pub fn get_array_type(&self, element: TypeId) -> Result<TypeId> {
        if let Some(existing) = self.array_types.get(&element) {
            return Ok(*existing);
        }

        let info = self.info(element)?;
        if info.as_primitive() == Some(PrimitiveKind::Void) || info.wildcard().is_some() {
            return Err(TypeError(format!("'{}' cannot be an array element", info.name)));
        }

        let guard = lock!(self.insert_lock);
        if let Some(existing) = self.array_types.get(&element) {
            return Ok(*existing);
        }
        let id = self.insert(
            &guard,
            format!("{}[]", info.name),
            TypeKind::Array(ArrayNode { element }),
        )?;
        self.array_types.insert(element, id);
        Ok(id)
    }

    /// A bounded wildcard; [`WildcardKind::Unbounded`] returns [`Library::unbounded_wildcard`]
    ///
    /// ## Arguments
    /// * 'kind'  - Bound direction
    /// * 'bound' - Bound type
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `bound` is a primitive or a wildcard
    pub fn get_wildcard(&self, kind: WildcardKind, bound: TypeId) -> Result<TypeId> {
        if kind == WildcardKind::Unbounded {
            return Ok(self.unbounded_wildcard);
        }
        if let Some(existing) = self.wildcards.get(&(kind, bound)) {
            return Ok(*existing);
        }

        let info = self.info(bound)?;
        if info.is_primitive() || info.wildcard().is_some() {
            return Err(TypeError(format!("'{}' cannot bound a wildcard", info.name)));
        }

        let guard = lock!(self.insert_lock);
        if let Some(existing) = self.wildcards.get(&(kind, bound)) {
            return Ok(*existing);
        }
        let id = self.insert(
            &guard,
            format!("{} {}", kind, info.name),
            TypeKind::Wildcard(WildcardNode {
                kind,
                bound: Some(bound),
            }),
        )?;
        self.wildcards.insert((kind, bound), id);
        Ok(id)
    }

    /// Resolve an erased field descriptor (or `V`) to a type; generic classes come back
    /// in their raw form
    ///
    /// ## Arguments
    /// * 'descriptor' - e.g. `I`, `[Ljava/lang/String;`, `Ljava/util/List;`
    ///
    /// # Errors
    /// Returns an error if the descriptor is malformed or names an unknown class
    pub fn type_from_descriptor(&self, descriptor: &str) -> Result<TypeId> {
        let signature = self.parse_field_descriptor(descriptor)?;
        self.resolve_signature(&signature, &Scope::root())
    }

    pub(crate) fn parse_class_signature(&self, text: &str) -> Result<ClassSignature> {
        SignatureParser::new(text)
            .with_max_depth(self.config.max_signature_depth)
            .parse_class_signature()
    }

    pub(crate) fn parse_method_signature(&self, text: &str) -> Result<MethodSignature> {
        SignatureParser::new(text)
            .with_max_depth(self.config.max_signature_depth)
            .parse_method_signature()
    }

    pub(crate) fn parse_type_signature(&self, text: &str) -> Result<TypeSignature> {
        SignatureParser::new(text)
            .with_max_depth(self.config.max_signature_depth)
            .parse_type_signature()
    }

    pub(crate) fn parse_field_descriptor(&self, text: &str) -> Result<TypeSignature> {
        if text == "V" {
            return Ok(TypeSignature::Void);
        }
        SignatureParser::descriptor(text)
            .with_max_depth(self.config.max_signature_depth)
            .parse_type_signature()
    }

    pub(crate) fn parse_method_descriptor(&self, text: &str) -> Result<MethodDescriptor> {
        SignatureParser::descriptor(text)
            .with_max_depth(self.config.max_signature_depth)
            .parse_method_descriptor()
    }
}
