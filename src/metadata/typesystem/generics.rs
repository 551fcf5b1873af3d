//! Substitution and erasure.
//!
//! A generic instance sees its definition through a binding of formal parameters to
//! actual arguments; a raw type sees it through erasure. Both views of supertypes,
//! fields and methods are derived on first use and memoized in the constructed node.

use std::collections::HashMap;

use crate::{
    metadata::{
        members::{FieldInfo, MethodInfo},
        typesystem::{
            node::{GenericInstanceNode, RawNode, Supertypes},
            Library, TypeId, TypeKind, WildcardKind,
        },
    },
    Error::RecursionLimit,
    Result,
};

/// Mapping from generic parameters to the types that replace them
pub type Bindings = HashMap<TypeId, TypeId>;

impl Library {
    /// The erasure of a type.
    ///
    /// - a type variable erases to the erasure of its first bound, or `java/lang/Object`
    /// - a generic instance erases to the raw form of its definition
    /// - an array erases to the array of its erased element
    /// - `? extends B` erases like `B`; `?` and `? super B` erase to `java/lang/Object`
    /// - a generic class definition erases to its raw form
    ///
    /// # Errors
    /// Returns an error if `java/lang/Object` is unavailable or bounds nest deeper than
    /// the configured signature depth
    pub fn erasure(&self, id: TypeId) -> Result<TypeId> {
        self.erasure_at(id, 0)
    }

    fn erasure_at(&self, id: TypeId, depth: usize) -> Result<TypeId> {
        if depth > self.config().max_signature_depth {
            return Err(RecursionLimit(self.config().max_signature_depth));
        }

        match &self.info(id)?.kind {
            TypeKind::Primitive(_) | TypeKind::Raw(_) => Ok(id),
            TypeKind::Class(_) => self.coerce_raw(id),
            TypeKind::GenericParameter(node) => {
                match node.bounds.get().and_then(|bounds| bounds.first()) {
                    Some(bound) => self.erasure_at(*bound, depth + 1),
                    None => self.object_type(),
                }
            }
            TypeKind::GenericInstance(node) => self.get_raw_type(node.definition),
            TypeKind::Array(node) => {
                let element = self.erasure_at(node.element, depth + 1)?;
                self.get_array_type(element)
            }
            TypeKind::Wildcard(node) => match (node.kind, node.bound) {
                (WildcardKind::Extends, Some(bound)) => self.erasure_at(bound, depth + 1),
                _ => self.object_type(),
            },
        }
    }

    /// Replace generic parameters inside `id` according to `bindings`.
    ///
    /// Types that mention none of the bound parameters come back unchanged.
    ///
    /// # Errors
    /// Returns an error if a substituted type cannot be constructed
    pub fn substitute(&self, id: TypeId, bindings: &Bindings) -> Result<TypeId> {
        if bindings.is_empty() {
            return Ok(id);
        }

        match &self.info(id)?.kind {
            TypeKind::GenericParameter(_) => Ok(bindings.get(&id).copied().unwrap_or(id)),
            TypeKind::GenericInstance(node) => {
                let arguments = node
                    .arguments
                    .iter()
                    .map(|argument| self.substitute(*argument, bindings))
                    .collect::<Result<Vec<_>>>()?;
                let enclosing = node
                    .enclosing
                    .map(|outer| self.substitute(outer, bindings))
                    .transpose()?;

                if arguments == node.arguments && enclosing == node.enclosing {
                    return Ok(id);
                }
                self.get_generic_type(node.definition, &arguments, enclosing)
            }
            TypeKind::Array(node) => {
                let element = self.substitute(node.element, bindings)?;
                if element == node.element {
                    return Ok(id);
                }
                self.get_array_type(element)
            }
            TypeKind::Wildcard(node) => match node.bound {
                Some(bound) => {
                    let substituted = self.substitute(bound, bindings)?;
                    if substituted == bound {
                        return Ok(id);
                    }
                    self.get_wildcard(node.kind, substituted)
                }
                None => Ok(id),
            },
            _ => Ok(id),
        }
    }

    /// `true` if the type mentions no generic parameter and no open generic definition
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn is_closed(&self, id: TypeId) -> Result<bool> {
        match &self.info(id)?.kind {
            TypeKind::Primitive(_) | TypeKind::Raw(_) => Ok(true),
            TypeKind::Class(_) => Ok(!self.is_generic_definition(id)?),
            TypeKind::GenericParameter(_) => Ok(false),
            TypeKind::GenericInstance(node) => {
                for argument in &node.arguments {
                    if !self.is_closed(*argument)? {
                        return Ok(false);
                    }
                }
                match node.enclosing {
                    Some(outer) => self.is_closed(outer),
                    None => Ok(true),
                }
            }
            TypeKind::Array(node) => self.is_closed(node.element),
            TypeKind::Wildcard(node) => match node.bound {
                Some(bound) => self.is_closed(bound),
                None => Ok(true),
            },
        }
    }

    /// The raw form of the class a type is built on; types not built on a class are
    /// returned unchanged
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn raw_type(&self, id: TypeId) -> Result<TypeId> {
        match self.info(id)?.definition() {
            Some(definition) => self.get_raw_type(definition),
            None => Ok(id),
        }
    }

    /// The generic class a generic instance or raw type was built from; any other type
    /// is its own definition
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn generic_type_definition(&self, id: TypeId) -> Result<TypeId> {
        Ok(self.info(id)?.definition().unwrap_or(id))
    }

    /// Parameter-to-argument bindings of a generic instance, including those of its
    /// enclosing instances
    ///
    /// # Errors
    /// Returns an error if the definition's base phase fails
    pub fn bindings(&self, id: TypeId) -> Result<Bindings> {
        match self.info(id)?.as_generic_instance() {
            Some(node) => self.instance_bindings(node),
            None => Ok(Bindings::new()),
        }
    }

    fn instance_bindings(&self, node: &GenericInstanceNode) -> Result<Bindings> {
        let mut bindings = match node.enclosing {
            Some(outer) => self.bindings(outer)?,
            None => Bindings::new(),
        };

        let parameters = &self.class_base(node.definition)?.generic_parameters;
        bindings.extend(parameters.iter().copied().zip(node.arguments.iter().copied()));
        Ok(bindings)
    }

    pub(crate) fn instance_supertypes<'a>(
        &'a self,
        node: &'a GenericInstanceNode,
    ) -> Result<&'a Supertypes> {
        if let Some(supertypes) = node.derived.supertypes.get() {
            return Ok(supertypes);
        }

        let base = self.class_base(node.definition)?;
        let bindings = self.instance_bindings(node)?;
        let supertypes = Supertypes {
            base_type: base
                .base_type
                .map(|base_type| self.substitute(base_type, &bindings))
                .transpose()?,
            interfaces: base
                .interfaces
                .iter()
                .map(|interface| self.substitute(*interface, &bindings))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(node.derived.supertypes.get_or_init(|| supertypes))
    }

    pub(crate) fn raw_supertypes<'a>(&'a self, node: &'a RawNode) -> Result<&'a Supertypes> {
        if let Some(supertypes) = node.derived.supertypes.get() {
            return Ok(supertypes);
        }

        let base = self.class_base(node.definition)?;
        let supertypes = Supertypes {
            base_type: base
                .base_type
                .map(|base_type| self.erasure(base_type))
                .transpose()?,
            interfaces: base
                .interfaces
                .iter()
                .map(|interface| self.erasure(*interface))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(node.derived.supertypes.get_or_init(|| supertypes))
    }

    pub(crate) fn instance_fields<'a>(
        &'a self,
        id: TypeId,
        node: &'a GenericInstanceNode,
    ) -> Result<&'a [FieldInfo]> {
        if let Some(fields) = node.derived.fields.get() {
            return Ok(fields);
        }

        let bindings = self.instance_bindings(node)?;
        let fields = self
            .class_fields(node.definition)?
            .iter()
            .map(|field| {
                Ok(FieldInfo {
                    declaring_type: id,
                    field_type: self.substitute(field.field_type, &bindings)?,
                    ..field.clone()
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(node.derived.fields.get_or_init(|| fields))
    }

    pub(crate) fn raw_fields<'a>(
        &'a self,
        id: TypeId,
        node: &'a RawNode,
    ) -> Result<&'a [FieldInfo]> {
        if let Some(fields) = node.derived.fields.get() {
            return Ok(fields);
        }

        let fields = self
            .class_fields(node.definition)?
            .iter()
            .map(|field| {
                Ok(FieldInfo {
                    declaring_type: id,
                    field_type: self.erasure(field.field_type)?,
                    signature: None,
                    ..field.clone()
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(node.derived.fields.get_or_init(|| fields))
    }

    pub(crate) fn instance_methods<'a>(
        &'a self,
        id: TypeId,
        node: &'a GenericInstanceNode,
    ) -> Result<&'a [MethodInfo]> {
        if let Some(methods) = node.derived.methods.get() {
            return Ok(methods);
        }

        let bindings = self.instance_bindings(node)?;
        let methods = self
            .class_methods(node.definition)?
            .iter()
            .map(|method| self.map_method(id, method, |ty| self.substitute(ty, &bindings)))
            .collect::<Result<Vec<_>>>()?;
        Ok(node.derived.methods.get_or_init(|| methods))
    }

    pub(crate) fn raw_methods<'a>(
        &'a self,
        id: TypeId,
        node: &'a RawNode,
    ) -> Result<&'a [MethodInfo]> {
        if let Some(methods) = node.derived.methods.get() {
            return Ok(methods);
        }

        let methods = self
            .class_methods(node.definition)?
            .iter()
            .map(|method| {
                let mut erased = self.map_method(id, method, |ty| self.erasure(ty))?;
                erased.generic_arguments.clear();
                erased.signature = None;
                Ok(erased)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(node.derived.methods.get_or_init(|| methods))
    }

    fn map_method(
        &self,
        declaring_type: TypeId,
        method: &MethodInfo,
        map: impl Fn(TypeId) -> Result<TypeId>,
    ) -> Result<MethodInfo> {
        let mut mapped = method.clone();
        mapped.declaring_type = declaring_type;
        mapped.return_type = map(method.return_type)?;
        for parameter in &mut mapped.parameters {
            parameter.parameter_type = map(parameter.parameter_type)?;
        }
        for exception in &mut mapped.exceptions {
            *exception = map(*exception)?;
        }
        Ok(mapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::typesystem::PrimitiveKind,
        test::{library, resolve},
    };

    #[test]
    fn test_erasure_of_constructed_types() {
        let library = library();
        let list = library.get_type("java/util/List").unwrap();
        let raw_list = library.get_raw_type(list).unwrap();

        let list_of_string = resolve(&library, "Ljava/util/List<Ljava/lang/String;>;");
        assert_eq!(library.erasure(list_of_string).unwrap(), raw_list);
        assert_eq!(library.erasure(list).unwrap(), raw_list);

        let array = resolve(&library, "[Ljava/util/List<Ljava/lang/String;>;");
        assert_eq!(
            library.erasure(array).unwrap(),
            library.get_array_type(raw_list).unwrap()
        );

        let int = library.primitive(PrimitiveKind::Int);
        assert_eq!(library.erasure(int).unwrap(), int);
    }

    #[test]
    fn test_erasure_of_wildcards() {
        let library = library();
        let number = library.get_type("java/lang/Number").unwrap();
        let object = library.object_type().unwrap();

        let extends = library.get_wildcard(WildcardKind::Extends, number).unwrap();
        let sup = library.get_wildcard(WildcardKind::Super, number).unwrap();
        assert_eq!(library.erasure(extends).unwrap(), number);
        assert_eq!(library.erasure(sup).unwrap(), object);
        assert_eq!(library.erasure(library.unbounded_wildcard()).unwrap(), object);
    }

    #[test]
    fn test_instance_substitutes_supertypes() {
        let library = library();
        let array_list = resolve(&library, "Ljava/util/ArrayList<Ljava/lang/String;>;");
        let node = library.info(array_list).unwrap().as_generic_instance().unwrap();

        let supertypes = library.instance_supertypes(node).unwrap();
        let names: Vec<_> = supertypes
            .interfaces
            .iter()
            .map(|id| library.name(*id).unwrap())
            .collect();
        assert!(names.contains(&"java/util/List<java/lang/String>"));
        assert!(library.is_closed(array_list).unwrap());
    }

    #[test]
    fn test_is_closed() {
        let library = library();
        let list = library.get_type("java/util/List").unwrap();
        assert!(!library.is_closed(list).unwrap());
        assert!(library.is_closed(library.get_raw_type(list).unwrap()).unwrap());
        assert!(library.is_closed(library.unbounded_wildcard()).unwrap());

        let parameter = library.class_base(list).unwrap().generic_parameters[0];
        assert!(!library.is_closed(parameter).unwrap());
        let open = library.get_generic_type(list, &[parameter], None).unwrap();
        assert!(!library.is_closed(open).unwrap());
    }

    #[test]
    fn test_inner_class_of_generic_outer_is_erased() {
        let library = library();
        let inner = library.get_type("test/Outer$Inner").unwrap();
        let object = library.object_type().unwrap();

        assert!(!library.is_closed(inner).unwrap());
        let raw = library.coerce_raw(inner).unwrap();
        assert_eq!(raw, library.get_raw_type(inner).unwrap());
        assert_ne!(raw, inner);

        let TypeKind::Raw(node) = &library.info(raw).unwrap().kind else {
            panic!("expected a raw type");
        };
        assert_eq!(library.raw_fields(raw, node).unwrap()[0].field_type, object);
        let methods = library.raw_methods(raw, node).unwrap();
        let item = methods.iter().find(|method| method.name == "item").unwrap();
        assert_eq!(item.return_type, object);
    }

    #[test]
    fn test_substitute_leaves_unrelated_types() {
        let library = library();
        let list = library.get_type("java/util/List").unwrap();
        let parameter = library.class_base(list).unwrap().generic_parameters[0];
        let string = library.string_type().unwrap();

        let mut bindings = Bindings::new();
        bindings.insert(parameter, string);

        let open = library.get_generic_type(list, &[parameter], None).unwrap();
        let closed = library.substitute(open, &bindings).unwrap();
        let instance = library.info(closed).unwrap().as_generic_instance().unwrap();
        assert_eq!(instance.arguments, vec![string]);
        assert_eq!(library.substitute(string, &bindings).unwrap(), string);
        assert_eq!(library.generic_type_definition(closed).unwrap(), list);
        assert_eq!(library.raw_type(closed).unwrap(), library.get_raw_type(list).unwrap());
    }

    #[test]
    fn test_raw_box_members_are_erased() {
        let library = library();
        let generic_box = library.get_type("test/Box").unwrap();
        let raw = library.get_raw_type(generic_box).unwrap();
        let object = library.object_type().unwrap();
        let raw_list = library
            .get_raw_type(library.get_type("java/util/List").unwrap())
            .unwrap();

        let node = library.info(raw).unwrap();
        let TypeKind::Raw(node) = &node.kind else {
            panic!("expected a raw type");
        };
        let fields = library.raw_fields(raw, node).unwrap();
        assert_eq!(fields[0].field_type, object);
        assert_eq!(fields[1].field_type, raw_list);
        assert!(fields.iter().all(|field| field.signature.is_none()));

        let methods = library.raw_methods(raw, node).unwrap();
        let set = methods.iter().find(|method| method.name == "set").unwrap();
        assert_eq!(set.parameters[0].parameter_type, object);
        assert_eq!(set.declaring_type, raw);
    }

    #[test]
    fn test_instance_methods_substituted() {
        let library = library();
        let string = library.string_type().unwrap();
        let box_of_string = resolve(&library, "Ltest/Box<Ljava/lang/String;>;");
        let node = library.info(box_of_string).unwrap().as_generic_instance().unwrap();

        let methods = library.instance_methods(box_of_string, node).unwrap();
        let get = methods.iter().find(|method| method.name == "get").unwrap();
        assert_eq!(get.return_type, string);
        assert_eq!(get.declaring_type, box_of_string);

        let bindings = library.bindings(box_of_string).unwrap();
        assert_eq!(bindings.len(), 1);
        assert!(bindings.values().all(|bound| *bound == string));
    }

    #[test]
    fn test_legacy_supertype_is_raw() {
        let library = library();
        let legacy = library.get_type("test/LegacyList").unwrap();
        let array_list = library.get_type("java/util/ArrayList").unwrap();

        let base = library.class_base(legacy).unwrap().base_type.unwrap();
        assert_eq!(base, library.get_raw_type(array_list).unwrap());
        assert_eq!(library.erasure(base).unwrap(), base);
    }
}
