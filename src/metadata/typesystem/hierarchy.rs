//! Queries over resolved types.
//!
//! Every query takes a [`TypeId`] and runs whatever lazy phase it needs. Generic
//! instances answer with substituted members and supertypes, raw types with erased
//! ones; arrays, type variables and wildcards answer structurally.

use std::collections::{HashSet, VecDeque};

use crate::{
    metadata::{
        annotations::AnnotationValue,
        flags::AccessFlags,
        members::{FieldInfo, MethodInfo},
        typesystem::{
            library::OBJECT_CLASS, GenericOwner, Library, NumericTypeKind, TypeId, TypeKind,
            WildcardKind,
        },
    },
    Error::TypeError,
    Result,
};

/// Interfaces every array type implements
pub const ARRAY_INTERFACES: [&str; 2] = ["java/lang/Cloneable", "java/io/Serializable"];

impl Library {
    /// The direct superclass.
    ///
    /// `java/lang/Object`, interfaces, primitives and wildcards have none. Arrays extend
    /// `java/lang/Object`; a type variable reports its first bound.
    ///
    /// # Errors
    /// Returns an error if the base phase of the class fails
    pub fn base_type(&self, id: TypeId) -> Result<Option<TypeId>> {
        match &self.info(id)?.kind {
            TypeKind::Class(_) => Ok(self.class_base(id)?.base_type),
            TypeKind::GenericInstance(node) => Ok(self.instance_supertypes(node)?.base_type),
            TypeKind::Raw(node) => Ok(self.raw_supertypes(node)?.base_type),
            TypeKind::Array(_) => Ok(Some(self.object_type()?)),
            TypeKind::GenericParameter(node) => match node.bounds.get().and_then(|b| b.first()) {
                Some(bound) => Ok(Some(*bound)),
                None => Ok(Some(self.object_type()?)),
            },
            TypeKind::Primitive(_) | TypeKind::Wildcard(_) => Ok(None),
        }
    }

    /// Directly implemented (or, for interfaces, extended) interfaces in declaration order
    ///
    /// # Errors
    /// Returns an error if the base phase of the class fails
    pub fn interfaces(&self, id: TypeId) -> Result<Vec<TypeId>> {
        match &self.info(id)?.kind {
            TypeKind::Class(_) => Ok(self.class_base(id)?.interfaces.clone()),
            TypeKind::GenericInstance(node) => {
                Ok(self.instance_supertypes(node)?.interfaces.clone())
            }
            TypeKind::Raw(node) => Ok(self.raw_supertypes(node)?.interfaces.clone()),
            TypeKind::Array(_) => ARRAY_INTERFACES
                .iter()
                .map(|name| self.get_type(name))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Formal parameters of a generic class definition, actual arguments of a generic
    /// instance, nothing for anything else (raw types included)
    ///
    /// # Errors
    /// Returns an error if the base phase of the class fails
    pub fn generic_arguments(&self, id: TypeId) -> Result<Vec<TypeId>> {
        match &self.info(id)?.kind {
            TypeKind::Class(_) => Ok(self.class_base(id)?.generic_parameters.clone()),
            TypeKind::GenericInstance(node) => Ok(node.arguments.clone()),
            _ => Ok(Vec::new()),
        }
    }

    /// Bounds of a type variable: class bound first, then interface bounds
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `id` is not a type variable
    pub fn generic_parameter_bounds(&self, id: TypeId) -> Result<Vec<TypeId>> {
        let info = self.info(id)?;
        let node = info
            .as_generic_parameter()
            .ok_or_else(|| TypeError(format!("'{}' is not a type variable", info.name)))?;
        Ok(node.bounds.get().cloned().unwrap_or_default())
    }

    /// Declared fields
    ///
    /// # Errors
    /// Returns an error if an earlier phase fails, or a field fails in strict mode
    pub fn fields(&self, id: TypeId) -> Result<&[FieldInfo]> {
        match &self.info(id)?.kind {
            TypeKind::Class(_) => self.class_fields(id),
            TypeKind::GenericInstance(node) => self.instance_fields(id, node),
            TypeKind::Raw(node) => self.raw_fields(id, node),
            _ => Ok(&[]),
        }
    }

    /// Declared methods and constructors
    ///
    /// # Errors
    /// Returns an error if the methods phase or an earlier one fails
    pub fn methods(&self, id: TypeId) -> Result<&[MethodInfo]> {
        match &self.info(id)?.kind {
            TypeKind::Class(_) => self.class_methods(id),
            TypeKind::GenericInstance(node) => self.instance_methods(id, node),
            TypeKind::Raw(node) => self.raw_methods(id, node),
            _ => Ok(&[]),
        }
    }

    /// Member classes of the class a type is built on
    ///
    /// # Errors
    /// Returns an error if a phase of the class fails
    pub fn nested_types(&self, id: TypeId) -> Result<&[TypeId]> {
        match self.info(id)?.definition() {
            Some(definition) => self.class_nested(definition),
            None => Ok(&[]),
        }
    }

    /// Annotations of the class a type is built on
    ///
    /// # Errors
    /// Returns an error if the base phase of the class fails
    pub fn annotations(&self, id: TypeId) -> Result<&[AnnotationValue]> {
        match self.info(id)?.definition() {
            Some(definition) => Ok(&self.class_base(definition)?.annotations),
            None => Ok(&[]),
        }
    }

    /// The enclosing class of a nested class, the enclosing instance of an inner class
    /// instance, or the declaring class of a type variable
    ///
    /// # Errors
    /// Returns an error if the enclosing class cannot be loaded
    pub fn declaring_type(&self, id: TypeId) -> Result<Option<TypeId>> {
        match &self.info(id)?.kind {
            TypeKind::Class(node) => node
                .enclosing_name()
                .map(|outer| self.get_type(outer))
                .transpose(),
            TypeKind::GenericInstance(node) => match node.enclosing {
                Some(outer) => Ok(Some(outer)),
                None => self.declaring_type(node.definition),
            },
            TypeKind::Raw(node) => self.declaring_type(node.definition),
            TypeKind::GenericParameter(node) => match &node.owner {
                GenericOwner::Type(owner) => Ok(Some(*owner)),
                GenericOwner::Method { declaring_type, .. } => Ok(Some(*declaring_type)),
            },
            _ => Ok(None),
        }
    }

    /// Access flags; constructed types report those of their definition, arrays and
    /// primitives are `public final abstract`
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn modifiers(&self, id: TypeId) -> Result<AccessFlags> {
        let info = self.info(id)?;
        match &info.kind {
            TypeKind::Primitive(_) | TypeKind::Array(_) => {
                Ok(AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::ABSTRACT)
            }
            TypeKind::GenericParameter(_) | TypeKind::Wildcard(_) => Ok(AccessFlags::empty()),
            _ => match info.definition() {
                Some(definition) => Ok(self.class_node(definition)?.modifiers()),
                None => Ok(AccessFlags::empty()),
            },
        }
    }

    /// Numeric tag of primitives and their wrapper classes
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn numeric_kind(&self, id: TypeId) -> Result<NumericTypeKind> {
        let info = self.info(id)?;
        Ok(match &info.kind {
            TypeKind::Primitive(kind) => kind.numeric_kind(),
            TypeKind::Class(_) => NumericTypeKind::from_boxed_class(&info.name),
            _ => NumericTypeKind::None,
        })
    }

    /// Erased descriptor, e.g. `Ljava/util/List;` for `List<String>`
    ///
    /// # Errors
    /// Returns an error if the erasure cannot be computed
    pub fn descriptor(&self, id: TypeId) -> Result<String> {
        let info = self.info(id)?;
        match &info.kind {
            TypeKind::Primitive(kind) => Ok(kind.descriptor().to_string()),
            TypeKind::Class(_) | TypeKind::Raw(_) | TypeKind::GenericInstance(_) => {
                let definition = info.definition().unwrap_or(id);
                Ok(format!("L{};", self.name(definition)?))
            }
            TypeKind::Array(node) => Ok(format!("[{}", self.descriptor(node.element)?)),
            TypeKind::GenericParameter(_) | TypeKind::Wildcard(_) => {
                self.descriptor(self.erasure(id)?)
            }
        }
    }

    /// Generic signature of a type as it would appear in a `Signature` attribute, e.g.
    /// `Ljava/util/Map<TK;[Ljava/lang/String;>;`
    ///
    /// # Errors
    /// Returns an error if the base phase of a generic class definition fails
    pub fn signature(&self, id: TypeId) -> Result<String> {
        let info = self.info(id)?;
        match &info.kind {
            TypeKind::Primitive(kind) => Ok(kind.descriptor().to_string()),
            TypeKind::Raw(_) => self.descriptor(id),
            TypeKind::Class(_) => {
                let parameters = self.generic_arguments(id)?;
                Ok(format!("L{}{};", info.name, self.argument_signatures(&parameters)?))
            }
            TypeKind::GenericInstance(node) => {
                let arguments = self.argument_signatures(&node.arguments)?;
                match node.enclosing {
                    Some(outer) => {
                        let outer = self.signature(outer)?;
                        let simple = match self.class_node(node.definition)?.inner_name() {
                            Some(simple) => simple.to_string(),
                            None => {
                                let name = self.name(node.definition)?;
                                name.rsplit('$').next().unwrap_or(name).to_string()
                            }
                        };
                        Ok(format!(
                            "{}.{}{};",
                            outer.trim_end_matches(';'),
                            simple,
                            arguments
                        ))
                    }
                    None => Ok(format!("L{}{};", self.name(node.definition)?, arguments)),
                }
            }
            TypeKind::GenericParameter(node) => Ok(format!("T{};", node.name)),
            TypeKind::Array(node) => Ok(format!("[{}", self.signature(node.element)?)),
            TypeKind::Wildcard(node) => match (node.kind, node.bound) {
                (WildcardKind::Extends, Some(bound)) => Ok(format!("+{}", self.signature(bound)?)),
                (WildcardKind::Super, Some(bound)) => Ok(format!("-{}", self.signature(bound)?)),
                _ => Ok("*".to_string()),
            },
        }
    }

    fn argument_signatures(&self, arguments: &[TypeId]) -> Result<String> {
        if arguments.is_empty() {
            return Ok(String::new());
        }

        let mut text = String::from("<");
        for argument in arguments {
            text.push_str(&self.signature(*argument)?);
        }
        text.push('>');
        Ok(text)
    }

    /// Every supertype reachable through base types and interfaces, `id` included,
    /// breadth first
    ///
    /// # Errors
    /// Returns an error if a base phase along the way fails
    pub fn supertypes(&self, id: TypeId) -> Result<Vec<TypeId>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([id]);
        let mut order = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            order.push(current);

            if let Some(base) = self.base_type(current)? {
                queue.push_back(base);
            }
            queue.extend(self.interfaces(current)?);
        }
        Ok(order)
    }

    /// `true` if `sub` is `sup` or inherits from the class `sup` is built on.
    ///
    /// Generic arguments are not compared: `ArrayList<String>` is a subtype of
    /// `List<Integer>` here. Arrays are compared by element type.
    ///
    /// # Errors
    /// Returns an error if a base phase along the way fails
    pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> Result<bool> {
        if sub == sup {
            return Ok(true);
        }

        let sub_info = self.info(sub)?;
        let sup_info = self.info(sup)?;
        if sub_info.is_primitive() || sup_info.is_primitive() {
            return Ok(false);
        }
        if let (Some(sub_element), Some(sup_element)) =
            (sub_info.element_type(), sup_info.element_type())
        {
            if self.info(sub_element)?.is_primitive() || self.info(sup_element)?.is_primitive() {
                return Ok(sub_element == sup_element);
            }
            return self.is_subtype_of(sub_element, sup_element);
        }

        let target = self.generic_type_definition(sup)?;
        if self.name(target)? == OBJECT_CLASS && sup_info.definition().is_some() {
            return Ok(true);
        }

        for supertype in self.supertypes(sub)? {
            if self.generic_type_definition(supertype)? == target {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// `true` if both methods take the same number of parameters with equal erasures
    ///
    /// # Errors
    /// Returns an error if an erasure cannot be computed
    pub fn has_same_erased_parameters(
        &self,
        method: &MethodInfo,
        other: &MethodInfo,
    ) -> Result<bool> {
        if method.parameters.len() != other.parameters.len() {
            return Ok(false);
        }

        for (left, right) in method.parameter_types().zip(other.parameter_types()) {
            if self.erasure(left)? != self.erasure(right)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `true` if instance method `method` overrides `other`, declared in a proper supertype
    ///
    /// # Errors
    /// Returns an error if the hierarchy cannot be resolved
    pub fn overrides(&self, method: &MethodInfo, other: &MethodInfo) -> Result<bool> {
        if method.is_static() || other.is_static() {
            return Ok(false);
        }
        self.shadows(method, other)
    }

    /// `true` if static method `method` hides `other`, declared in a proper supertype
    ///
    /// # Errors
    /// Returns an error if the hierarchy cannot be resolved
    pub fn hides(&self, method: &MethodInfo, other: &MethodInfo) -> Result<bool> {
        if !method.is_static() || !other.is_static() {
            return Ok(false);
        }
        self.shadows(method, other)
    }

    fn shadows(&self, method: &MethodInfo, other: &MethodInfo) -> Result<bool> {
        if method.name != other.name
            || method.is_constructor()
            || method.is_static_initializer()
            || other.modifiers.is_private()
        {
            return Ok(false);
        }

        let declaring = self.generic_type_definition(method.declaring_type)?;
        let other_declaring = self.generic_type_definition(other.declaring_type)?;
        if declaring == other_declaring || !self.is_subtype_of(declaring, other_declaring)? {
            return Ok(false);
        }

        self.has_same_erased_parameters(method, other)
    }

    /// Find a field by name in the type or, failing that, its supertypes
    ///
    /// # Errors
    /// Returns an error if a phase along the way fails
    pub fn find_field(&self, id: TypeId, name: &str) -> Result<Option<&FieldInfo>> {
        for supertype in self.supertypes(id)? {
            if let Some(field) = self.fields(supertype)?.iter().find(|field| field.name == name) {
                return Ok(Some(field));
            }
        }
        Ok(None)
    }

    /// All methods named `name` visible in the type: its own first, then inherited ones
    /// that no closer method already overrides or hides
    ///
    /// # Errors
    /// Returns an error if a phase along the way fails
    pub fn find_methods(&self, id: TypeId, name: &str) -> Result<Vec<&MethodInfo>> {
        let mut found: Vec<&MethodInfo> = Vec::new();

        for supertype in self.supertypes(id)? {
            for method in self.methods(supertype)?.iter().filter(|method| method.name == name) {
                let mut shadowed = false;
                for closer in &found {
                    if self.has_same_erased_parameters(closer, method)? {
                        shadowed = true;
                        break;
                    }
                }
                if !shadowed {
                    found.push(method);
                }
            }
        }
        Ok(found)
    }
}
