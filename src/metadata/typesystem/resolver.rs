//! Turning parsed signatures into [`TypeId`]s.
//!
//! Type variables are looked up in a [`Scope`]; class references are looked up by name
//! through the [`Library`] and applied to their arguments. A class reference without
//! arguments to a generic class denotes its raw form, whether it comes from a
//! descriptor or from a signature.

use crate::{
    metadata::{
        signatures::{ClassTypeSignature, FormalTypeParameter, TypeSignature},
        typesystem::{
            node::GenericParameterNode, GenericOwner, Library, PrimitiveKind, Scope, TypeId,
            TypeKind, WildcardKind,
        },
    },
    Result,
};

impl Library {
    /// Resolve a parsed type against `scope`.
    ///
    /// ## Arguments
    /// * 'signature' - A parsed type signature or descriptor
    /// * 'scope'     - Declared type variables visible at the use site
    ///
    /// # Errors
    /// Returns [`crate::Error::UnboundTypeVariable`] for undeclared variables,
    /// [`crate::Error::TypeNotFound`] for unknown classes and
    /// [`crate::Error::GenericArity`] for argument count mismatches
    pub fn resolve_signature(&self, signature: &TypeSignature, scope: &Scope) -> Result<TypeId> {
        match signature {
            TypeSignature::Primitive(kind) => Ok(self.primitive(*kind)),
            TypeSignature::Void => Ok(self.primitive(PrimitiveKind::Void)),
            TypeSignature::Class(class) => self.resolve_class_type(class, scope),
            TypeSignature::Array(element) => {
                let element = self.resolve_signature(element, scope)?;
                self.get_array_type(element)
            }
            TypeSignature::TypeVariable(name) => scope.resolve(name),
            TypeSignature::Wildcard => Ok(self.unbounded_wildcard()),
            TypeSignature::WildcardExtends(bound) => {
                let bound = self.resolve_signature(bound, scope)?;
                self.get_wildcard(WildcardKind::Extends, bound)
            }
            TypeSignature::WildcardSuper(bound) => {
                let bound = self.resolve_signature(bound, scope)?;
                self.get_wildcard(WildcardKind::Super, bound)
            }
        }
    }

    /// Resolve a class type reference, including its type arguments and generic
    /// enclosing instance
    ///
    /// # Errors
    /// See [`Library::resolve_signature`]
    pub fn resolve_class_type(
        &self,
        signature: &ClassTypeSignature,
        scope: &Scope,
    ) -> Result<TypeId> {
        let definition = self.get_type(&signature.name)?;

        let enclosing = match &signature.enclosing {
            Some(outer) if outer.is_generic() => Some(self.resolve_class_type(outer, scope)?),
            _ => None,
        };
        if signature.type_arguments.is_empty() && enclosing.is_none() {
            return self.coerce_raw(definition);
        }

        let arguments = signature
            .type_arguments
            .iter()
            .map(|argument| self.resolve_signature(argument, scope))
            .collect::<Result<Vec<_>>>()?;
        self.get_generic_type(definition, &arguments, enclosing)
    }

    /// The raw form of `id` if it is a generic class definition (see
    /// [`Library::is_generic_definition`]), `id` otherwise
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn coerce_raw(&self, id: TypeId) -> Result<TypeId> {
        match &self.info(id)?.kind {
            TypeKind::Class(_) if self.is_generic_definition(id)? => self.get_raw_type(id),
            _ => Ok(id),
        }
    }

    /// Declare a list of formal type parameters in a new frame on top of `parent`.
    ///
    /// All names are declared first and bounds resolved afterwards, so bounds may
    /// mention any sibling (`<K extends Comparable<V>, V extends Comparable<K>>`).
    /// Without formals the parent scope is returned unchanged.
    pub(crate) fn declare_type_parameters(
        &self,
        formals: &[FormalTypeParameter],
        parent: &Scope,
        owner: &GenericOwner,
    ) -> Result<(Scope, Vec<TypeId>)> {
        if formals.is_empty() {
            return Ok((parent.clone(), Vec::new()));
        }

        let mut frame = parent.enter();
        let mut parameters = Vec::with_capacity(formals.len());
        for (position, formal) in formals.iter().enumerate() {
            let id = self.insert_generic_parameter(GenericParameterNode::new(
                &formal.name,
                owner.clone(),
                position,
            ))?;
            frame.declare(&formal.name, id)?;
            parameters.push(id);
        }
        let scope = frame.build();

        for (formal, id) in formals.iter().zip(&parameters) {
            let bounds = formal
                .bounds()
                .map(|bound| self.resolve_signature(bound, &scope))
                .collect::<Result<Vec<_>>>()?;
            if let Some(node) = self.info(*id)?.as_generic_parameter() {
                // Freshly inserted above, nobody else can have set it
                let _ = node.bounds.set(bounds);
            }
        }

        Ok((scope, parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            classfile::MemoryProvider,
            signatures::{parse_class_signature, parse_type_signature},
        },
        Error,
    };

    fn library() -> Library {
        Library::new(MemoryProvider::with_core_classes())
    }

    #[test]
    fn test_raw_coercion() {
        let library = library();
        let list = library.get_type("java/util/List").unwrap();
        let string = library.string_type().unwrap();

        let raw = library
            .resolve_signature(&parse_type_signature("Ljava/util/List;").unwrap(), &Scope::root())
            .unwrap();
        assert_eq!(raw, library.get_raw_type(list).unwrap());
        assert_eq!(library.coerce_raw(string).unwrap(), string);
    }

    #[test]
    fn test_generic_arguments_resolved() {
        let library = library();
        let signature =
            parse_type_signature("Ljava/util/Map<Ljava/lang/String;[Ljava/lang/Integer;>;").unwrap();
        let map = library.resolve_signature(&signature, &Scope::root()).unwrap();
        assert_eq!(
            library.name(map).unwrap(),
            "java/util/Map<java/lang/String, java/lang/Integer[]>"
        );
    }

    #[test]
    fn test_wildcards_resolved() {
        let library = library();
        let signature = parse_type_signature("Ljava/util/List<+Ljava/lang/Number;>;").unwrap();
        let list = library.resolve_signature(&signature, &Scope::root()).unwrap();
        let info = library.info(list).unwrap().as_generic_instance().unwrap();
        let (kind, bound) = library.info(info.arguments[0]).unwrap().wildcard().unwrap();
        assert_eq!(kind, WildcardKind::Extends);
        assert_eq!(bound, Some(library.get_type("java/lang/Number").unwrap()));
    }

    #[test]
    fn test_unbound_variable() {
        let library = library();
        let signature = parse_type_signature("Ljava/util/List<TT;>;").unwrap();
        assert!(matches!(
            library.resolve_signature(&signature, &Scope::root()),
            Err(Error::UnboundTypeVariable { name }) if name == "T"
        ));
    }

    #[test]
    fn test_mutually_bounded_parameters() {
        let library = library();
        let owner = library.get_type("java/lang/Object").unwrap();
        let signature = parse_class_signature(
            "<K::Ljava/lang/Comparable<TV;>;V::Ljava/lang/Comparable<TK;>;>Ljava/lang/Object;",
        )
        .unwrap();

        let (scope, parameters) = library
            .declare_type_parameters(
                &signature.type_parameters,
                &Scope::root(),
                &GenericOwner::Type(owner),
            )
            .unwrap();
        assert_eq!(scope.depth(), 1);
        assert_eq!(parameters.len(), 2);

        let k = library.info(parameters[0]).unwrap().as_generic_parameter().unwrap();
        let v = library.info(parameters[1]).unwrap().as_generic_parameter().unwrap();
        assert_eq!(k.position, 0);
        assert_eq!(v.name, "V");

        let k_bound = k.bounds.get().unwrap()[0];
        let k_bound_args = &library.info(k_bound).unwrap().as_generic_instance().unwrap().arguments;
        assert_eq!(k_bound_args, &vec![parameters[1]]);
    }

    #[test]
    fn test_no_formals_keeps_parent() {
        let library = library();
        let owner = library.get_type("java/lang/Object").unwrap();
        let (scope, parameters) = library
            .declare_type_parameters(&[], &Scope::root(), &GenericOwner::Type(owner))
            .unwrap();
        assert!(scope.is_root());
        assert!(parameters.is_empty());
    }
}
