//! Resolved fields, methods and parameters.
//!
//! Members are produced by the fields and methods phases of a class and are owned by
//! their declaring type. Every type a member mentions is a [`TypeId`] into the same
//! [`crate::Library`].

use crate::metadata::{
    annotations::{AnnotationArgument, AnnotationValue},
    flags::AccessFlags,
    typesystem::{ConstantValue, TypeId},
};

/// Name of instance constructors
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Name of the static initializer
pub const STATIC_INITIALIZER_NAME: &str = "<clinit>";

/// A resolved field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// The type that declares the field; for members of a generic instance or raw type
    /// this is the constructed type, not its definition
    pub declaring_type: TypeId,
    /// Access flags
    pub modifiers: AccessFlags,
    /// Field name
    pub name: String,
    /// Resolved field type
    pub field_type: TypeId,
    /// Erased descriptor, e.g. `Ljava/util/List;`
    pub descriptor: String,
    /// Generic signature, if the field type mentions type variables or arguments
    pub signature: Option<String>,
    /// `ConstantValue` attribute of `static final` fields
    pub constant_value: Option<ConstantValue>,
    /// Field annotations
    pub annotations: Vec<AnnotationValue>,
}

impl FieldInfo {
    /// `true` if the field is `static`
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }
}

/// A resolved formal parameter of a method
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    /// Zero-based position in the descriptor
    pub position: usize,
    /// Name from the `MethodParameters` attribute, if present
    pub name: Option<String>,
    /// Parameter flags (`final`, `synthetic`, `mandated`)
    pub modifiers: AccessFlags,
    /// Resolved parameter type
    pub parameter_type: TypeId,
    /// Parameter annotations
    pub annotations: Vec<AnnotationValue>,
}

/// A resolved method or constructor
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// The type that declares the method
    pub declaring_type: TypeId,
    /// Access flags
    pub modifiers: AccessFlags,
    /// Method name; `<init>` for constructors
    pub name: String,
    /// Erased descriptor, e.g. `(Ljava/lang/Object;)Ljava/lang/Object;`
    pub descriptor: String,
    /// Generic signature, if any
    pub signature: Option<String>,
    /// The method's own type parameters, in declaration order
    pub generic_arguments: Vec<TypeId>,
    /// Resolved return type, the `void` primitive for procedures
    pub return_type: TypeId,
    /// Parameters in descriptor order, synthetic leading ones included
    pub parameters: Vec<ParameterInfo>,
    /// Declared thrown types
    pub exceptions: Vec<TypeId>,
    /// Method annotations
    pub annotations: Vec<AnnotationValue>,
    /// Default element value of an annotation interface method
    pub default_value: Option<AnnotationArgument>,
}

impl MethodInfo {
    /// `true` for instance constructors
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    /// `true` for the class initializer
    #[must_use]
    pub fn is_static_initializer(&self) -> bool {
        self.name == STATIC_INITIALIZER_NAME
    }

    /// `true` if the method declares its own type parameters
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    /// `true` if the method is `static`
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// Parameter types in order
    pub fn parameter_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.parameters.iter().map(|parameter| parameter.parameter_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, modifiers: AccessFlags) -> MethodInfo {
        MethodInfo {
            declaring_type: TypeId::new(1),
            modifiers,
            name: name.to_string(),
            descriptor: "()V".to_string(),
            signature: None,
            generic_arguments: Vec::new(),
            return_type: TypeId::new(0),
            parameters: Vec::new(),
            exceptions: Vec::new(),
            annotations: Vec::new(),
            default_value: None,
        }
    }

    #[test]
    fn test_method_kinds() {
        assert!(method("<init>", AccessFlags::PUBLIC).is_constructor());
        assert!(method("<clinit>", AccessFlags::STATIC).is_static_initializer());
        assert!(method("<clinit>", AccessFlags::STATIC).is_static());

        let run = method("run", AccessFlags::PUBLIC);
        assert!(!run.is_constructor());
        assert!(!run.is_generic());
        assert_eq!(run.parameter_types().count(), 0);
    }
}
