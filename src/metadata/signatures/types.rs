use crate::metadata::typesystem::PrimitiveKind;

/// Represents a parsed type in generic signatures and descriptors
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// One of the eight value primitives (`Z B C S I J F D`)
    Primitive(PrimitiveKind),
    /// `V`, only produced for method return types
    Void,
    /// `L...;` class or interface reference, possibly parameterized
    Class(ClassTypeSignature),
    /// `[` element
    Array(Box<TypeSignature>),
    /// `T name;` reference to a formal type parameter
    TypeVariable(String),
    /// `*` unbounded wildcard (type argument position only)
    Wildcard,
    /// `+` bound, i.e. `? extends bound` (type argument position only)
    WildcardExtends(Box<TypeSignature>),
    /// `-` bound, i.e. `? super bound` (type argument position only)
    WildcardSuper(Box<TypeSignature>),
}

impl TypeSignature {
    /// Returns true if this signature or any of its components mention a type
    /// variable, a wildcard or a type argument list
    #[must_use]
    pub fn is_generic(&self) -> bool {
        match self {
            TypeSignature::Primitive(_) | TypeSignature::Void => false,
            TypeSignature::Class(class) => class.is_generic(),
            TypeSignature::Array(element) => element.is_generic(),
            TypeSignature::TypeVariable(_)
            | TypeSignature::Wildcard
            | TypeSignature::WildcardExtends(_)
            | TypeSignature::WildcardSuper(_) => true,
        }
    }

    /// Number of array dimensions around the innermost element
    #[must_use]
    pub fn dimensions(&self) -> usize {
        match self {
            TypeSignature::Array(element) => 1 + element.dimensions(),
            _ => 0,
        }
    }
}

/// A class type reference with optional type arguments.
///
/// Inner classes of parameterized outer classes are written `Outer<A>.Inner<B>`; the
/// parser joins the simple names with `$` to form the binary name of the inner class
/// and keeps the outer part in [`ClassTypeSignature::enclosing`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassTypeSignature {
    /// Internal binary name, e.g. `java/util/Map$Entry`
    pub name: String,
    /// Type arguments applied to this class
    pub type_arguments: Vec<TypeSignature>,
    /// Parameterized form of the enclosing class, if written
    pub enclosing: Option<Box<ClassTypeSignature>>,
}

impl ClassTypeSignature {
    /// A reference without type arguments
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ClassTypeSignature {
            name: name.into(),
            type_arguments: Vec::new(),
            enclosing: None,
        }
    }

    /// Returns true if this reference or any enclosing reference carries type arguments
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_arguments.is_empty()
            || self
                .enclosing
                .as_ref()
                .is_some_and(|enclosing| enclosing.is_generic())
    }

    /// The simple name after the last `$` or `/`
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let name = self.name.rsplit('/').next().unwrap_or(&self.name);
        match &self.enclosing {
            Some(_) => name.rsplit('$').next().unwrap_or(name),
            None => name,
        }
    }
}

/// A formal type parameter `name : classBound : interfaceBound*`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormalTypeParameter {
    /// Declared name
    pub name: String,
    /// Class bound, absent when only interface bounds are given (`T::Ljava/lang/Comparable;`)
    pub class_bound: Option<TypeSignature>,
    /// Interface bounds in declaration order
    pub interface_bounds: Vec<TypeSignature>,
}

impl FormalTypeParameter {
    /// All bounds, class bound first
    pub fn bounds(&self) -> impl Iterator<Item = &TypeSignature> {
        self.class_bound.iter().chain(self.interface_bounds.iter())
    }
}

/// Generic signature of a class or interface
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassSignature {
    /// Formal type parameters, possibly empty
    pub type_parameters: Vec<FormalTypeParameter>,
    /// Superclass reference
    pub superclass: ClassTypeSignature,
    /// Implemented or extended interfaces
    pub interfaces: Vec<ClassTypeSignature>,
}

/// Generic signature of a method or constructor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// Formal type parameters of the method itself
    pub type_parameters: Vec<FormalTypeParameter>,
    /// Parameter types
    pub parameters: Vec<TypeSignature>,
    /// Return type, [`TypeSignature::Void`] for `V`
    pub return_type: TypeSignature,
    /// `^` thrown types
    pub exceptions: Vec<TypeSignature>,
}

/// Erased method descriptor, e.g. `(ILjava/lang/String;)V`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types
    pub parameters: Vec<TypeSignature>,
    /// Return type
    pub return_type: TypeSignature,
}
