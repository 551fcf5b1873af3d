//! Generic signature and descriptor parsing for JVM class metadata.
//!
//! Compiled classes carry two textual encodings of types:
//!
//! - **Descriptors** - erased types, always present (`(ILjava/lang/String;)V`)
//! - **Signatures** - the generic view, present only when generics are involved
//!   (`<T:Ljava/lang/Object;>(TT;)TT;`)
//!
//! # Signature Kinds
//!
//! - **Class Signatures** - Formal type parameters, superclass and interfaces
//! - **Method Signatures** - Formal type parameters, parameters, return type, thrown types
//! - **Type Signatures** - A single field or value type, with type variables and wildcards
//!
//! # Grammar
//!
//! ```text
//! ClassSignature     := [TypeParameters] ClassType ClassType*
//! MethodSignature    := [TypeParameters] '(' Type* ')' (Type | 'V') ('^' (ClassType | TypeVar))*
//! TypeParameters     := '<' (Identifier ':' [RefType] (':' RefType)*)+ '>'
//! RefType            := ClassType | TypeVar | '[' Type
//! ClassType          := 'L' Name [TypeArgs] ('.' Identifier [TypeArgs])* ';'
//! TypeArgs           := '<' ('*' | '+' RefType | '-' RefType | RefType)+ '>'
//! TypeVar            := 'T' Identifier ';'
//! Type               := 'Z' | 'B' | 'C' | 'S' | 'I' | 'J' | 'F' | 'D' | RefType
//! ```
//!
//! # Examples
//!
//! ```rust
//! use classscope::metadata::signatures::{parse_method_signature, TypeSignature};
//!
//! let method_sig = parse_method_signature("<T:Ljava/lang/Object;>(TT;)TT;")?;
//! assert_eq!(method_sig.type_parameters[0].name, "T");
//! assert_eq!(method_sig.return_type, TypeSignature::TypeVariable("T".to_string()));
//! # Ok::<(), classscope::Error>(())
//! ```
//!
//! ```rust
//! use classscope::metadata::signatures::parse_method_descriptor;
//!
//! let descriptor = parse_method_descriptor("(IJ)V")?;
//! for (i, parameter) in descriptor.parameters.iter().enumerate() {
//!     println!("Parameter {}: {}", i, parameter);
//! }
//! # Ok::<(), classscope::Error>(())
//! ```
//!
//! # Implementation Notes
//!
//! - Input is trusted compiled metadata; the first grammar violation aborts parsing
//! - Nesting depth is bounded by [`MAX_RECURSION_DEPTH`]
//! - Descriptor parsing rejects every generic construct

mod encoders;
mod parser;
mod types;

pub use parser::*;
pub use types::*;

use crate::Result;

/// Parse a class signature
///
/// ## Arguments
/// * 'text' - The `Signature` attribute of a class
///
/// # Errors
/// Returns an error if the signature is malformed
pub fn parse_class_signature(text: &str) -> Result<ClassSignature> {
    let mut parser = SignatureParser::new(text);
    parser.parse_class_signature()
}

/// Parse a method signature
///
/// ## Arguments
/// * 'text' - The `Signature` attribute of a method
///
/// # Errors
/// Returns an error if the signature is malformed
pub fn parse_method_signature(text: &str) -> Result<MethodSignature> {
    let mut parser = SignatureParser::new(text);
    parser.parse_method_signature()
}

/// Parse a field type signature
///
/// ## Arguments
/// * 'text' - The `Signature` attribute of a field
///
/// # Errors
/// Returns an error if the signature is malformed
pub fn parse_type_signature(text: &str) -> Result<TypeSignature> {
    let mut parser = SignatureParser::new(text);
    parser.parse_type_signature()
}

/// Parse an erased field descriptor
///
/// ## Arguments
/// * 'text' - A field descriptor such as `[Ljava/lang/String;`
///
/// # Errors
/// Returns an error if the descriptor is malformed or contains generic constructs
pub fn parse_field_descriptor(text: &str) -> Result<TypeSignature> {
    let mut parser = SignatureParser::descriptor(text);
    parser.parse_type_signature()
}

/// Parse an erased method descriptor
///
/// ## Arguments
/// * 'text' - A method descriptor such as `(IJ)V`
///
/// # Errors
/// Returns an error if the descriptor is malformed or contains generic constructs
pub fn parse_method_descriptor(text: &str) -> Result<MethodDescriptor> {
    let mut parser = SignatureParser::descriptor(text);
    parser.parse_method_descriptor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::PrimitiveKind;

    #[test]
    fn test_parse_field_descriptors() {
        let cases = [
            ("I", TypeSignature::Primitive(PrimitiveKind::Int)),
            ("Z", TypeSignature::Primitive(PrimitiveKind::Boolean)),
            (
                "Ljava/lang/String;",
                TypeSignature::Class(ClassTypeSignature::new("java/lang/String")),
            ),
            (
                "[[D",
                TypeSignature::Array(Box::new(TypeSignature::Array(Box::new(
                    TypeSignature::Primitive(PrimitiveKind::Double),
                )))),
            ),
        ];

        for (text, expected) in cases {
            assert_eq!(parse_field_descriptor(text).unwrap(), expected, "{text}");
        }
    }

    #[test]
    fn test_identity_signature() {
        let sig = parse_method_signature("<T:Ljava/lang/Object;>(TT;)TT;").unwrap();

        assert_eq!(sig.type_parameters.len(), 1);
        assert_eq!(
            sig.type_parameters[0].class_bound,
            Some(TypeSignature::Class(ClassTypeSignature::new("java/lang/Object")))
        );
        assert_eq!(sig.parameters, vec![TypeSignature::TypeVariable("T".into())]);
        assert_eq!(sig.return_type, TypeSignature::TypeVariable("T".into()));
        assert!(sig.exceptions.is_empty());
    }

    #[test]
    fn test_method_descriptor_void_and_wide() {
        let descriptor = parse_method_descriptor("(JD)V").unwrap();
        assert_eq!(
            descriptor.parameters,
            vec![
                TypeSignature::Primitive(PrimitiveKind::Long),
                TypeSignature::Primitive(PrimitiveKind::Double)
            ]
        );
        assert_eq!(descriptor.return_type, TypeSignature::Void);
        assert!(parse_method_descriptor("(V)V").is_err());
        assert!(parse_method_descriptor("()VV").is_err());
    }

    #[test]
    fn test_non_generic_class_signature() {
        let sig = parse_class_signature("Ljava/lang/Number;Ljava/io/Serializable;").unwrap();
        assert!(sig.type_parameters.is_empty());
        assert_eq!(sig.superclass.name, "java/lang/Number");
        assert!(!sig.superclass.is_generic());
        assert_eq!(sig.interfaces[0].name, "java/io/Serializable");
    }
}
