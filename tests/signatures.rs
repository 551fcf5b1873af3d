//! Signature grammar as seen from outside the crate.

use classscope::{
    metadata::signatures::SignatureParser,
    prelude::*,
};

#[test]
fn inner_class_of_generic_outer() -> Result<()> {
    let parsed = parse_type_signature("Lapp/Outer<Ljava/lang/String;>.Inner<TT;>;")?;
    let TypeSignature::Class(class) = &parsed else {
        panic!("expected a class type, got {parsed:?}");
    };

    assert_eq!(class.name, "app/Outer$Inner");
    assert_eq!(class.simple_name(), "Inner");
    assert_eq!(class.type_arguments, vec![TypeSignature::TypeVariable("T".to_string())]);
    let outer = class.enclosing.as_ref().expect("outer part kept");
    assert_eq!(outer.name, "app/Outer");
    assert!(parsed.is_generic());

    assert_eq!(parsed.to_string(), "Lapp/Outer<Ljava/lang/String;>.Inner<TT;>;");
    Ok(())
}

#[test]
fn class_signature_with_interface_only_bound() -> Result<()> {
    let text = "<K::Ljava/lang/Comparable<TK;>;V:Ljava/lang/Object;>Ljava/util/AbstractMap<TK;TV;>;Ljava/io/Serializable;";
    let parsed = parse_class_signature(text)?;

    assert_eq!(parsed.type_parameters.len(), 2);
    assert!(parsed.type_parameters[0].class_bound.is_none());
    assert_eq!(parsed.type_parameters[0].bounds().count(), 1);
    assert_eq!(parsed.superclass.name, "java/util/AbstractMap");
    assert_eq!(parsed.interfaces[0], ClassTypeSignature::new("java/io/Serializable"));
    assert_eq!(parsed.to_string(), text);
    Ok(())
}

#[test]
fn method_signature_with_throws() -> Result<()> {
    let text = "<X:Ljava/lang/Throwable;>([[ILjava/util/List<*>;)V^TX;^Ljava/io/IOException;";
    let parsed = parse_method_signature(text)?;

    assert_eq!(parsed.parameters[0].dimensions(), 2);
    assert_eq!(parsed.return_type, TypeSignature::Void);
    assert_eq!(parsed.exceptions.len(), 2);
    assert_eq!(parsed.to_string(), text);
    Ok(())
}

#[test]
fn descriptors_reject_generic_syntax() {
    assert!(parse_method_descriptor("(ILjava/lang/String;)V").is_ok());
    assert!(parse_field_descriptor("TT;").is_err());
    assert!(parse_field_descriptor("Ljava/util/List<TT;>;").is_err());
}

#[test]
fn errors_carry_position() {
    match parse_type_signature("Ljava/util/List<Q>;") {
        Err(Error::SignatureParse {
            signature,
            position,
            ..
        }) => {
            assert_eq!(signature, "Ljava/util/List<Q>;");
            assert_eq!(position, 16);
        }
        other => panic!("unexpected {other:?}"),
    }

    assert!(parse_type_signature("Ljava/lang/String").is_err());
    assert!(parse_type_signature("Ljava/lang/String;X").is_err());
    assert!(parse_method_signature("(I").is_err());
}

#[test]
fn nesting_limit() {
    let deep = format!("{}I", "[".repeat(10));
    let mut parser = SignatureParser::new(&deep).with_max_depth(4);
    assert!(matches!(
        parser.parse_type_signature(),
        Err(Error::RecursionLimit(4))
    ));
    assert!(parse_type_signature(&deep).is_ok());
}
