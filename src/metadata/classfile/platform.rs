//! Minimal model of the platform classes every compilation unit depends on.
//!
//! A real embedder points the library at the runtime's class files. For tests, benches
//! and small tools, [`MemoryProvider::with_core_classes`] supplies the subset of
//! `java.lang`, `java.io`, `java.util` and `java.lang.annotation` that the type system
//! itself touches: the root class, the boxed primitives, `String`, `Enum`, the
//! collection interfaces used in signatures and the retention annotations. Members are
//! limited to what exercises generic signatures, bridges and constants.

use crate::metadata::{
    classfile::{
        AnnotationDefinition, ClassDefinition, ElementDefinition, FieldDefinition,
        MemoryProvider, MethodDefinition,
    },
    flags::AccessFlags,
    typesystem::{ConstantValue, PrimitiveKind},
};

const PUBLIC_ABSTRACT: AccessFlags = AccessFlags::PUBLIC.union(AccessFlags::ABSTRACT);
const PUBLIC_STATIC_FINAL: AccessFlags = AccessFlags::PUBLIC
    .union(AccessFlags::STATIC)
    .union(AccessFlags::FINAL);

fn object() -> ClassDefinition {
    ClassDefinition::class("java/lang/Object")
        .without_super()
        .method(MethodDefinition::new("<init>", "()V"))
        .method(MethodDefinition::new("toString", "()Ljava/lang/String;"))
        .method(MethodDefinition::new("equals", "(Ljava/lang/Object;)Z"))
        .method(MethodDefinition::new("hashCode", "()I"))
        .method(
            MethodDefinition::new("getClass", "()Ljava/lang/Class;")
                .modifiers(AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::NATIVE)
                .signature("()Ljava/lang/Class<*>;"),
        )
        .method(
            MethodDefinition::new("clone", "()Ljava/lang/Object;")
                .modifiers(AccessFlags::PROTECTED | AccessFlags::NATIVE)
                .throws("java/lang/CloneNotSupportedException"),
        )
}

fn throwables() -> Vec<ClassDefinition> {
    vec![
        ClassDefinition::class("java/lang/Throwable")
            .implements("java/io/Serializable")
            .method(MethodDefinition::new("getMessage", "()Ljava/lang/String;")),
        ClassDefinition::class("java/lang/Exception").extends("java/lang/Throwable"),
        ClassDefinition::class("java/lang/RuntimeException").extends("java/lang/Exception"),
        ClassDefinition::class("java/lang/CloneNotSupportedException")
            .extends("java/lang/Exception"),
        ClassDefinition::class("java/io/IOException").extends("java/lang/Exception"),
    ]
}

fn comparable() -> ClassDefinition {
    ClassDefinition::interface("java/lang/Comparable")
        .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
        .method(
            MethodDefinition::new("compareTo", "(Ljava/lang/Object;)I")
                .modifiers(PUBLIC_ABSTRACT)
                .signature("(TT;)I"),
        )
}

fn string() -> ClassDefinition {
    ClassDefinition::class("java/lang/String")
        .modifiers(AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::SUPER)
        .signature(
            "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/String;>;Ljava/lang/CharSequence;",
        )
        .implements("java/io/Serializable")
        .implements("java/lang/Comparable")
        .implements("java/lang/CharSequence")
        .method(MethodDefinition::new("length", "()I"))
        .method(MethodDefinition::new("compareTo", "(Ljava/lang/String;)I"))
        .method(
            MethodDefinition::new("compareTo", "(Ljava/lang/Object;)I").modifiers(
                AccessFlags::PUBLIC | AccessFlags::BRIDGE | AccessFlags::SYNTHETIC,
            ),
        )
        .method(
            MethodDefinition::new("valueOf", "(I)Ljava/lang/String;")
                .modifiers(AccessFlags::PUBLIC | AccessFlags::STATIC),
        )
}

fn boxed(kind: PrimitiveKind, name: &str, numeric: bool) -> ClassDefinition {
    let descriptor = kind.descriptor();
    let super_name = if numeric {
        "java/lang/Number"
    } else {
        "java/lang/Object"
    };

    ClassDefinition::class(name)
        .modifiers(AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::SUPER)
        .extends(super_name)
        .signature(&format!(
            "L{super_name};Ljava/io/Serializable;Ljava/lang/Comparable<L{name};>;"
        ))
        .implements("java/io/Serializable")
        .implements("java/lang/Comparable")
        .field(
            FieldDefinition::new("TYPE", "Ljava/lang/Class;")
                .modifiers(PUBLIC_STATIC_FINAL)
                .signature(&format!("Ljava/lang/Class<L{name};>;")),
        )
        .method(MethodDefinition::new(
            &format!("{kind}Value"),
            &format!("(){descriptor}"),
        ))
        .method(
            MethodDefinition::new("valueOf", &format!("({descriptor})L{name};"))
                .modifiers(AccessFlags::PUBLIC | AccessFlags::STATIC),
        )
        .method(MethodDefinition::new("compareTo", &format!("(L{name};)I")))
}

fn wrappers() -> Vec<ClassDefinition> {
    let number = ClassDefinition::class("java/lang/Number")
        .modifiers(PUBLIC_ABSTRACT | AccessFlags::SUPER)
        .implements("java/io/Serializable")
        .method(MethodDefinition::new("intValue", "()I").modifiers(PUBLIC_ABSTRACT))
        .method(MethodDefinition::new("longValue", "()J").modifiers(PUBLIC_ABSTRACT))
        .method(MethodDefinition::new("doubleValue", "()D").modifiers(PUBLIC_ABSTRACT));

    let integer = boxed(PrimitiveKind::Int, "java/lang/Integer", true)
        .field(
            FieldDefinition::new("MIN_VALUE", "I")
                .modifiers(PUBLIC_STATIC_FINAL)
                .constant(ConstantValue::Int(i32::MIN)),
        )
        .field(
            FieldDefinition::new("MAX_VALUE", "I")
                .modifiers(PUBLIC_STATIC_FINAL)
                .constant(ConstantValue::Int(i32::MAX)),
        );

    let long = boxed(PrimitiveKind::Long, "java/lang/Long", true).field(
        FieldDefinition::new("MAX_VALUE", "J")
            .modifiers(PUBLIC_STATIC_FINAL)
            .constant(ConstantValue::Long(i64::MAX)),
    );

    vec![
        number,
        boxed(PrimitiveKind::Boolean, "java/lang/Boolean", false),
        boxed(PrimitiveKind::Char, "java/lang/Character", false),
        boxed(PrimitiveKind::Byte, "java/lang/Byte", true),
        boxed(PrimitiveKind::Short, "java/lang/Short", true),
        integer,
        long,
        boxed(PrimitiveKind::Float, "java/lang/Float", true),
        boxed(PrimitiveKind::Double, "java/lang/Double", true),
        ClassDefinition::class("java/lang/Void")
            .modifiers(AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::SUPER)
            .field(
                FieldDefinition::new("TYPE", "Ljava/lang/Class;")
                    .modifiers(PUBLIC_STATIC_FINAL)
                    .signature("Ljava/lang/Class<Ljava/lang/Void;>;"),
            ),
    ]
}

fn lang() -> Vec<ClassDefinition> {
    vec![
        ClassDefinition::class("java/lang/Class")
            .modifiers(AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::SUPER)
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/io/Serializable;")
            .implements("java/io/Serializable")
            .method(MethodDefinition::new("getName", "()Ljava/lang/String;"))
            .method(
                MethodDefinition::new("cast", "(Ljava/lang/Object;)Ljava/lang/Object;")
                    .signature("(Ljava/lang/Object;)TT;"),
            ),
        ClassDefinition::interface("java/io/Serializable"),
        ClassDefinition::interface("java/lang/Cloneable"),
        ClassDefinition::interface("java/lang/CharSequence")
            .method(MethodDefinition::new("length", "()I").modifiers(PUBLIC_ABSTRACT))
            .method(MethodDefinition::new("charAt", "(I)C").modifiers(PUBLIC_ABSTRACT)),
        ClassDefinition::interface("java/lang/Runnable")
            .method(MethodDefinition::new("run", "()V").modifiers(PUBLIC_ABSTRACT)),
        ClassDefinition::class("java/lang/Enum")
            .modifiers(PUBLIC_ABSTRACT | AccessFlags::SUPER)
            .signature(
                "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;",
            )
            .implements("java/lang/Comparable")
            .implements("java/io/Serializable")
            .method(
                MethodDefinition::new("<init>", "(Ljava/lang/String;I)V")
                    .modifiers(AccessFlags::PROTECTED),
            )
            .method(
                MethodDefinition::new("name", "()Ljava/lang/String;")
                    .modifiers(AccessFlags::PUBLIC | AccessFlags::FINAL),
            )
            .method(
                MethodDefinition::new("ordinal", "()I")
                    .modifiers(AccessFlags::PUBLIC | AccessFlags::FINAL),
            )
            .method(
                MethodDefinition::new("compareTo", "(Ljava/lang/Enum;)I")
                    .modifiers(AccessFlags::PUBLIC | AccessFlags::FINAL)
                    .signature("(TE;)I"),
            )
            .method(
                MethodDefinition::new(
                    "valueOf",
                    "(Ljava/lang/Class;Ljava/lang/String;)Ljava/lang/Enum;",
                )
                .modifiers(AccessFlags::PUBLIC | AccessFlags::STATIC)
                .signature("<T:Ljava/lang/Enum<TT;>;>(Ljava/lang/Class<TT;>;Ljava/lang/String;)TT;"),
            ),
    ]
}

fn collections() -> Vec<ClassDefinition> {
    vec![
        ClassDefinition::interface("java/lang/Iterable")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(
                MethodDefinition::new("iterator", "()Ljava/util/Iterator;")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("()Ljava/util/Iterator<TT;>;"),
            ),
        ClassDefinition::interface("java/util/Iterator")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(MethodDefinition::new("hasNext", "()Z").modifiers(PUBLIC_ABSTRACT))
            .method(
                MethodDefinition::new("next", "()Ljava/lang/Object;")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("()TE;"),
            ),
        ClassDefinition::interface("java/util/Collection")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;")
            .implements("java/lang/Iterable")
            .method(MethodDefinition::new("size", "()I").modifiers(PUBLIC_ABSTRACT))
            .method(
                MethodDefinition::new("add", "(Ljava/lang/Object;)Z")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("(TE;)Z"),
            )
            .method(
                MethodDefinition::new("addAll", "(Ljava/util/Collection;)Z")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("(Ljava/util/Collection<+TE;>;)Z"),
            ),
        ClassDefinition::interface("java/util/List")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;")
            .implements("java/util/Collection")
            .method(
                MethodDefinition::new("get", "(I)Ljava/lang/Object;")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("(I)TE;"),
            ),
        ClassDefinition::interface("java/util/Set")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;")
            .implements("java/util/Collection"),
        ClassDefinition::class("java/util/ArrayList")
            .signature(
                "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;Ljava/lang/Cloneable;Ljava/io/Serializable;",
            )
            .implements("java/util/List")
            .implements("java/lang/Cloneable")
            .implements("java/io/Serializable")
            .field(
                FieldDefinition::new("elementData", "[Ljava/lang/Object;")
                    .modifiers(AccessFlags::TRANSIENT),
            )
            .field(FieldDefinition::new("size", "I").modifiers(AccessFlags::PRIVATE))
            .method(MethodDefinition::new("<init>", "()V"))
            .method(MethodDefinition::new("size", "()I"))
            .method(
                MethodDefinition::new("get", "(I)Ljava/lang/Object;").signature("(I)TE;"),
            )
            .method(
                MethodDefinition::new("add", "(Ljava/lang/Object;)Z").signature("(TE;)Z"),
            ),
        ClassDefinition::interface("java/util/Map")
            .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
            .inner_class(
                "java/util/Map$Entry",
                Some("java/util/Map"),
                Some("Entry"),
                PUBLIC_ABSTRACT | AccessFlags::STATIC | AccessFlags::INTERFACE,
            )
            .method(
                MethodDefinition::new("get", "(Ljava/lang/Object;)Ljava/lang/Object;")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("(Ljava/lang/Object;)TV;"),
            )
            .method(
                MethodDefinition::new(
                    "put",
                    "(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;",
                )
                .modifiers(PUBLIC_ABSTRACT)
                .signature("(TK;TV;)TV;"),
            )
            .method(
                MethodDefinition::new("entrySet", "()Ljava/util/Set;")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("()Ljava/util/Set<Ljava/util/Map$Entry<TK;TV;>;>;"),
            ),
        ClassDefinition::interface("java/util/Map$Entry")
            .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
            .inner_class(
                "java/util/Map$Entry",
                Some("java/util/Map"),
                Some("Entry"),
                PUBLIC_ABSTRACT | AccessFlags::STATIC | AccessFlags::INTERFACE,
            )
            .method(
                MethodDefinition::new("getKey", "()Ljava/lang/Object;")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("()TK;"),
            )
            .method(
                MethodDefinition::new("getValue", "()Ljava/lang/Object;")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("()TV;"),
            ),
    ]
}

fn annotations() -> Vec<ClassDefinition> {
    let runtime = AnnotationDefinition::new("Ljava/lang/annotation/Retention;").argument(
        "value",
        ElementDefinition::enumeration("Ljava/lang/annotation/RetentionPolicy;", "RUNTIME"),
    );

    let policy = "Ljava/lang/annotation/RetentionPolicy;";
    let constant = |name: &str| {
        FieldDefinition::new(name, policy)
            .modifiers(PUBLIC_STATIC_FINAL | AccessFlags::ENUM)
    };

    vec![
        ClassDefinition::interface("java/lang/annotation/Annotation")
            .method(
                MethodDefinition::new("annotationType", "()Ljava/lang/Class;")
                    .modifiers(PUBLIC_ABSTRACT)
                    .signature("()Ljava/lang/Class<+Ljava/lang/annotation/Annotation;>;"),
            ),
        ClassDefinition::enumeration("java/lang/annotation/RetentionPolicy")
            .field(constant("SOURCE"))
            .field(constant("CLASS"))
            .field(constant("RUNTIME"))
            .method(
                MethodDefinition::new("<init>", "(Ljava/lang/String;I)V")
                    .modifiers(AccessFlags::PRIVATE)
                    .signature("()V"),
            ),
        ClassDefinition::annotation("java/lang/annotation/Retention")
            .annotate(runtime.clone())
            .method(
                MethodDefinition::new("value", "()Ljava/lang/annotation/RetentionPolicy;")
                    .modifiers(PUBLIC_ABSTRACT),
            ),
        ClassDefinition::annotation("java/lang/Deprecated")
            .annotate(runtime)
            .method(
                MethodDefinition::new("since", "()Ljava/lang/String;")
                    .modifiers(PUBLIC_ABSTRACT)
                    .default_value(""),
            )
            .method(
                MethodDefinition::new("forRemoval", "()Z")
                    .modifiers(PUBLIC_ABSTRACT)
                    .default_value(false),
            ),
    ]
}

/// Definitions of the platform classes modelled by this module
#[must_use]
pub fn core_classes() -> Vec<ClassDefinition> {
    let mut classes = vec![object(), comparable(), string()];
    classes.extend(throwables());
    classes.extend(wrappers());
    classes.extend(lang());
    classes.extend(collections());
    classes.extend(annotations());
    classes
}

impl MemoryProvider {
    /// A provider preloaded with [`core_classes`]
    #[must_use]
    pub fn with_core_classes() -> Self {
        let provider = MemoryProvider::new();
        for definition in core_classes() {
            provider.insert(definition);
        }
        provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        classfile::{ClassProvider, OutlineCollector},
        signatures::{
            parse_class_signature, parse_method_descriptor, parse_method_signature,
            parse_type_signature,
        },
    };

    #[test]
    fn test_core_definitions_are_well_formed() {
        let provider = MemoryProvider::with_core_classes();
        assert_eq!(provider.len(), core_classes().len());

        for definition in core_classes() {
            let mut collector = OutlineCollector::new();
            assert!(provider.visit_class(&definition.name, &mut collector).unwrap());
            let class = collector.finish().unwrap();

            if let Some(signature) = &class.signature {
                parse_class_signature(signature).unwrap();
            }
            for field in &class.fields {
                if let Some(signature) = &field.signature {
                    parse_type_signature(signature).unwrap();
                }
            }
            for method in &class.methods {
                parse_method_descriptor(&method.descriptor).unwrap();
                if let Some(signature) = &method.signature {
                    parse_method_signature(signature).unwrap();
                }
            }
        }
    }

    #[test]
    fn test_referenced_classes_are_present() {
        let provider = MemoryProvider::with_core_classes();
        for name in [
            "java/lang/Object",
            "java/lang/Integer",
            "java/lang/Character",
            "java/util/Map$Entry",
            "java/lang/annotation/RetentionPolicy",
            "java/lang/CloneNotSupportedException",
        ] {
            assert!(provider.contains(name), "{name}");
        }
    }
}
