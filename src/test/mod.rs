//! Class definitions and helpers shared by the unit tests.
//!
//! All fixture classes live in the `test/` package so they never collide with the
//! platform classes from [`crate::metadata::classfile::core_classes`].

use crate::{
    metadata::{
        classfile::{
            AnnotationDefinition, ClassDefinition, FieldDefinition, MemoryProvider,
            MethodDefinition,
        },
        flags::AccessFlags,
        typesystem::{Scope, TypeId},
    },
    Library, LibraryConfig,
};

/// `test/Box<T>` with a field, a getter and a setter over `T`
pub fn generic_box() -> ClassDefinition {
    ClassDefinition::class("test/Box")
        .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
        .field(FieldDefinition::new("value", "Ljava/lang/Object;").signature("TT;"))
        .field(
            FieldDefinition::new("values", "Ljava/util/List;").signature("Ljava/util/List<TT;>;"),
        )
        .method(MethodDefinition::new("<init>", "()V"))
        .method(MethodDefinition::new("get", "()Ljava/lang/Object;").signature("()TT;"))
        .method(MethodDefinition::new("set", "(Ljava/lang/Object;)V").signature("(TT;)V"))
}

/// `test/Util` with a static generic `identity` method
pub fn util() -> ClassDefinition {
    ClassDefinition::class("test/Util").method(
        MethodDefinition::new("identity", "(Ljava/lang/Object;)Ljava/lang/Object;")
            .modifiers(AccessFlags::PUBLIC | AccessFlags::STATIC)
            .signature("<T:Ljava/lang/Object;>(TT;)TT;")
            .parameter("value"),
    )
}

/// `test/LegacyList`, compiled without generics against a generic superclass
pub fn legacy_list() -> ClassDefinition {
    ClassDefinition::class("test/LegacyList")
        .extends("java/util/ArrayList")
        .method(MethodDefinition::new("first", "()Ljava/lang/Object;"))
}

/// `test/Pair<K, V>` whose parameters bound each other
pub fn mutual_bounds() -> ClassDefinition {
    ClassDefinition::class("test/Pair").signature(
        "<K::Ljava/lang/Comparable<TV;>;V::Ljava/lang/Comparable<TK;>;>Ljava/lang/Object;",
    )
}

/// `test/Outer<T>` and its non-static member class `test/Outer$Inner`
pub fn outer_inner() -> Vec<ClassDefinition> {
    let entry = |definition: ClassDefinition| {
        definition.inner_class(
            "test/Outer$Inner",
            Some("test/Outer"),
            Some("Inner"),
            AccessFlags::PUBLIC,
        )
    };

    vec![
        entry(
            ClassDefinition::class("test/Outer")
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        ),
        entry(
            ClassDefinition::class("test/Outer$Inner")
                .field(FieldDefinition::new("item", "Ljava/lang/Object;").signature("TT;"))
                .method(MethodDefinition::new("<init>", "(Ltest/Outer;)V").signature("()V"))
                .method(MethodDefinition::new("item", "()Ljava/lang/Object;").signature("()TT;")),
        ),
    ]
}

/// `test/Broken`, whose members reference a class that does not exist
pub fn broken() -> ClassDefinition {
    ClassDefinition::class("test/Broken")
        .field(FieldDefinition::new("ok", "I"))
        .field(FieldDefinition::new("missing", "Lmissing/Type;"))
        .method(MethodDefinition::new("use", "(Lmissing/Type;)V"))
}

/// `test/Info` annotation and `test/Marked`, a class carrying it
pub fn annotated() -> Vec<ClassDefinition> {
    vec![
        ClassDefinition::annotation("test/Info")
            .method(
                MethodDefinition::new("name", "()Ljava/lang/String;")
                    .modifiers(AccessFlags::PUBLIC | AccessFlags::ABSTRACT),
            )
            .method(
                MethodDefinition::new("codes", "()[I")
                    .modifiers(AccessFlags::PUBLIC | AccessFlags::ABSTRACT)
                    .default_value(vec![0]),
            ),
        ClassDefinition::class("test/Marked").annotate(
            AnnotationDefinition::new("Ltest/Info;")
                .argument("name", "marked")
                .argument("codes", vec![1, 2, 3]),
        ),
    ]
}

/// `test/CycleA$B` and `test/CycleB$A`, each claiming the other as enclosing class
pub fn enclosing_cycle() -> Vec<ClassDefinition> {
    vec![
        ClassDefinition::class("test/CycleA")
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .inner_class("test/CycleA", Some("test/CycleB"), Some("CycleA"), AccessFlags::PUBLIC),
        ClassDefinition::class("test/CycleB")
            .signature("<U:Ljava/lang/Object;>Ljava/lang/Object;")
            .inner_class("test/CycleB", Some("test/CycleA"), Some("CycleB"), AccessFlags::PUBLIC),
    ]
}

/// All fixture classes
pub fn fixture_classes() -> Vec<ClassDefinition> {
    let mut classes = vec![generic_box(), util(), legacy_list(), mutual_bounds(), broken()];
    classes.extend(outer_inner());
    classes.extend(annotated());
    classes.extend(enclosing_cycle());
    classes
}

/// Platform classes plus all fixture classes
pub fn fixture_provider() -> MemoryProvider {
    let provider = MemoryProvider::with_core_classes();
    for definition in fixture_classes() {
        provider.insert(definition);
    }
    provider
}

/// A lenient library over [`fixture_provider`]
pub fn library() -> Library {
    Library::new(fixture_provider())
}

/// A library over [`fixture_provider`] with `config`
pub fn library_with(config: LibraryConfig) -> Library {
    Library::with_config(fixture_provider(), config)
}

/// Resolve `signature` in the root scope
pub fn resolve(library: &Library, signature: &str) -> TypeId {
    let signature = library.parse_type_signature(signature).unwrap();
    library.resolve_signature(&signature, &Scope::root()).unwrap()
}
