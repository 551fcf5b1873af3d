//! Lazy loading phases, failure handling and inner classes.

use std::sync::Arc;

use classscope::prelude::*;

fn provider() -> MemoryProvider {
    MemoryProvider::with_core_classes()
        .define(
            ClassDefinition::class("app/Holder")
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                .field(FieldDefinition::new("value", "Ljava/lang/Object;").signature("TT;"))
                .field(FieldDefinition::new("lost", "Lgone/Missing;"))
                .method(MethodDefinition::new("get", "()Ljava/lang/Object;").signature("()TT;")),
        )
        .define(
            ClassDefinition::class("app/Outer")
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                .inner_class(
                    "app/Outer$Inner",
                    Some("app/Outer"),
                    Some("Inner"),
                    AccessFlags::PUBLIC,
                ),
        )
        .define(
            ClassDefinition::class("app/Outer$Inner")
                .inner_class(
                    "app/Outer$Inner",
                    Some("app/Outer"),
                    Some("Inner"),
                    AccessFlags::PUBLIC,
                )
                .field(FieldDefinition::new("item", "Ljava/lang/Object;").signature("TT;"))
                .method(MethodDefinition::new("<init>", "(Lapp/Outer;I)V").signature("(I)V"))
                .method(MethodDefinition::new("peek", "()Ljava/lang/Object;").signature("()TT;")),
        )
        .define(
            ClassDefinition::class("app/Outer$Helper")
                .inner_class(
                    "app/Outer$Helper",
                    Some("app/Outer"),
                    Some("Helper"),
                    AccessFlags::PUBLIC | AccessFlags::STATIC,
                )
                .field(FieldDefinition::new("count", "I")),
        )
        .define(
            ClassDefinition::class("app/User")
                .field(FieldDefinition::new("legacy", "Lapp/Outer$Inner;"))
                .field(FieldDefinition::new("helper", "Lapp/Outer$Helper;")),
        )
        .define(
            ClassDefinition::class("app/Garbled")
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                .field(FieldDefinition::new("ok", "I"))
                .field(
                    FieldDefinition::new("garbled", "Ljava/util/List;")
                        .signature("Ljava/util/List<;"),
                )
                .field(FieldDefinition::new("lost", "Lgone/Missing;")),
        )
        .define(
            ClassDefinition::class("app/Unbound")
                .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                .field(FieldDefinition::new("ok", "I"))
                .field(FieldDefinition::new("unbound", "Ljava/lang/Object;").signature("TU;")),
        )
        .define(
            ClassDefinition::class("app/Ping")
                .inner_class("app/Ping", Some("app/Pong"), Some("Ping"), AccessFlags::PUBLIC),
        )
        .define(
            ClassDefinition::class("app/Pong")
                .inner_class("app/Pong", Some("app/Ping"), Some("Pong"), AccessFlags::PUBLIC),
        )
        .define(
            ClassDefinition::class("app/TooMany").method(
                MethodDefinition::new("run", "(I)V").signature("(ILjava/lang/String;)V"),
            ),
        )
}

#[test]
fn phases_are_lazy_and_idempotent() -> Result<()> {
    let provider = Arc::new(provider());
    let library = Library::new(Arc::clone(&provider));

    let holder = library.get_type("app/Holder")?;
    assert_eq!(library.phase(holder)?, LoadPhase::Outline);
    assert_eq!(provider.request_count("app/Holder"), 1);

    library.base_type(holder)?;
    assert_eq!(library.phase(holder)?, LoadPhase::BaseResolved);

    for _ in 0..3 {
        assert_eq!(library.fields(holder)?.len(), 1);
        library.methods(holder)?;
        library.nested_types(holder)?;
    }
    assert_eq!(library.phase(holder)?, LoadPhase::NestedResolved);
    assert!(!library.has_pending_outline(holder)?);
    assert_eq!(library.get_type("app/Holder")?, holder);
    assert_eq!(provider.request_count("app/Holder"), 1);

    assert_eq!(library.diagnostics().count(), 1);
    Ok(())
}

#[test]
fn lenient_fields_are_reported() -> Result<()> {
    let diagnostics = Arc::new(Diagnostics::new());
    let library = Library::new(provider()).with_diagnostics(Arc::clone(&diagnostics));
    let holder = library.get_type("app/Holder")?;

    let fields = library.fields(holder)?;
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "value");

    let reported = diagnostics.for_type("app/Holder");
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].member.as_deref(), Some("lost"));
    assert_eq!(reported[0].category, DiagnosticCategory::Field);
    assert!(diagnostics.has_errors());
    Ok(())
}

#[test]
fn strict_fields_fail_without_partial_state() -> Result<()> {
    let library = Library::with_config(provider(), LibraryConfig::strict());
    let holder = library.get_type("app/Holder")?;

    for _ in 0..2 {
        match library.fields(holder) {
            Err(Error::Resolution {
                type_name,
                member,
                phase,
                source,
            }) => {
                assert_eq!(type_name, "app/Holder");
                assert_eq!(member.as_deref(), Some("lost"));
                assert_eq!(phase, LoadPhase::FieldsResolved);
                assert!(matches!(*source, Error::TypeNotFound(ref name) if name == "gone/Missing"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(library.phase(holder)?, LoadPhase::BaseResolved);
        assert!(library.has_pending_outline(holder)?);
    }

    assert!(library.base_type(holder)?.is_some());
    assert!(!library.diagnostics().has_any());
    Ok(())
}

#[test]
fn enclosing_cycle_fails_cleanly() -> Result<()> {
    let library = Library::new(provider());
    let ping = library.get_type("app/Ping")?;

    let error = library.base_type(ping).unwrap_err();
    assert!(matches!(
        error.root_cause(),
        Error::CyclicResolution { type_name, .. } if type_name == "app/Ping"
    ));
    assert_eq!(library.phase(ping)?, LoadPhase::Outline);
    assert!(library.has_pending_outline(ping)?);

    let pong = library.get_type("app/Pong")?;
    assert_eq!(library.phase(pong)?, LoadPhase::Outline);
    Ok(())
}

#[test]
fn inner_class_signature_reconciliation() -> Result<()> {
    let library = Library::new(provider());
    let outer = library.get_type("app/Outer")?;
    let inner = library.get_type("app/Outer$Inner")?;
    let t = library.generic_arguments(outer)?[0];

    assert_eq!(library.declaring_type(inner)?, Some(outer));
    assert_eq!(library.nested_types(outer)?, &[inner]);

    let constructor = library
        .methods(inner)?
        .iter()
        .find(|method| method.is_constructor())
        .expect("constructor present");
    let types: Vec<_> = constructor.parameter_types().collect();
    assert_eq!(
        types,
        vec![library.get_raw_type(outer)?, library.primitive(PrimitiveKind::Int)]
    );

    let peek = library.find_methods(inner, "peek")?;
    assert_eq!(peek[0].return_type, t);
    Ok(())
}

#[test]
fn signature_with_extra_parameters_is_malformed() -> Result<()> {
    let library = Library::new(provider());
    let too_many = library.get_type("app/TooMany")?;

    match library.methods(too_many) {
        Err(Error::Resolution {
            member, source, ..
        }) => {
            assert_eq!(member.as_deref(), Some("run(I)V"));
            assert!(matches!(*source, Error::Malformed { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[test]
fn broken_field_signatures_fail_in_lenient_mode() -> Result<()> {
    let library = Library::new(provider());
    let garbled = library.get_type("app/Garbled")?;

    for _ in 0..2 {
        match library.fields(garbled) {
            Err(Error::Resolution {
                type_name,
                member,
                phase,
                source,
            }) => {
                assert_eq!(type_name, "app/Garbled");
                assert_eq!(member.as_deref(), Some("garbled"));
                assert_eq!(phase, LoadPhase::FieldsResolved);
                assert!(matches!(
                    *source,
                    Error::SignatureParse { ref signature, .. } if signature == "Ljava/util/List<;"
                ));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(library.phase(garbled)?, LoadPhase::BaseResolved);
        assert!(library.has_pending_outline(garbled)?);
    }

    let unbound = library.get_type("app/Unbound")?;
    let error = library.fields(unbound).unwrap_err();
    assert!(matches!(
        error.root_cause(),
        Error::UnboundTypeVariable { name } if name == "U"
    ));

    assert!(!library.diagnostics().has_any());
    Ok(())
}

#[test]
fn inner_class_of_generic_outer_is_raw_without_signature() -> Result<()> {
    let library = Library::new(provider());
    let inner = library.get_type("app/Outer$Inner")?;
    let helper = library.get_type("app/Outer$Helper")?;
    let user = library.get_type("app/User")?;
    let object = library.object_type()?;

    assert!(library.is_generic_definition(inner)?);
    assert!(!library.is_closed(inner)?);
    assert!(!library.is_generic_definition(helper)?);
    assert!(library.is_closed(helper)?);

    let raw = library.get_raw_type(inner)?;
    assert_ne!(raw, inner);
    assert!(library.is_closed(raw)?);
    assert_eq!(library.erasure(inner)?, raw);

    let legacy = library.find_field(user, "legacy")?.expect("legacy declared");
    assert_eq!(legacy.field_type, raw);
    let nested = library.find_field(user, "helper")?.expect("helper declared");
    assert_eq!(nested.field_type, helper);

    let item = library.find_field(legacy.field_type, "item")?.expect("item declared");
    assert_eq!(item.field_type, object);
    assert!(library.is_closed(item.field_type)?);

    let peek = library.find_methods(raw, "peek")?;
    assert_eq!(peek[0].return_type, object);
    Ok(())
}
