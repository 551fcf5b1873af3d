//! Lazy phases of classes loaded from the provider.
//!
//! A [`ClassNode`] is created with nothing but its outline. Each query that needs more
//! runs [`Library::ensure_phase`], which advances the node one [`LoadPhase`] at a time:
//!
//! 1. **Base** - formal type parameters (declared, then bounded), superclass,
//!    interfaces and class annotations
//! 2. **Fields** - field types, constant values and annotations
//! 3. **Methods** - method type parameters, parameter, return and thrown types,
//!    annotations, parameter annotations and annotation defaults
//! 4. **Nested** - member classes named by the `InnerClasses` attribute
//!
//! # Failure and cycles
//!
//! A phase takes its slice of the outline out of the node, runs without holding the
//! node lock, and publishes its results only on success. On failure the slice is put
//! back and the node stays in its previous phase, so a later request retries from
//! scratch. Re-entering a phase that the current thread is already running fails with
//! [`crate::Error::CyclicResolution`]; other threads wait for the running phase.

use std::thread;

use crate::{
    metadata::{
        annotations::{resolve_annotation, resolve_default_value, AnnotationRecord, AnnotationValue},
        classfile::{RawField, RawInnerClass, RawMethod},
        diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity},
        members::{FieldInfo, MethodInfo, ParameterInfo},
        signatures::TypeSignature,
        typesystem::{
            node::{BaseInput, BaseTypes, ClassNode, PhaseInput},
            GenericOwner, Library, LoadPhase, Scope, TypeId, TypeInfo, TypeKind,
        },
    },
    Error::{self, CyclicResolution, Resolution},
    Result,
};

impl Library {
    /// Run the lazy phases of a class up to and including `target`.
    ///
    /// Types other than classes loaded from the provider have no phases and return
    /// immediately.
    ///
    /// ## Arguments
    /// * 'id'     - The type to advance
    /// * 'target' - The phase that must be complete on return
    ///
    /// # Errors
    /// Returns [`crate::Error::Resolution`] if a phase fails and
    /// [`crate::Error::CyclicResolution`] if the phase is already running on this thread
    pub fn ensure_phase(&self, id: TypeId, target: LoadPhase) -> Result<()> {
        let info = self.info(id)?;
        let TypeKind::Class(node) = &info.kind else {
            return Ok(());
        };

        loop {
            let (phase, input) = {
                let mut load = lock!(node.load);
                loop {
                    if load.phase >= target {
                        return Ok(());
                    }
                    match load.busy {
                        Some((phase, owner)) if owner == thread::current().id() => {
                            return Err(CyclicResolution {
                                type_name: info.name.clone(),
                                phase,
                            });
                        }
                        Some(_) => load = wait!(node.ready, load),
                        None => break,
                    }
                }

                let Some(phase) = load.phase.next() else {
                    return Ok(());
                };
                let input = load.pending.take(phase);
                load.busy = Some((phase, thread::current().id()));
                (phase, input)
            };

            tracing::debug!(class = %info.name, %phase, "resolving");
            let result = match &input {
                Some(input) => self.run_phase(info, node, input),
                None => Err(malformed_error!(
                    "Outline of '{}' has no input left for {}",
                    info.name,
                    phase
                )),
            };

            let mut load = lock!(node.load);
            load.busy = None;
            match result {
                Ok(()) => load.phase = phase,
                Err(_) => {
                    if let Some(input) = input {
                        load.pending.restore(input);
                    }
                }
            }
            drop(load);
            node.ready.notify_all();

            if let Err(error) = result {
                tracing::debug!(class = %info.name, %phase, %error, "phase failed");
                return Err(wrap_phase_error(info, phase, error));
            }
        }
    }

    /// The last completed phase of a class; other types report
    /// [`LoadPhase::NestedResolved`]
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn phase(&self, id: TypeId) -> Result<LoadPhase> {
        match &self.info(id)?.kind {
            TypeKind::Class(node) => Ok(lock!(node.load).phase),
            _ => Ok(LoadPhase::NestedResolved),
        }
    }

    /// `true` while part of the raw outline of a class is still held for base, field or
    /// method resolution
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this library
    pub fn has_pending_outline(&self, id: TypeId) -> Result<bool> {
        match &self.info(id)?.kind {
            TypeKind::Class(node) => Ok(!lock!(node.load).pending.is_released()),
            _ => Ok(false),
        }
    }

    fn run_phase(&self, info: &TypeInfo, node: &ClassNode, input: &PhaseInput) -> Result<()> {
        match input {
            PhaseInput::Base(base) => {
                let resolved = self.resolve_base(info.id, node, base)?;
                let _ = node.formal_count.set(resolved.generic_parameters.len());
                let _ = node.base.set(resolved);
            }
            PhaseInput::Fields(fields) => {
                let resolved = self.resolve_fields(info, fields)?;
                let _ = node.fields.set(resolved);
            }
            PhaseInput::Methods(methods) => {
                let resolved = self.resolve_methods(info, methods)?;
                let _ = node.methods.set(resolved);
            }
            PhaseInput::Nested(inner_classes) => {
                let resolved = self.resolve_nested(info, inner_classes)?;
                let _ = node.nested.set(resolved);
            }
        }
        Ok(())
    }

    /// The base phase results of a class, running the phase if needed
    pub(crate) fn class_base(&self, id: TypeId) -> Result<&BaseTypes> {
        self.ensure_phase(id, LoadPhase::BaseResolved)?;
        self.class_node(id)?
            .base
            .get()
            .ok_or_else(|| malformed_error!("Base types of {} missing after resolution", id))
    }

    pub(crate) fn class_fields(&self, id: TypeId) -> Result<&[FieldInfo]> {
        self.ensure_phase(id, LoadPhase::FieldsResolved)?;
        self.class_node(id)?
            .fields
            .get()
            .map(Vec::as_slice)
            .ok_or_else(|| malformed_error!("Fields of {} missing after resolution", id))
    }

    pub(crate) fn class_methods(&self, id: TypeId) -> Result<&[MethodInfo]> {
        self.ensure_phase(id, LoadPhase::MethodsResolved)?;
        self.class_node(id)?
            .methods
            .get()
            .map(Vec::as_slice)
            .ok_or_else(|| malformed_error!("Methods of {} missing after resolution", id))
    }

    pub(crate) fn class_nested(&self, id: TypeId) -> Result<&[TypeId]> {
        self.ensure_phase(id, LoadPhase::NestedResolved)?;
        self.class_node(id)?
            .nested
            .get()
            .map(Vec::as_slice)
            .ok_or_else(|| malformed_error!("Nested types of {} missing after resolution", id))
    }

    /// Scope of the class that encloses an inner (non-static) class
    fn enclosing_scope(&self, node: &ClassNode) -> Result<Scope> {
        match node.enclosing_name() {
            Some(outer) if !node.modifiers().is_static() => {
                let outer = self.get_type(outer)?;
                Ok(self.class_base(outer)?.scope.clone())
            }
            _ => Ok(Scope::root()),
        }
    }

    fn resolve_base(&self, id: TypeId, node: &ClassNode, input: &BaseInput) -> Result<BaseTypes> {
        let parent = self.enclosing_scope(node)?;
        let has_base = input.super_name.is_some() && !node.is_interface();

        let (scope, generic_parameters, base_type, interfaces) = match node.signature() {
            Some(text) => {
                let signature = self.parse_class_signature(text)?;
                let (scope, generic_parameters) = self.declare_type_parameters(
                    &signature.type_parameters,
                    &parent,
                    &GenericOwner::Type(id),
                )?;

                let base_type = if has_base {
                    Some(self.resolve_class_type(&signature.superclass, &scope)?)
                } else {
                    None
                };
                let interfaces = signature
                    .interfaces
                    .iter()
                    .map(|interface| self.resolve_class_type(interface, &scope))
                    .collect::<Result<Vec<_>>>()?;

                (scope, generic_parameters, base_type, interfaces)
            }
            None => {
                let base_type = match &input.super_name {
                    Some(name) if has_base => Some(self.coerce_raw(self.get_type(name)?)?),
                    _ => None,
                };
                let interfaces = input
                    .interfaces
                    .iter()
                    .map(|name| self.coerce_raw(self.get_type(name)?))
                    .collect::<Result<Vec<_>>>()?;

                (parent, Vec::new(), base_type, interfaces)
            }
        };

        Ok(BaseTypes {
            base_type,
            interfaces,
            generic_parameters,
            annotations: self.resolve_annotations(&input.annotations)?,
            scope,
        })
    }

    fn resolve_fields(&self, info: &TypeInfo, raw: &[RawField]) -> Result<Vec<FieldInfo>> {
        let scope = self.class_base(info.id)?.scope.clone();

        let mut fields = Vec::with_capacity(raw.len());
        let mut skipped = Vec::new();
        for field in raw {
            match self.resolve_field(info.id, field, &scope) {
                Ok(resolved) => fields.push(resolved),
                Err(error) if self.config().strict_fields || is_metadata_error(&error) => {
                    return Err(Resolution {
                        type_name: info.name.clone(),
                        member: Some(field.name.clone()),
                        phase: LoadPhase::FieldsResolved,
                        source: Box::new(error),
                    });
                }
                Err(error) => skipped.push((field, error)),
            }
        }

        // Reported only once the phase succeeds
        for (field, error) in skipped {
            tracing::warn!(
                class = %info.name,
                field = %field.name,
                %error,
                "skipping field"
            );
            self.diagnostics().push(
                Diagnostic::new(
                    DiagnosticSeverity::Error,
                    DiagnosticCategory::Field,
                    format!("Failed to resolve field type: {error}"),
                )
                .with_type(info.name.as_str())
                .with_member(field.name.as_str()),
            );
        }
        Ok(fields)
    }

    fn resolve_field(
        &self,
        declaring_type: TypeId,
        field: &RawField,
        scope: &Scope,
    ) -> Result<FieldInfo> {
        let field_type = match &field.signature {
            Some(signature) => {
                let signature = self.parse_type_signature(signature)?;
                self.resolve_signature(&signature, scope)?
            }
            None => self.type_from_descriptor(&field.descriptor)?,
        };

        Ok(FieldInfo {
            declaring_type,
            modifiers: field.modifiers,
            name: field.name.clone(),
            field_type,
            descriptor: field.descriptor.clone(),
            signature: field.signature.clone(),
            constant_value: field.constant.clone(),
            annotations: self.resolve_annotations(&field.annotations)?,
        })
    }

    fn resolve_methods(&self, info: &TypeInfo, raw: &[RawMethod]) -> Result<Vec<MethodInfo>> {
        let scope = self.class_base(info.id)?.scope.clone();

        raw.iter()
            .map(|method| {
                self.resolve_method(info.id, method, &scope)
                    .map_err(|error| Resolution {
                        type_name: info.name.clone(),
                        member: Some(format!("{}{}", method.name, method.descriptor)),
                        phase: LoadPhase::MethodsResolved,
                        source: Box::new(error),
                    })
            })
            .collect()
    }

    fn resolve_method(
        &self,
        declaring_type: TypeId,
        method: &RawMethod,
        class_scope: &Scope,
    ) -> Result<MethodInfo> {
        let descriptor = self.parse_method_descriptor(&method.descriptor)?;
        let root = Scope::root();

        let text = method.signature.as_deref();
        let (generic_arguments, parameter_types, return_type, exceptions) = match text {
            Some(text) => {
                let signature = self.parse_method_signature(text)?;
                let owner = GenericOwner::Method {
                    declaring_type,
                    name: method.name.clone(),
                    descriptor: method.descriptor.clone(),
                };
                let (scope, generic_arguments) =
                    self.declare_type_parameters(&signature.type_parameters, class_scope, &owner)?;

                let declared = signature.parameters.len();
                let Some(synthetic) = descriptor.parameters.len().checked_sub(declared) else {
                    return Err(malformed_error!(
                        "Signature of {} declares {} parameters, descriptor {} only has {}",
                        method.name,
                        declared,
                        method.descriptor,
                        descriptor.parameters.len()
                    ));
                };

                let mut parameter_types = Vec::with_capacity(descriptor.parameters.len());
                for parameter in &descriptor.parameters[..synthetic] {
                    parameter_types.push(self.resolve_signature(parameter, &root)?);
                }
                for parameter in &signature.parameters {
                    parameter_types.push(self.resolve_signature(parameter, &scope)?);
                }

                let return_type = self.resolve_signature(&signature.return_type, &scope)?;
                let exceptions = if signature.exceptions.is_empty() {
                    self.resolve_exception_names(&method.exceptions)?
                } else {
                    self.resolve_all(&signature.exceptions, &scope)?
                };

                (generic_arguments, parameter_types, return_type, exceptions)
            }
            None => (
                Vec::new(),
                self.resolve_all(&descriptor.parameters, &root)?,
                self.resolve_signature(&descriptor.return_type, &root)?,
                self.resolve_exception_names(&method.exceptions)?,
            ),
        };

        let mut parameters = Vec::with_capacity(parameter_types.len());
        for (position, parameter_type) in parameter_types.into_iter().enumerate() {
            let declared = method.parameters.get(position);
            let annotations = method
                .parameter_annotations
                .iter()
                .filter(|(index, _)| *index == position)
                .map(|(_, record)| resolve_annotation(self, record))
                .collect::<Result<Vec<_>>>()?;

            parameters.push(ParameterInfo {
                position,
                name: declared.and_then(|parameter| parameter.name.clone()),
                modifiers: declared.map(|parameter| parameter.modifiers).unwrap_or_default(),
                parameter_type,
                annotations,
            });
        }

        let default_value = match &method.default_value {
            Some(record) => Some(resolve_default_value(self, record)?),
            None => None,
        };

        Ok(MethodInfo {
            declaring_type,
            modifiers: method.modifiers,
            name: method.name.clone(),
            descriptor: method.descriptor.clone(),
            signature: method.signature.clone(),
            generic_arguments,
            return_type,
            parameters,
            exceptions,
            annotations: self.resolve_annotations(&method.annotations)?,
            default_value,
        })
    }

    fn resolve_all(&self, signatures: &[TypeSignature], scope: &Scope) -> Result<Vec<TypeId>> {
        signatures
            .iter()
            .map(|signature| self.resolve_signature(signature, scope))
            .collect()
    }

    fn resolve_exception_names(&self, names: &[String]) -> Result<Vec<TypeId>> {
        names
            .iter()
            .map(|name| self.coerce_raw(self.get_type(name)?))
            .collect()
    }

    fn resolve_nested(
        &self,
        info: &TypeInfo,
        inner_classes: &[RawInnerClass],
    ) -> Result<Vec<TypeId>> {
        inner_classes
            .iter()
            .filter(|entry| entry.outer_name.as_deref() == Some(info.name.as_str()))
            .filter(|entry| entry.name != info.name)
            .map(|entry| self.get_type(&entry.name))
            .collect()
    }

    pub(crate) fn resolve_annotations(
        &self,
        records: &[AnnotationRecord],
    ) -> Result<Vec<AnnotationValue>> {
        records
            .iter()
            .map(|record| resolve_annotation(self, record))
            .collect()
    }
}

/// Grammar and scoping failures in a member's own metadata; never downgraded to a
/// diagnostic
fn is_metadata_error(error: &Error) -> bool {
    matches!(
        error,
        Error::SignatureParse { .. }
            | Error::UnboundTypeVariable { .. }
            | Error::RecursionLimit(_)
            | Error::CyclicResolution { .. }
    )
}

/// Attach class and phase context, unless the phase already did so for a member
fn wrap_phase_error(info: &TypeInfo, phase: LoadPhase, error: Error) -> Error {
    match &error {
        Resolution {
            type_name,
            phase: failed,
            ..
        } if *type_name == info.name && *failed == phase => error,
        _ => Resolution {
            type_name: info.name.clone(),
            member: None,
            phase,
            source: Box::new(error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::classfile::{ClassDefinition, FieldDefinition, MemoryProvider, MethodDefinition},
        LibraryConfig,
    };

    fn provider() -> MemoryProvider {
        MemoryProvider::with_core_classes()
            .define(
                ClassDefinition::class("test/Holder")
                    .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                    .field(FieldDefinition::new("value", "Ljava/lang/Object;").signature("TT;"))
                    .field(FieldDefinition::new("broken", "Lmissing/Type;"))
                    .method(
                        MethodDefinition::new("get", "()Ljava/lang/Object;").signature("()TT;"),
                    ),
            )
    }

    #[test]
    fn test_phases_advance_in_order() {
        let library = Library::new(provider());
        let holder = library.get_type("test/Holder").unwrap();
        assert_eq!(library.phase(holder).unwrap(), LoadPhase::Outline);
        assert!(library.has_pending_outline(holder).unwrap());

        library.ensure_phase(holder, LoadPhase::FieldsResolved).unwrap();
        assert_eq!(library.phase(holder).unwrap(), LoadPhase::FieldsResolved);
        assert!(library.has_pending_outline(holder).unwrap());

        library.ensure_phase(holder, LoadPhase::MethodsResolved).unwrap();
        assert!(!library.has_pending_outline(holder).unwrap());

        library.ensure_phase(holder, LoadPhase::Outline).unwrap();
        assert_eq!(library.phase(holder).unwrap(), LoadPhase::MethodsResolved);
    }

    #[test]
    fn test_lenient_fields_report_diagnostics_once() {
        let library = Library::new(provider());
        let holder = library.get_type("test/Holder").unwrap();

        let fields = library.class_fields(holder).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "value");
        library.class_fields(holder).unwrap();

        let errors = library.diagnostics().by_category(DiagnosticCategory::Field);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].member.as_deref(), Some("broken"));
        assert_eq!(errors[0].type_name.as_deref(), Some("test/Holder"));
    }

    #[test]
    fn test_strict_fields_fail_and_retry() {
        let library = Library::with_config(provider(), LibraryConfig::strict());
        let holder = library.get_type("test/Holder").unwrap();

        for _ in 0..2 {
            match library.ensure_phase(holder, LoadPhase::FieldsResolved) {
                Err(Error::Resolution {
                    type_name,
                    member,
                    phase,
                    source,
                }) => {
                    assert_eq!(type_name, "test/Holder");
                    assert_eq!(member.as_deref(), Some("broken"));
                    assert_eq!(phase, LoadPhase::FieldsResolved);
                    assert!(matches!(*source, Error::TypeNotFound(_)));
                }
                other => panic!("unexpected {other:?}"),
            }
            assert_eq!(library.phase(holder).unwrap(), LoadPhase::BaseResolved);
        }
        assert!(!library.diagnostics().has_any());
    }

    #[test]
    fn test_lenient_fields_keep_signature_errors_fatal() {
        let library = Library::new(MemoryProvider::with_core_classes().define(
            ClassDefinition::class("test/Garbled")
                .field(FieldDefinition::new("lost", "Lmissing/Type;"))
                .field(FieldDefinition::new("deep", "Ljava/lang/Object;").signature("TX;")),
        ));
        let garbled = library.get_type("test/Garbled").unwrap();

        match library.ensure_phase(garbled, LoadPhase::FieldsResolved) {
            Err(Error::Resolution { member, phase, source, .. }) => {
                assert_eq!(member.as_deref(), Some("deep"));
                assert_eq!(phase, LoadPhase::FieldsResolved);
                assert!(matches!(*source, Error::UnboundTypeVariable { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(library.phase(garbled).unwrap(), LoadPhase::BaseResolved);
        assert!(library.ensure_phase(garbled, LoadPhase::FieldsResolved).is_err());
        assert!(!library.diagnostics().has_any());
    }

    #[test]
    fn test_method_generic_scope() {
        let library = Library::new(provider());
        let holder = library.get_type("test/Holder").unwrap();
        let parameter = library.class_base(holder).unwrap().generic_parameters[0];

        let methods = library.class_methods(holder).unwrap();
        assert_eq!(methods[0].return_type, parameter);
        assert!(methods[0].parameters.is_empty());
    }

    #[test]
    fn test_enclosing_cycle_is_reported() {
        let library = crate::test::library();
        let a = library.get_type("test/CycleA").unwrap();

        let error = library.ensure_phase(a, LoadPhase::BaseResolved).unwrap_err();
        assert!(matches!(
            error.root_cause(),
            Error::CyclicResolution { type_name, phase }
                if type_name == "test/CycleA" && *phase == LoadPhase::BaseResolved
        ));
        assert_eq!(library.phase(a).unwrap(), LoadPhase::Outline);

        let b = library.get_type("test/CycleB").unwrap();
        assert!(library.ensure_phase(b, LoadPhase::BaseResolved).is_err());
    }

    #[test]
    fn test_inner_class_sees_outer_parameters() {
        let library = crate::test::library();
        let outer = library.get_type("test/Outer").unwrap();
        let inner = library.get_type("test/Outer$Inner").unwrap();
        let t = library.class_base(outer).unwrap().generic_parameters[0];

        assert_eq!(library.class_fields(inner).unwrap()[0].field_type, t);

        let methods = library.class_methods(inner).unwrap();
        let constructor = methods.iter().find(|m| m.is_constructor()).unwrap();
        assert_eq!(constructor.parameters.len(), 1);
        assert_eq!(
            constructor.parameters[0].parameter_type,
            library.get_raw_type(outer).unwrap()
        );
        assert_eq!(methods.iter().find(|m| m.name == "item").unwrap().return_type, t);
    }

    #[test]
    fn test_nested_types_listed_on_outer() {
        let library = crate::test::library();
        let outer = library.get_type("test/Outer").unwrap();
        let inner = library.get_type("test/Outer$Inner").unwrap();

        assert_eq!(library.class_nested(outer).unwrap(), &[inner]);
        assert!(library.class_nested(inner).unwrap().is_empty());
    }

    #[test]
    fn test_method_failure_names_member() {
        let library = crate::test::library();
        let broken = library.get_type("test/Broken").unwrap();

        assert_eq!(library.class_fields(broken).unwrap().len(), 1);
        match library.ensure_phase(broken, LoadPhase::MethodsResolved) {
            Err(Error::Resolution { member, phase, .. }) => {
                assert_eq!(member.as_deref(), Some("use(Lmissing/Type;)V"));
                assert_eq!(phase, LoadPhase::MethodsResolved);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_strict_library_rejects_broken_fields() {
        let library = crate::test::library_with(LibraryConfig::strict());
        let broken = library.get_type("test/Broken").unwrap();

        let error = library.class_fields(broken).unwrap_err();
        assert!(matches!(error.root_cause(), Error::TypeNotFound(name) if name == "missing/Type"));
        assert_eq!(library.phase(broken).unwrap(), LoadPhase::BaseResolved);
    }
}
