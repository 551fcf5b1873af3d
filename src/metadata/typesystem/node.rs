//! Payloads of the [`crate::metadata::typesystem::TypeKind`] variants.
//!
//! Class nodes start out holding the raw outline collected from the provider and fill
//! their [`OnceLock`]s one [`LoadPhase`] at a time. Constructed types (generic
//! instances, raw types) memoize their substituted or erased view of the definition
//! the first time it is asked for.

use std::{
    sync::{Condvar, Mutex, OnceLock},
    thread::ThreadId,
};

use crate::metadata::{
    annotations::{AnnotationRecord, AnnotationValue},
    classfile::{RawClass, RawField, RawInnerClass, RawMethod},
    flags::AccessFlags,
    members::{FieldInfo, MethodInfo},
    typesystem::{GenericOwner, LoadPhase, Scope, TypeId, WildcardKind},
};

/// Outline data the base phase consumes
#[derive(Debug)]
pub(crate) struct BaseInput {
    pub super_name: Option<String>,
    pub interfaces: Vec<String>,
    pub annotations: Vec<AnnotationRecord>,
}

/// Input of one phase, taken out of [`PendingOutline`] while the phase runs
#[derive(Debug)]
pub(crate) enum PhaseInput {
    Base(BaseInput),
    Fields(Vec<RawField>),
    Methods(Vec<RawMethod>),
    Nested(Vec<RawInnerClass>),
}

/// The part of the raw outline no phase has consumed yet
#[derive(Debug, Default)]
pub(crate) struct PendingOutline {
    base: Option<BaseInput>,
    fields: Option<Vec<RawField>>,
    methods: Option<Vec<RawMethod>>,
    inner_classes: Option<Vec<RawInnerClass>>,
}

impl PendingOutline {
    /// Take the input of the phase that produces `target`
    pub fn take(&mut self, target: LoadPhase) -> Option<PhaseInput> {
        match target {
            LoadPhase::Outline => None,
            LoadPhase::BaseResolved => self.base.take().map(PhaseInput::Base),
            LoadPhase::FieldsResolved => self.fields.take().map(PhaseInput::Fields),
            LoadPhase::MethodsResolved => self.methods.take().map(PhaseInput::Methods),
            LoadPhase::NestedResolved => self.inner_classes.take().map(PhaseInput::Nested),
        }
    }

    /// Put back the input of a phase that failed
    pub fn restore(&mut self, input: PhaseInput) {
        match input {
            PhaseInput::Base(base) => self.base = Some(base),
            PhaseInput::Fields(fields) => self.fields = Some(fields),
            PhaseInput::Methods(methods) => self.methods = Some(methods),
            PhaseInput::Nested(inner_classes) => self.inner_classes = Some(inner_classes),
        }
    }

    /// `true` once base, field and method input are all consumed
    pub fn is_released(&self) -> bool {
        self.base.is_none() && self.fields.is_none() && self.methods.is_none()
    }
}

/// Mutable phase state of a class, guarded by [`ClassNode::load`]
#[derive(Debug)]
pub(crate) struct ClassLoad {
    /// Last completed phase
    pub phase: LoadPhase,
    /// Phase currently running and the thread running it
    pub busy: Option<(LoadPhase, ThreadId)>,
    pub pending: PendingOutline,
}

/// Result of the base phase
#[derive(Debug)]
pub(crate) struct BaseTypes {
    pub base_type: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub generic_parameters: Vec<TypeId>,
    pub annotations: Vec<AnnotationValue>,
    /// Frame of the class's own type parameters; inner classes and member signatures
    /// resolve against it
    pub scope: Scope,
}

/// A class or interface loaded from the provider
#[derive(Debug)]
pub struct ClassNode {
    pub(crate) modifiers: AccessFlags,
    pub(crate) signature: Option<String>,
    /// Binary name of the enclosing class, from the class's own `InnerClasses` entry
    pub(crate) enclosing: Option<String>,
    /// Simple name from the class's own `InnerClasses` entry, `None` for anonymous
    /// and top-level classes
    pub(crate) inner_name: Option<String>,
    pub(crate) formal_count: OnceLock<usize>,
    pub(crate) load: Mutex<ClassLoad>,
    pub(crate) ready: Condvar,
    pub(crate) base: OnceLock<BaseTypes>,
    pub(crate) fields: OnceLock<Vec<FieldInfo>>,
    pub(crate) methods: OnceLock<Vec<MethodInfo>>,
    pub(crate) nested: OnceLock<Vec<TypeId>>,
}

impl ClassNode {
    pub(crate) fn new(raw: RawClass) -> Self {
        let own_entry = raw.own_inner_entry().cloned();
        let modifiers = match &own_entry {
            Some(entry) => entry.modifiers,
            None => raw.modifiers,
        };

        ClassNode {
            modifiers,
            signature: raw.signature,
            enclosing: own_entry.as_ref().and_then(|entry| entry.outer_name.clone()),
            inner_name: own_entry.and_then(|entry| entry.inner_name),
            formal_count: OnceLock::new(),
            load: Mutex::new(ClassLoad {
                phase: LoadPhase::Outline,
                busy: None,
                pending: PendingOutline {
                    base: Some(BaseInput {
                        super_name: raw.super_name,
                        interfaces: raw.interfaces,
                        annotations: raw.annotations,
                    }),
                    fields: Some(raw.fields),
                    methods: Some(raw.methods),
                    inner_classes: Some(raw.inner_classes),
                },
            }),
            ready: Condvar::new(),
            base: OnceLock::new(),
            fields: OnceLock::new(),
            methods: OnceLock::new(),
            nested: OnceLock::new(),
        }
    }

    /// Access flags, taken from the class's own `InnerClasses` entry for nested classes
    #[must_use]
    pub fn modifiers(&self) -> AccessFlags {
        self.modifiers
    }

    /// The class signature string, if the class is generic or extends a generic type
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Binary name of the enclosing class
    #[must_use]
    pub fn enclosing_name(&self) -> Option<&str> {
        self.enclosing.as_deref()
    }

    /// Simple name as written in source, for nested classes
    #[must_use]
    pub fn inner_name(&self) -> Option<&str> {
        self.inner_name.as_deref()
    }

    /// `true` if the class declares formal type parameters
    #[must_use]
    pub fn declares_type_parameters(&self) -> bool {
        self.signature
            .as_deref()
            .is_some_and(|signature| signature.starts_with('<'))
    }

    /// `true` for interfaces and annotation interfaces
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.modifiers.is_interface()
    }
}

/// A type variable
#[derive(Debug)]
pub struct GenericParameterNode {
    /// Declared name, e.g. `T`
    pub name: String,
    /// Declaring class or method
    pub owner: GenericOwner,
    /// Zero-based position in the owner's parameter list
    pub position: usize,
    /// Class bound first (if any), then interface bounds; set once all siblings of the
    /// same declaration are known
    pub(crate) bounds: OnceLock<Vec<TypeId>>,
}

impl GenericParameterNode {
    pub(crate) fn new(name: &str, owner: GenericOwner, position: usize) -> Self {
        GenericParameterNode {
            name: name.to_string(),
            owner,
            position,
            bounds: OnceLock::new(),
        }
    }
}

/// Supertypes of a constructed type
#[derive(Debug, Default)]
pub(crate) struct Supertypes {
    pub base_type: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
}

/// Memoized view of a definition's supertypes and members, seen through a generic
/// instantiation or erasure
#[derive(Debug, Default)]
pub(crate) struct DerivedMembers {
    pub supertypes: OnceLock<Supertypes>,
    pub fields: OnceLock<Vec<FieldInfo>>,
    pub methods: OnceLock<Vec<MethodInfo>>,
}

/// A generic class applied to type arguments
#[derive(Debug)]
pub struct GenericInstanceNode {
    /// The generic class definition
    pub definition: TypeId,
    /// One argument per formal parameter of the definition
    pub arguments: Vec<TypeId>,
    /// Enclosing instance for inner classes of a generic outer class
    pub enclosing: Option<TypeId>,
    pub(crate) derived: DerivedMembers,
}

impl GenericInstanceNode {
    pub(crate) fn new(
        definition: TypeId,
        arguments: Vec<TypeId>,
        enclosing: Option<TypeId>,
    ) -> Self {
        GenericInstanceNode {
            definition,
            arguments,
            enclosing,
            derived: DerivedMembers::default(),
        }
    }
}

/// The erasure of a generic class definition
#[derive(Debug)]
pub struct RawNode {
    /// The generic class definition
    pub definition: TypeId,
    pub(crate) derived: DerivedMembers,
}

impl RawNode {
    pub(crate) fn new(definition: TypeId) -> Self {
        RawNode {
            definition,
            derived: DerivedMembers::default(),
        }
    }
}

/// An array type
#[derive(Debug)]
pub struct ArrayNode {
    /// Component type
    pub element: TypeId,
}

/// A wildcard type argument
#[derive(Debug)]
pub struct WildcardNode {
    /// Bound direction
    pub kind: WildcardKind,
    /// Bound type, `None` for `?`
    pub bound: Option<TypeId>,
}
