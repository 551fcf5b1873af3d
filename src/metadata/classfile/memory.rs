//! In-memory class provider.
//!
//! [`MemoryProvider`] stores declarative [`ClassDefinition`]s and replays them through
//! the visitor traits exactly like a class-file decoder would. Embedders use it to feed
//! synthesized classes to a [`crate::Library`]; tests and benches use it instead of
//! class-file bytes.
//!
//! # Examples
//!
//! ```rust
//! use classscope::{ClassDefinition, FieldDefinition, Library, MemoryProvider};
//!
//! let provider = MemoryProvider::with_core_classes().define(
//!     ClassDefinition::class("demo/Box")
//!         .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
//!         .field(FieldDefinition::new("value", "Ljava/lang/Object;").signature("TT;")),
//! );
//!
//! let library = Library::new(provider);
//! let boxed = library.get_type("demo/Box")?;
//! assert_eq!(library.generic_arguments(boxed)?.len(), 1);
//! # Ok::<(), classscope::Error>(())
//! ```

use dashmap::DashMap;

use crate::{
    metadata::{
        classfile::{AnnotationVisitor, ClassProvider, ClassVisitor},
        flags::AccessFlags,
        typesystem::ConstantValue,
    },
    Result,
};

/// An annotation element value in a definition
#[derive(Debug, Clone, PartialEq)]
pub enum ElementDefinition {
    /// Scalar or class literal
    Value(ConstantValue),
    /// Enum constant
    Enum {
        /// Descriptor of the enum type
        descriptor: String,
        /// Constant name
        constant: String,
    },
    /// Nested annotation
    Annotation(AnnotationDefinition),
    /// Array of element values
    Array(Vec<ElementDefinition>),
}

impl ElementDefinition {
    /// An enum constant element
    #[must_use]
    pub fn enumeration(descriptor: &str, constant: &str) -> Self {
        ElementDefinition::Enum {
            descriptor: descriptor.to_string(),
            constant: constant.to_string(),
        }
    }

    /// A class literal element
    #[must_use]
    pub fn class(descriptor: &str) -> Self {
        ElementDefinition::Value(ConstantValue::Class(descriptor.to_string()))
    }

    fn replay(&self, name: Option<&str>, visitor: &mut dyn AnnotationVisitor) -> Result<()> {
        match self {
            ElementDefinition::Value(value) => visitor.visit(name, value.clone()),
            ElementDefinition::Enum {
                descriptor,
                constant,
            } => visitor.visit_enum(name, descriptor, constant),
            ElementDefinition::Annotation(annotation) => {
                let mut nested = visitor.visit_annotation(name, &annotation.descriptor)?;
                annotation.replay(nested.as_mut())
            }
            ElementDefinition::Array(elements) => {
                let mut nested = visitor.visit_array(name)?;
                for element in elements {
                    element.replay(None, nested.as_mut())?;
                }
                nested.visit_end()
            }
        }
    }
}

impl From<ConstantValue> for ElementDefinition {
    fn from(value: ConstantValue) -> Self {
        ElementDefinition::Value(value)
    }
}

impl From<bool> for ElementDefinition {
    fn from(value: bool) -> Self {
        ElementDefinition::Value(ConstantValue::Boolean(value))
    }
}

impl From<i32> for ElementDefinition {
    fn from(value: i32) -> Self {
        ElementDefinition::Value(ConstantValue::Int(value))
    }
}

impl From<i64> for ElementDefinition {
    fn from(value: i64) -> Self {
        ElementDefinition::Value(ConstantValue::Long(value))
    }
}

impl From<&str> for ElementDefinition {
    fn from(value: &str) -> Self {
        ElementDefinition::Value(ConstantValue::String(value.to_string()))
    }
}

impl From<AnnotationDefinition> for ElementDefinition {
    fn from(value: AnnotationDefinition) -> Self {
        ElementDefinition::Annotation(value)
    }
}

impl<T: Into<ElementDefinition>> From<Vec<T>> for ElementDefinition {
    fn from(values: Vec<T>) -> Self {
        ElementDefinition::Array(values.into_iter().map(Into::into).collect())
    }
}

/// An annotation in a definition
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDefinition {
    /// Descriptor of the annotation type
    pub descriptor: String,
    /// Runtime visibility
    pub visible: bool,
    /// Named element values
    pub arguments: Vec<(String, ElementDefinition)>,
}

impl AnnotationDefinition {
    /// A runtime-visible annotation of type `descriptor`
    #[must_use]
    pub fn new(descriptor: &str) -> Self {
        AnnotationDefinition {
            descriptor: descriptor.to_string(),
            visible: true,
            arguments: Vec::new(),
        }
    }

    /// Mark the annotation as class-retention only
    #[must_use]
    pub fn invisible(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Add a named element value
    #[must_use]
    pub fn argument(mut self, name: &str, value: impl Into<ElementDefinition>) -> Self {
        self.arguments.push((name.to_string(), value.into()));
        self
    }

    fn replay(&self, visitor: &mut dyn AnnotationVisitor) -> Result<()> {
        for (name, value) in &self.arguments {
            value.replay(Some(name), visitor)?;
        }
        visitor.visit_end()
    }
}

/// A field in a definition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Access flags
    pub modifiers: AccessFlags,
    /// Field name
    pub name: String,
    /// Erased descriptor
    pub descriptor: String,
    /// Generic signature
    pub signature: Option<String>,
    /// Constant value
    pub constant: Option<ConstantValue>,
    /// Annotations
    pub annotations: Vec<AnnotationDefinition>,
}

impl FieldDefinition {
    /// A public field
    #[must_use]
    pub fn new(name: &str, descriptor: &str) -> Self {
        FieldDefinition {
            modifiers: AccessFlags::PUBLIC,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            constant: None,
            annotations: Vec::new(),
        }
    }

    /// Replace the access flags
    #[must_use]
    pub fn modifiers(mut self, modifiers: AccessFlags) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the generic signature
    #[must_use]
    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    /// Set the constant value
    #[must_use]
    pub fn constant(mut self, constant: ConstantValue) -> Self {
        self.constant = Some(constant);
        self
    }

    /// Add an annotation
    #[must_use]
    pub fn annotate(mut self, annotation: AnnotationDefinition) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A method in a definition
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    /// Access flags
    pub modifiers: AccessFlags,
    /// Method name
    pub name: String,
    /// Erased descriptor
    pub descriptor: String,
    /// Generic signature
    pub signature: Option<String>,
    /// `Exceptions` attribute
    pub exceptions: Vec<String>,
    /// Method annotations
    pub annotations: Vec<AnnotationDefinition>,
    /// Parameter annotations with their parameter index
    pub parameter_annotations: Vec<(usize, AnnotationDefinition)>,
    /// `AnnotationDefault` value
    pub default_value: Option<ElementDefinition>,
    /// `MethodParameters` entries
    pub parameters: Vec<(Option<String>, AccessFlags)>,
}

impl MethodDefinition {
    /// A public method
    #[must_use]
    pub fn new(name: &str, descriptor: &str) -> Self {
        MethodDefinition {
            modifiers: AccessFlags::PUBLIC,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            exceptions: Vec::new(),
            annotations: Vec::new(),
            parameter_annotations: Vec::new(),
            default_value: None,
            parameters: Vec::new(),
        }
    }

    /// Replace the access flags
    #[must_use]
    pub fn modifiers(mut self, modifiers: AccessFlags) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the generic signature
    #[must_use]
    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    /// Add an `Exceptions` entry
    #[must_use]
    pub fn throws(mut self, exception: &str) -> Self {
        self.exceptions.push(exception.to_string());
        self
    }

    /// Add a method annotation
    #[must_use]
    pub fn annotate(mut self, annotation: AnnotationDefinition) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Add an annotation to the parameter at `index`
    #[must_use]
    pub fn annotate_parameter(mut self, index: usize, annotation: AnnotationDefinition) -> Self {
        self.parameter_annotations.push((index, annotation));
        self
    }

    /// Set the annotation default value
    #[must_use]
    pub fn default_value(mut self, value: impl Into<ElementDefinition>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Add a named `MethodParameters` entry
    #[must_use]
    pub fn parameter(mut self, name: &str) -> Self {
        self.parameters.push((Some(name.to_string()), AccessFlags::empty()));
        self
    }
}

/// An `InnerClasses` entry in a definition
#[derive(Debug, Clone, PartialEq)]
pub struct InnerClassDefinition {
    /// Nested class internal name
    pub name: String,
    /// Enclosing class internal name
    pub outer_name: Option<String>,
    /// Simple name
    pub inner_name: Option<String>,
    /// Access flags
    pub modifiers: AccessFlags,
}

/// Declarative description of one class file
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    /// Access flags
    pub modifiers: AccessFlags,
    /// Internal name
    pub name: String,
    /// Generic signature
    pub signature: Option<String>,
    /// Superclass internal name
    pub super_name: Option<String>,
    /// Interface internal names
    pub interfaces: Vec<String>,
    /// Fields
    pub fields: Vec<FieldDefinition>,
    /// Methods
    pub methods: Vec<MethodDefinition>,
    /// Class annotations
    pub annotations: Vec<AnnotationDefinition>,
    /// `InnerClasses` entries
    pub inner_classes: Vec<InnerClassDefinition>,
}

impl ClassDefinition {
    /// A public class extending `java/lang/Object`
    #[must_use]
    pub fn class(name: &str) -> Self {
        ClassDefinition {
            modifiers: AccessFlags::PUBLIC | AccessFlags::SUPER,
            name: name.to_string(),
            signature: None,
            super_name: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            inner_classes: Vec::new(),
        }
    }

    /// A public interface
    #[must_use]
    pub fn interface(name: &str) -> Self {
        ClassDefinition {
            modifiers: AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
            ..ClassDefinition::class(name)
        }
    }

    /// A public annotation interface
    #[must_use]
    pub fn annotation(name: &str) -> Self {
        let mut definition = ClassDefinition::interface(name);
        definition.modifiers |= AccessFlags::ANNOTATION;
        definition.implements("java/lang/annotation/Annotation")
    }

    /// A public final enum class
    #[must_use]
    pub fn enumeration(name: &str) -> Self {
        let mut definition = ClassDefinition::class(name);
        definition.modifiers |= AccessFlags::FINAL | AccessFlags::ENUM;
        definition
            .extends("java/lang/Enum")
            .signature(&format!("Ljava/lang/Enum<L{name};>;"))
    }

    /// Replace the access flags
    #[must_use]
    pub fn modifiers(mut self, modifiers: AccessFlags) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the generic signature
    #[must_use]
    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    /// Set the superclass
    #[must_use]
    pub fn extends(mut self, super_name: &str) -> Self {
        self.super_name = Some(super_name.to_string());
        self
    }

    /// Remove the superclass (only `java/lang/Object` has none)
    #[must_use]
    pub fn without_super(mut self) -> Self {
        self.super_name = None;
        self
    }

    /// Add a direct interface
    #[must_use]
    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a method
    #[must_use]
    pub fn method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a class annotation
    #[must_use]
    pub fn annotate(mut self, annotation: AnnotationDefinition) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Add an `InnerClasses` entry
    #[must_use]
    pub fn inner_class(
        mut self,
        name: &str,
        outer_name: Option<&str>,
        inner_name: Option<&str>,
        modifiers: AccessFlags,
    ) -> Self {
        self.inner_classes.push(InnerClassDefinition {
            name: name.to_string(),
            outer_name: outer_name.map(str::to_string),
            inner_name: inner_name.map(str::to_string),
            modifiers,
        });
        self
    }

    /// Drive `visitor` with this definition, in class-file order
    ///
    /// # Errors
    /// Returns the first error raised by the visitor
    pub fn replay(&self, visitor: &mut dyn ClassVisitor) -> Result<()> {
        let interfaces: Vec<&str> = self.interfaces.iter().map(String::as_str).collect();
        visitor.visit_header(
            self.modifiers,
            &self.name,
            self.signature.as_deref(),
            self.super_name.as_deref(),
            &interfaces,
        )?;

        for annotation in &self.annotations {
            let mut nested = visitor.visit_annotation(&annotation.descriptor, annotation.visible)?;
            annotation.replay(nested.as_mut())?;
        }

        for inner in &self.inner_classes {
            visitor.visit_inner_class(
                &inner.name,
                inner.outer_name.as_deref(),
                inner.inner_name.as_deref(),
                inner.modifiers,
            )?;
        }

        for field in &self.fields {
            let mut member = visitor.visit_field(
                field.modifiers,
                &field.name,
                &field.descriptor,
                field.signature.as_deref(),
                field.constant.clone(),
            )?;
            for annotation in &field.annotations {
                let mut nested =
                    member.visit_annotation(&annotation.descriptor, annotation.visible)?;
                annotation.replay(nested.as_mut())?;
            }
            member.visit_end()?;
        }

        for method in &self.methods {
            let exceptions: Vec<&str> = method.exceptions.iter().map(String::as_str).collect();
            let mut member = visitor.visit_method(
                method.modifiers,
                &method.name,
                &method.descriptor,
                method.signature.as_deref(),
                &exceptions,
            )?;
            for (name, modifiers) in &method.parameters {
                member.visit_parameter(name.as_deref(), *modifiers)?;
            }
            if let Some(value) = &method.default_value {
                let mut nested = member.visit_annotation_default()?;
                value.replay(None, nested.as_mut())?;
                nested.visit_end()?;
            }
            for annotation in &method.annotations {
                let mut nested =
                    member.visit_annotation(&annotation.descriptor, annotation.visible)?;
                annotation.replay(nested.as_mut())?;
            }
            for (index, annotation) in &method.parameter_annotations {
                let mut nested = member.visit_parameter_annotation(
                    *index,
                    &annotation.descriptor,
                    annotation.visible,
                )?;
                annotation.replay(nested.as_mut())?;
            }
            member.visit_end()?;
        }

        visitor.visit_end()
    }
}

/// [`ClassProvider`] over recorded [`ClassDefinition`]s
#[derive(Debug, Default)]
pub struct MemoryProvider {
    classes: DashMap<String, ClassDefinition>,
    requests: DashMap<String, usize>,
}

impl MemoryProvider {
    /// Create an empty provider
    #[must_use]
    pub fn new() -> Self {
        MemoryProvider::default()
    }

    /// Add or replace a definition
    pub fn insert(&self, definition: ClassDefinition) {
        self.classes.insert(definition.name.clone(), definition);
    }

    /// Builder-style [`MemoryProvider::insert`]
    #[must_use]
    pub fn define(self, definition: ClassDefinition) -> Self {
        self.insert(definition);
        self
    }

    /// Returns true if a definition for `name` is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Number of stored definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no definitions are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// How often `name` was requested through [`ClassProvider::visit_class`]
    #[must_use]
    pub fn request_count(&self, name: &str) -> usize {
        self.requests.get(name).map_or(0, |count| *count)
    }
}

impl ClassProvider for MemoryProvider {
    fn visit_class(&self, name: &str, visitor: &mut dyn ClassVisitor) -> Result<bool> {
        *self.requests.entry(name.to_string()).or_insert(0) += 1;

        match self.classes.get(name) {
            Some(definition) => {
                definition.replay(visitor)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::classfile::OutlineCollector;

    #[test]
    fn test_replay_produces_outline() {
        let definition = ClassDefinition::annotation("test/Info")
            .method(
                MethodDefinition::new("numbers", "()[I")
                    .modifiers(AccessFlags::PUBLIC | AccessFlags::ABSTRACT)
                    .default_value(vec![0]),
            )
            .annotate(
                AnnotationDefinition::new("Ljava/lang/annotation/Retention;").argument(
                    "value",
                    ElementDefinition::enumeration(
                        "Ljava/lang/annotation/RetentionPolicy;",
                        "RUNTIME",
                    ),
                ),
            );
        let provider = MemoryProvider::new().define(definition);

        let mut collector = OutlineCollector::new();
        assert!(provider.visit_class("test/Info", &mut collector).unwrap());
        let class = collector.finish().unwrap();

        assert!(class.modifiers.is_annotation());
        assert_eq!(class.interfaces, ["java/lang/annotation/Annotation"]);
        assert_eq!(class.annotations.len(), 1);
        assert_eq!(class.annotations[0].events.len(), 2);
        let default = class.methods[0].default_value.as_ref().unwrap();
        // array begin, element, array end, value end
        assert_eq!(default.events.len(), 4);
        assert_eq!(provider.request_count("test/Info"), 1);
    }

    #[test]
    fn test_missing_class() {
        let provider = MemoryProvider::new();
        let mut collector = OutlineCollector::new();
        assert!(!provider.visit_class("test/Nope", &mut collector).unwrap());
        assert!(collector.finish().is_err());
        assert_eq!(provider.request_count("test/Nope"), 1);
        assert!(provider.is_empty());
    }
}
