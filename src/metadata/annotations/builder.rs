//! Builders that turn annotation callbacks into [`AnnotationValue`]s.
//!
//! Three builder contexts exist, one per place an element value can appear:
//! - [`AnnotationBuilder`] - named elements of an annotation
//! - [`ArrayBuilder`] - positional elements of an array value
//! - [`DefaultValueBuilder`] - the single value of an `AnnotationDefault` attribute
//!
//! Each builder writes its finished value into a [`Slot`] owned by its parent, so
//! nested annotations and arrays of any depth are assembled bottom-up as the
//! decoder calls `visit_end`. Enum types, class literals and nested annotation types
//! are resolved through the [`Library`] as they are encountered.

use crate::{
    metadata::{
        annotations::{AnnotationArgument, AnnotationRecord, AnnotationValue},
        classfile::AnnotationVisitor,
        typesystem::{ConstantValue, Library},
    },
    Result,
};

/// Where a finished value goes
pub enum Slot<'a> {
    /// A top-level annotation
    Root(&'a mut Option<AnnotationValue>),
    /// A named element of the parent annotation
    Named(&'a mut Vec<(String, AnnotationArgument)>, String),
    /// The next element of the parent array
    Element(&'a mut Vec<AnnotationArgument>),
    /// An annotation default value
    Default(&'a mut Option<AnnotationArgument>),
}

impl Slot<'_> {
    fn put(self, argument: AnnotationArgument) -> Result<()> {
        match self {
            Slot::Root(_) => {
                return Err(malformed_error!(
                    "Element value of kind {} where an annotation was expected",
                    argument.kind()
                ))
            }
            Slot::Named(arguments, name) => arguments.push((name, argument)),
            Slot::Element(elements) => elements.push(argument),
            Slot::Default(value) => {
                if value.is_some() {
                    return Err(malformed_error!("Annotation default holds more than one value"));
                }
                *value = Some(argument);
            }
        }
        Ok(())
    }

    fn put_annotation(self, annotation: AnnotationValue) -> Result<()> {
        match self {
            Slot::Root(value) => {
                *value = Some(annotation);
                Ok(())
            }
            other => other.put(AnnotationArgument::Annotation(Box::new(annotation))),
        }
    }
}

fn scalar(library: &Library, value: ConstantValue) -> Result<AnnotationArgument> {
    match value {
        ConstantValue::Class(descriptor) => {
            Ok(AnnotationArgument::Type(library.type_from_descriptor(&descriptor)?))
        }
        other => AnnotationArgument::try_from(other),
    }
}

fn enumeration(library: &Library, descriptor: &str, constant: &str) -> Result<AnnotationArgument> {
    Ok(AnnotationArgument::Enum {
        enum_type: library.type_from_descriptor(descriptor)?,
        constant: constant.to_string(),
    })
}

fn element_name(name: Option<&str>) -> Result<String> {
    name.map(str::to_string)
        .ok_or_else(|| malformed_error!("Annotation element without a name"))
}

/// Collects the named elements of one annotation
pub struct AnnotationBuilder<'a, 'l> {
    library: &'l Library,
    descriptor: String,
    visible: bool,
    arguments: Vec<(String, AnnotationArgument)>,
    slot: Option<Slot<'a>>,
}

impl<'a, 'l> AnnotationBuilder<'a, 'l> {
    /// Start an annotation of type `descriptor` that is delivered to `slot`
    #[must_use]
    pub fn new(library: &'l Library, descriptor: &str, visible: bool, slot: Slot<'a>) -> Self {
        AnnotationBuilder {
            library,
            descriptor: descriptor.to_string(),
            visible,
            arguments: Vec::new(),
            slot: Some(slot),
        }
    }
}

impl AnnotationVisitor for AnnotationBuilder<'_, '_> {
    fn visit(&mut self, name: Option<&str>, value: ConstantValue) -> Result<()> {
        let name = element_name(name)?;
        let argument = scalar(self.library, value)?;
        self.arguments.push((name, argument));
        Ok(())
    }

    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, constant: &str) -> Result<()> {
        let name = element_name(name)?;
        let argument = enumeration(self.library, descriptor, constant)?;
        self.arguments.push((name, argument));
        Ok(())
    }

    fn visit_annotation<'s>(
        &'s mut self,
        name: Option<&str>,
        descriptor: &str,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        let slot = Slot::Named(&mut self.arguments, element_name(name)?);
        Ok(Box::new(AnnotationBuilder::new(self.library, descriptor, self.visible, slot)))
    }

    fn visit_array<'s>(
        &'s mut self,
        name: Option<&str>,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        let slot = Slot::Named(&mut self.arguments, element_name(name)?);
        Ok(Box::new(ArrayBuilder::new(self.library, self.visible, slot)))
    }

    fn visit_end(&mut self) -> Result<()> {
        let slot = self
            .slot
            .take()
            .ok_or_else(|| malformed_error!("Annotation '{}' ended twice", self.descriptor))?;

        let annotation = AnnotationValue {
            annotation_type: self.library.type_from_descriptor(&self.descriptor)?,
            runtime_visible: self.visible,
            arguments: std::mem::take(&mut self.arguments),
        };
        slot.put_annotation(annotation)
    }
}

/// Collects the elements of an array value
pub struct ArrayBuilder<'a, 'l> {
    library: &'l Library,
    visible: bool,
    elements: Vec<AnnotationArgument>,
    slot: Option<Slot<'a>>,
}

impl<'a, 'l> ArrayBuilder<'a, 'l> {
    /// Start an array that is delivered to `slot`
    #[must_use]
    pub fn new(library: &'l Library, visible: bool, slot: Slot<'a>) -> Self {
        ArrayBuilder {
            library,
            visible,
            elements: Vec::new(),
            slot: Some(slot),
        }
    }
}

impl AnnotationVisitor for ArrayBuilder<'_, '_> {
    fn visit(&mut self, _name: Option<&str>, value: ConstantValue) -> Result<()> {
        let argument = scalar(self.library, value)?;
        self.elements.push(argument);
        Ok(())
    }

    fn visit_enum(&mut self, _name: Option<&str>, descriptor: &str, constant: &str) -> Result<()> {
        let argument = enumeration(self.library, descriptor, constant)?;
        self.elements.push(argument);
        Ok(())
    }

    fn visit_annotation<'s>(
        &'s mut self,
        _name: Option<&str>,
        descriptor: &str,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        let slot = Slot::Element(&mut self.elements);
        Ok(Box::new(AnnotationBuilder::new(self.library, descriptor, self.visible, slot)))
    }

    fn visit_array<'s>(
        &'s mut self,
        _name: Option<&str>,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        let slot = Slot::Element(&mut self.elements);
        Ok(Box::new(ArrayBuilder::new(self.library, self.visible, slot)))
    }

    fn visit_end(&mut self) -> Result<()> {
        let slot = self
            .slot
            .take()
            .ok_or_else(|| malformed_error!("Array value ended twice"))?;
        slot.put(AnnotationArgument::Array(std::mem::take(&mut self.elements)))
    }
}

/// Receives the single value of an annotation interface method default
pub struct DefaultValueBuilder<'a, 'l> {
    library: &'l Library,
    value: &'a mut Option<AnnotationArgument>,
}

impl<'a, 'l> DefaultValueBuilder<'a, 'l> {
    /// Start a default value that is stored into `value`
    #[must_use]
    pub fn new(library: &'l Library, value: &'a mut Option<AnnotationArgument>) -> Self {
        DefaultValueBuilder { library, value }
    }
}

impl AnnotationVisitor for DefaultValueBuilder<'_, '_> {
    fn visit(&mut self, _name: Option<&str>, value: ConstantValue) -> Result<()> {
        let argument = scalar(self.library, value)?;
        Slot::Default(&mut *self.value).put(argument)
    }

    fn visit_enum(&mut self, _name: Option<&str>, descriptor: &str, constant: &str) -> Result<()> {
        let argument = enumeration(self.library, descriptor, constant)?;
        Slot::Default(&mut *self.value).put(argument)
    }

    fn visit_annotation<'s>(
        &'s mut self,
        _name: Option<&str>,
        descriptor: &str,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        let slot = Slot::Default(&mut *self.value);
        Ok(Box::new(AnnotationBuilder::new(self.library, descriptor, true, slot)))
    }

    fn visit_array<'s>(
        &'s mut self,
        _name: Option<&str>,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        let slot = Slot::Default(&mut *self.value);
        Ok(Box::new(ArrayBuilder::new(self.library, true, slot)))
    }

    fn visit_end(&mut self) -> Result<()> {
        if self.value.is_none() {
            return Err(malformed_error!("Annotation default without a value"));
        }
        Ok(())
    }
}

/// Rebuild a recorded annotation
///
/// ## Arguments
/// * 'library' - Resolves the annotation type and any types referenced by its elements
/// * 'record'  - Callbacks recorded from the decoder
///
/// # Errors
/// Returns an error if a referenced type is unknown or the record is malformed
pub fn resolve_annotation(library: &Library, record: &AnnotationRecord) -> Result<AnnotationValue> {
    let descriptor = record
        .descriptor
        .as_deref()
        .ok_or_else(|| malformed_error!("Annotation record without a type descriptor"))?;

    let mut value = None;
    {
        let mut builder =
            AnnotationBuilder::new(library, descriptor, record.visible, Slot::Root(&mut value));
        record.replay(&mut builder)?;
    }

    value.ok_or_else(|| malformed_error!("Annotation '{}' was never completed", descriptor))
}

/// Rebuild a recorded `AnnotationDefault` value
///
/// # Errors
/// Returns an error if a referenced type is unknown or the record is malformed
pub fn resolve_default_value(
    library: &Library,
    record: &AnnotationRecord,
) -> Result<AnnotationArgument> {
    let mut value = None;
    {
        let mut builder = DefaultValueBuilder::new(library, &mut value);
        record.replay(&mut builder)?;
    }

    value.ok_or_else(|| malformed_error!("Annotation default without a value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{classfile::MemoryProvider, typesystem::PrimitiveKind},
        Error,
    };

    fn library() -> Library {
        Library::new(MemoryProvider::with_core_classes())
    }

    #[test]
    fn test_named_elements_and_arrays() {
        let library = library();
        let mut record = AnnotationRecord::annotation("Ljava/lang/Deprecated;", true);
        {
            let mut recorder = record.recorder();
            recorder
                .visit(Some("since"), ConstantValue::String("9".to_string()))
                .unwrap();
            {
                let mut array = recorder.visit_array(Some("levels")).unwrap();
                array.visit(None, ConstantValue::Int(1)).unwrap();
                array.visit(None, ConstantValue::Int(2)).unwrap();
                array.visit_end().unwrap();
            }
            recorder.visit_end().unwrap();
        }

        let value = resolve_annotation(&library, &record).unwrap();
        assert_eq!(
            value.annotation_type,
            library.get_type("java/lang/Deprecated").unwrap()
        );
        assert!(value.runtime_visible);
        assert_eq!(value.argument("since").and_then(AnnotationArgument::as_str), Some("9"));
        assert_eq!(
            value.argument("levels"),
            Some(&AnnotationArgument::Array(vec![
                AnnotationArgument::Int(1),
                AnnotationArgument::Int(2)
            ]))
        );
    }

    #[test]
    fn test_enum_class_and_nested_annotation() {
        let library = library();
        let mut record = AnnotationRecord::annotation("Ljava/lang/annotation/Retention;", false);
        {
            let mut recorder = record.recorder();
            recorder
                .visit_enum(
                    Some("value"),
                    "Ljava/lang/annotation/RetentionPolicy;",
                    "RUNTIME",
                )
                .unwrap();
            recorder
                .visit(Some("type"), ConstantValue::Class("V".to_string()))
                .unwrap();
            {
                let mut nested = recorder
                    .visit_annotation(Some("inner"), "Ljava/lang/Deprecated;")
                    .unwrap();
                nested.visit_end().unwrap();
            }
            recorder.visit_end().unwrap();
        }

        let value = resolve_annotation(&library, &record).unwrap();
        assert!(!value.runtime_visible);
        assert_eq!(
            value.argument("value"),
            Some(&AnnotationArgument::Enum {
                enum_type: library.get_type("java/lang/annotation/RetentionPolicy").unwrap(),
                constant: "RUNTIME".to_string(),
            })
        );
        assert_eq!(
            value.argument("type"),
            Some(&AnnotationArgument::Type(library.primitive(PrimitiveKind::Void)))
        );

        let inner = value
            .argument("inner")
            .and_then(AnnotationArgument::as_annotation)
            .unwrap();
        assert!(inner.arguments.is_empty());
        assert!(!inner.runtime_visible);
    }

    #[test]
    fn test_default_value() {
        let library = library();
        let mut record = AnnotationRecord::default_value();
        {
            let mut recorder = record.recorder();
            {
                let mut array = recorder.visit_array(None).unwrap();
                array
                    .visit(None, ConstantValue::String("a".to_string()))
                    .unwrap();
                array.visit_end().unwrap();
            }
            recorder.visit_end().unwrap();
        }

        let value = resolve_default_value(&library, &record).unwrap();
        assert_eq!(
            value,
            AnnotationArgument::Array(vec![AnnotationArgument::String("a".to_string())])
        );
    }

    #[test]
    fn test_default_value_must_be_single() {
        let library = library();
        let mut value = None;
        let mut builder = DefaultValueBuilder::new(&library, &mut value);
        builder.visit(None, ConstantValue::Int(1)).unwrap();
        assert!(matches!(
            builder.visit(None, ConstantValue::Int(2)),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_unnamed_element_rejected() {
        let library = library();
        let mut value = None;
        let mut builder = AnnotationBuilder::new(
            &library,
            "Ljava/lang/Deprecated;",
            true,
            Slot::Root(&mut value),
        );
        assert!(builder.visit(None, ConstantValue::Int(1)).is_err());
    }

    #[test]
    fn test_unknown_annotation_type() {
        let library = library();
        let mut record = AnnotationRecord::annotation("Lno/such/Marker;", true);
        {
            let mut recorder = record.recorder();
            recorder.visit_end().unwrap();
        }
        assert!(matches!(
            resolve_annotation(&library, &record).map_err(|e| e.root_cause().to_string()),
            Err(message) if message.contains("no/such/Marker")
        ));
    }
}
