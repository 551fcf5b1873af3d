//! Collection of the unresolved class outline.
//!
//! [`OutlineCollector`] is the [`ClassVisitor`] the library hands to a
//! [`crate::metadata::classfile::ClassProvider`]. It copies out names, descriptors,
//! signature strings and recorded annotations without resolving a single type, so that
//! looking a class up never forces other classes to load.

use crate::{
    metadata::{
        annotations::{AnnotationRecord, EventRecorder},
        classfile::{AnnotationVisitor, ClassVisitor, MemberVisitor},
        flags::AccessFlags,
        typesystem::ConstantValue,
    },
    Result,
};

/// Unresolved field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    /// Access flags
    pub modifiers: AccessFlags,
    /// Field name
    pub name: String,
    /// Erased descriptor
    pub descriptor: String,
    /// Generic signature, if any
    pub signature: Option<String>,
    /// `ConstantValue` attribute
    pub constant: Option<ConstantValue>,
    /// Recorded annotations
    pub annotations: Vec<AnnotationRecord>,
}

/// Unresolved `MethodParameters` entry
#[derive(Debug, Clone, PartialEq)]
pub struct RawParameter {
    /// Parameter name, absent for unnamed parameters
    pub name: Option<String>,
    /// `FINAL`, `SYNTHETIC` or `MANDATED`
    pub modifiers: AccessFlags,
}

/// Unresolved method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct RawMethod {
    /// Access flags
    pub modifiers: AccessFlags,
    /// Method name, `<init>` for constructors
    pub name: String,
    /// Erased descriptor
    pub descriptor: String,
    /// Generic signature, if any
    pub signature: Option<String>,
    /// Internal names from the `Exceptions` attribute
    pub exceptions: Vec<String>,
    /// Recorded method annotations
    pub annotations: Vec<AnnotationRecord>,
    /// Recorded parameter annotations with their parameter index
    pub parameter_annotations: Vec<(usize, AnnotationRecord)>,
    /// Recorded `AnnotationDefault` value
    pub default_value: Option<AnnotationRecord>,
    /// `MethodParameters` entries
    pub parameters: Vec<RawParameter>,
}

/// Unresolved `InnerClasses` entry
#[derive(Debug, Clone, PartialEq)]
pub struct RawInnerClass {
    /// Internal name of the nested class
    pub name: String,
    /// Internal name of the enclosing class; absent for local and anonymous classes
    pub outer_name: Option<String>,
    /// Simple name; absent for anonymous classes
    pub inner_name: Option<String>,
    /// Access flags as declared in source
    pub modifiers: AccessFlags,
}

/// Everything a class file says about a class, still unresolved
#[derive(Debug, Clone, PartialEq)]
pub struct RawClass {
    /// Access flags from the class header
    pub modifiers: AccessFlags,
    /// Internal name
    pub name: String,
    /// Generic signature, if any
    pub signature: Option<String>,
    /// Superclass internal name
    pub super_name: Option<String>,
    /// Interface internal names
    pub interfaces: Vec<String>,
    /// Recorded class annotations
    pub annotations: Vec<AnnotationRecord>,
    /// Field declarations
    pub fields: Vec<RawField>,
    /// Method declarations
    pub methods: Vec<RawMethod>,
    /// `InnerClasses` entries
    pub inner_classes: Vec<RawInnerClass>,
}

impl RawClass {
    /// The `InnerClasses` entry describing this class itself
    #[must_use]
    pub fn own_inner_entry(&self) -> Option<&RawInnerClass> {
        self.inner_classes.iter().find(|entry| entry.name == self.name)
    }
}

/// [`ClassVisitor`] that collects a [`RawClass`]
#[derive(Debug, Default)]
pub struct OutlineCollector {
    class: Option<RawClass>,
    finished: bool,
}

impl OutlineCollector {
    /// Create an empty collector
    #[must_use]
    pub fn new() -> Self {
        OutlineCollector::default()
    }

    /// Take the collected outline
    ///
    /// # Errors
    /// Returns an error if the header or the final `visit_end` was never received
    pub fn finish(self) -> Result<RawClass> {
        match self.class {
            Some(class) if self.finished => Ok(class),
            Some(class) => Err(malformed_error!(
                "Class '{}' was not terminated with visit_end",
                class.name
            )),
            None => Err(malformed_error!("Class outline has no header")),
        }
    }

    fn class_mut(&mut self) -> Result<&mut RawClass> {
        if self.finished {
            return Err(malformed_error!("Callback received after visit_end"));
        }
        self.class
            .as_mut()
            .ok_or_else(|| malformed_error!("Callback received before visit_header"))
    }
}

impl ClassVisitor for OutlineCollector {
    fn visit_header(
        &mut self,
        modifiers: AccessFlags,
        name: &str,
        signature: Option<&str>,
        super_name: Option<&str>,
        interfaces: &[&str],
    ) -> Result<()> {
        if self.class.is_some() {
            return Err(malformed_error!("Duplicate class header for '{}'", name));
        }

        self.class = Some(RawClass {
            modifiers,
            name: name.to_string(),
            signature: signature.map(str::to_string),
            super_name: super_name.map(str::to_string),
            interfaces: interfaces.iter().map(|name| (*name).to_string()).collect(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            inner_classes: Vec::new(),
        });
        Ok(())
    }

    fn visit_field<'s>(
        &'s mut self,
        modifiers: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        constant: Option<ConstantValue>,
    ) -> Result<Box<dyn MemberVisitor + 's>> {
        let class = self.class_mut()?;
        class.fields.push(RawField {
            modifiers,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: signature.map(str::to_string),
            constant,
            annotations: Vec::new(),
        });

        let field = class
            .fields
            .last_mut()
            .ok_or_else(|| malformed_error!("Field '{}' vanished", name))?;
        Ok(Box::new(FieldCollector { field }))
    }

    fn visit_method<'s>(
        &'s mut self,
        modifiers: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        exceptions: &[&str],
    ) -> Result<Box<dyn MemberVisitor + 's>> {
        let class = self.class_mut()?;
        class.methods.push(RawMethod {
            modifiers,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: signature.map(str::to_string),
            exceptions: exceptions.iter().map(|name| (*name).to_string()).collect(),
            annotations: Vec::new(),
            parameter_annotations: Vec::new(),
            default_value: None,
            parameters: Vec::new(),
        });

        let method = class
            .methods
            .last_mut()
            .ok_or_else(|| malformed_error!("Method '{}' vanished", name))?;
        Ok(Box::new(MethodCollector { method }))
    }

    fn visit_annotation<'s>(
        &'s mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        let class = self.class_mut()?;
        Ok(Box::new(push_record(
            &mut class.annotations,
            AnnotationRecord::annotation(descriptor, visible),
        )))
    }

    fn visit_inner_class(
        &mut self,
        name: &str,
        outer_name: Option<&str>,
        inner_name: Option<&str>,
        modifiers: AccessFlags,
    ) -> Result<()> {
        self.class_mut()?.inner_classes.push(RawInnerClass {
            name: name.to_string(),
            outer_name: outer_name.map(str::to_string),
            inner_name: inner_name.map(str::to_string),
            modifiers,
        });
        Ok(())
    }

    fn visit_end(&mut self) -> Result<()> {
        self.class_mut()?;
        self.finished = true;
        Ok(())
    }
}

fn push_record(records: &mut Vec<AnnotationRecord>, record: AnnotationRecord) -> EventRecorder<'_> {
    records.push(record);
    let index = records.len() - 1;
    records[index].recorder()
}

struct FieldCollector<'a> {
    field: &'a mut RawField,
}

impl MemberVisitor for FieldCollector<'_> {
    fn visit_annotation<'s>(
        &'s mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        Ok(Box::new(push_record(
            &mut self.field.annotations,
            AnnotationRecord::annotation(descriptor, visible),
        )))
    }

    fn visit_parameter_annotation<'s>(
        &'s mut self,
        _parameter: usize,
        _descriptor: &str,
        _visible: bool,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        Err(malformed_error!(
            "Field '{}' cannot carry parameter annotations",
            self.field.name
        ))
    }

    fn visit_annotation_default<'s>(&'s mut self) -> Result<Box<dyn AnnotationVisitor + 's>> {
        Err(malformed_error!(
            "Field '{}' cannot carry an annotation default",
            self.field.name
        ))
    }

    fn visit_parameter(&mut self, _name: Option<&str>, _modifiers: AccessFlags) -> Result<()> {
        Err(malformed_error!("Field '{}' cannot declare parameters", self.field.name))
    }

    fn visit_end(&mut self) -> Result<()> {
        Ok(())
    }
}

struct MethodCollector<'a> {
    method: &'a mut RawMethod,
}

impl MemberVisitor for MethodCollector<'_> {
    fn visit_annotation<'s>(
        &'s mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        Ok(Box::new(push_record(
            &mut self.method.annotations,
            AnnotationRecord::annotation(descriptor, visible),
        )))
    }

    fn visit_parameter_annotation<'s>(
        &'s mut self,
        parameter: usize,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        let records = &mut self.method.parameter_annotations;
        records.push((parameter, AnnotationRecord::annotation(descriptor, visible)));
        let index = records.len() - 1;
        Ok(Box::new(records[index].1.recorder()))
    }

    fn visit_annotation_default<'s>(&'s mut self) -> Result<Box<dyn AnnotationVisitor + 's>> {
        if self.method.default_value.is_some() {
            return Err(malformed_error!(
                "Method '{}' has more than one annotation default",
                self.method.name
            ));
        }

        let record = self
            .method
            .default_value
            .insert(AnnotationRecord::default_value());
        Ok(Box::new(record.recorder()))
    }

    fn visit_parameter(&mut self, name: Option<&str>, modifiers: AccessFlags) -> Result<()> {
        self.method.parameters.push(RawParameter {
            name: name.map(str::to_string),
            modifiers,
        });
        Ok(())
    }

    fn visit_end(&mut self) -> Result<()> {
        Ok(())
    }
}
