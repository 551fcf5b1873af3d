//! Recorded annotation callbacks.
//!
//! Annotations are decoded together with the class outline, but their element types can
//! only be resolved once the library is asked for them. The outline therefore stores
//! the decoder's callbacks as a flat event list and replays it later into a builder.

use crate::{
    metadata::{classfile::AnnotationVisitor, typesystem::ConstantValue},
    Result,
};

/// One recorded [`AnnotationVisitor`] callback
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEvent {
    /// `visit(name, value)`
    Value {
        /// Element name, absent inside arrays and default values
        name: Option<String>,
        /// Scalar payload
        value: ConstantValue,
    },
    /// `visit_enum(name, descriptor, constant)`
    Enum {
        /// Element name
        name: Option<String>,
        /// Descriptor of the enum type
        descriptor: String,
        /// Constant name
        constant: String,
    },
    /// `visit_annotation(name, descriptor)`; followed by the nested events and an `End`
    Annotation {
        /// Element name
        name: Option<String>,
        /// Descriptor of the nested annotation type
        descriptor: String,
    },
    /// `visit_array(name)`; followed by the element events and an `End`
    Array {
        /// Element name
        name: Option<String>,
    },
    /// `visit_end()`
    End,
}

/// A complete recorded annotation or default value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationRecord {
    /// Descriptor of the annotation type; `None` for an `AnnotationDefault` value
    pub descriptor: Option<String>,
    /// Retention visibility
    pub visible: bool,
    /// The callbacks, ending with [`AnnotationEvent::End`]
    pub events: Vec<AnnotationEvent>,
}

impl AnnotationRecord {
    /// Start recording an annotation of type `descriptor`
    #[must_use]
    pub fn annotation(descriptor: &str, visible: bool) -> Self {
        AnnotationRecord {
            descriptor: Some(descriptor.to_string()),
            visible,
            events: Vec::new(),
        }
    }

    /// Start recording an annotation default value
    #[must_use]
    pub fn default_value() -> Self {
        AnnotationRecord::default()
    }

    /// A visitor that appends to this record
    pub fn recorder(&mut self) -> EventRecorder<'_> {
        EventRecorder {
            sink: &mut self.events,
        }
    }

    /// Replay the recorded callbacks into `visitor`
    ///
    /// # Errors
    /// Returns an error if the visitor fails or the event list is truncated
    pub fn replay(&self, visitor: &mut dyn AnnotationVisitor) -> Result<()> {
        let mut events = self.events.iter();
        replay_nested(&mut events, visitor)?;

        if events.next().is_some() {
            return Err(malformed_error!("Annotation events continue after the final visit_end"));
        }
        Ok(())
    }
}

fn replay_nested<'e>(
    events: &mut impl Iterator<Item = &'e AnnotationEvent>,
    visitor: &mut dyn AnnotationVisitor,
) -> Result<()> {
    while let Some(event) = events.next() {
        match event {
            AnnotationEvent::Value { name, value } => {
                visitor.visit(name.as_deref(), value.clone())?;
            }
            AnnotationEvent::Enum {
                name,
                descriptor,
                constant,
            } => visitor.visit_enum(name.as_deref(), descriptor, constant)?,
            AnnotationEvent::Annotation { name, descriptor } => {
                let mut nested = visitor.visit_annotation(name.as_deref(), descriptor)?;
                replay_nested(events, nested.as_mut())?;
            }
            AnnotationEvent::Array { name } => {
                let mut nested = visitor.visit_array(name.as_deref())?;
                replay_nested(events, nested.as_mut())?;
            }
            AnnotationEvent::End => return visitor.visit_end(),
        }
    }

    Err(malformed_error!("Annotation events end without visit_end"))
}

/// [`AnnotationVisitor`] that records every callback into an event list
pub struct EventRecorder<'a> {
    sink: &'a mut Vec<AnnotationEvent>,
}

impl AnnotationVisitor for EventRecorder<'_> {
    fn visit(&mut self, name: Option<&str>, value: ConstantValue) -> Result<()> {
        self.sink.push(AnnotationEvent::Value {
            name: name.map(str::to_string),
            value,
        });
        Ok(())
    }

    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, constant: &str) -> Result<()> {
        self.sink.push(AnnotationEvent::Enum {
            name: name.map(str::to_string),
            descriptor: descriptor.to_string(),
            constant: constant.to_string(),
        });
        Ok(())
    }

    fn visit_annotation<'s>(
        &'s mut self,
        name: Option<&str>,
        descriptor: &str,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        self.sink.push(AnnotationEvent::Annotation {
            name: name.map(str::to_string),
            descriptor: descriptor.to_string(),
        });
        Ok(Box::new(EventRecorder {
            sink: &mut *self.sink,
        }))
    }

    fn visit_array<'s>(
        &'s mut self,
        name: Option<&str>,
    ) -> Result<Box<dyn AnnotationVisitor + 's>> {
        self.sink.push(AnnotationEvent::Array {
            name: name.map(str::to_string),
        });
        Ok(Box::new(EventRecorder {
            sink: &mut *self.sink,
        }))
    }

    fn visit_end(&mut self) -> Result<()> {
        self.sink.push(AnnotationEvent::End);
        Ok(())
    }
}
