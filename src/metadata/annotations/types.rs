//! Annotation-specific types and data structures.
//!
//! This module contains the reconstructed form of annotations: the annotation value
//! itself (type, named arguments, retention visibility) and the tagged argument tree
//! that element values decode into.

use strum::{Display, EnumDiscriminants};

use crate::metadata::typesystem::{ConstantValue, TypeId};

/// Represents a reconstructed annotation with its named arguments
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationValue {
    /// The annotation interface
    pub annotation_type: TypeId,
    /// `true` for `RuntimeVisible*` annotations, `false` for class-retention ones
    pub runtime_visible: bool,
    /// Named element values in declaration order
    pub arguments: Vec<(String, AnnotationArgument)>,
}

impl AnnotationValue {
    /// Look up a named argument
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&AnnotationArgument> {
        self.arguments
            .iter()
            .find(|(argument, _)| argument == name)
            .map(|(_, value)| value)
    }

    /// Names of all present arguments, in order
    pub fn argument_names(&self) -> impl Iterator<Item = &str> {
        self.arguments.iter().map(|(name, _)| name.as_str())
    }
}

/// Represents a single annotation element value
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(
    name(AnnotationArgumentKind),
    derive(Display, Hash),
    doc = "The kind of an [`AnnotationArgument`], without its payload"
)]
pub enum AnnotationArgument {
    /// Boolean value
    Boolean(bool),
    /// Signed 8-bit integer
    Byte(i8),
    /// UTF-16 code unit
    Char(u16),
    /// Signed 16-bit integer
    Short(i16),
    /// Signed 32-bit integer
    Int(i32),
    /// Signed 64-bit integer
    Long(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// String value
    String(String),
    /// Enum constant of an enum type
    Enum {
        /// The enum type
        enum_type: TypeId,
        /// Name of the constant
        constant: String,
    },
    /// Class literal
    Type(TypeId),
    /// Array of element values
    Array(Vec<AnnotationArgument>),
    /// Nested annotation
    Annotation(Box<AnnotationValue>),
}

impl AnnotationArgument {
    /// The variant tag of this argument
    #[must_use]
    pub fn kind(&self) -> AnnotationArgumentKind {
        AnnotationArgumentKind::from(self)
    }

    /// Try to access the string payload
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationArgument::String(value) => Some(value),
            _ => None,
        }
    }

    /// Try to access the `int` payload
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            AnnotationArgument::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to access the elements of an array argument
    #[must_use]
    pub fn as_array(&self) -> Option<&[AnnotationArgument]> {
        match self {
            AnnotationArgument::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Try to access a nested annotation
    #[must_use]
    pub fn as_annotation(&self) -> Option<&AnnotationValue> {
        match self {
            AnnotationArgument::Annotation(value) => Some(value),
            _ => None,
        }
    }
}

impl TryFrom<ConstantValue> for AnnotationArgument {
    type Error = crate::Error;

    /// Scalar payloads map one to one; class literals need the library and are rejected
    fn try_from(value: ConstantValue) -> crate::Result<Self> {
        Ok(match value {
            ConstantValue::Boolean(value) => AnnotationArgument::Boolean(value),
            ConstantValue::Byte(value) => AnnotationArgument::Byte(value),
            ConstantValue::Char(value) => AnnotationArgument::Char(value),
            ConstantValue::Short(value) => AnnotationArgument::Short(value),
            ConstantValue::Int(value) => AnnotationArgument::Int(value),
            ConstantValue::Long(value) => AnnotationArgument::Long(value),
            ConstantValue::Float(value) => AnnotationArgument::Float(value),
            ConstantValue::Double(value) => AnnotationArgument::Double(value),
            ConstantValue::String(value) => AnnotationArgument::String(value),
            ConstantValue::Class(descriptor) => {
                return Err(malformed_error!(
                    "Class literal '{}' cannot be converted without type resolution",
                    descriptor
                ))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_lookup() {
        let value = AnnotationValue {
            annotation_type: TypeId::new(7),
            runtime_visible: true,
            arguments: vec![
                ("name".to_string(), AnnotationArgument::String("x".to_string())),
                (
                    "values".to_string(),
                    AnnotationArgument::Array(vec![
                        AnnotationArgument::Int(1),
                        AnnotationArgument::Int(2),
                    ]),
                ),
            ],
        };

        assert_eq!(value.argument("name").and_then(AnnotationArgument::as_str), Some("x"));
        assert_eq!(
            value
                .argument("values")
                .and_then(AnnotationArgument::as_array)
                .map(<[AnnotationArgument]>::len),
            Some(2)
        );
        assert!(value.argument("missing").is_none());
        assert_eq!(value.argument_names().collect::<Vec<_>>(), ["name", "values"]);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(AnnotationArgument::Int(3).kind(), AnnotationArgumentKind::Int);
        assert_eq!(
            AnnotationArgument::Type(TypeId::new(1)).kind().to_string(),
            "Type"
        );
        assert_eq!(
            AnnotationArgument::try_from(ConstantValue::Long(9)).unwrap(),
            AnnotationArgument::Long(9)
        );
        assert!(AnnotationArgument::try_from(ConstantValue::Class("I".into())).is_err());
    }
}
