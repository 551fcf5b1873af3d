use std::fmt;

use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// Constant data carried by class metadata.
///
/// Used for the `ConstantValue` attribute of static fields and for the scalar payloads
/// of annotation element values. The decoder hands these over already decoded from the
/// constant pool.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// Boolean value
    Boolean(bool),
    /// 8-bit signed integer
    Byte(i8),
    /// UTF-16 code unit
    Char(u16),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// String value
    String(String),
    /// Class literal, given as a field descriptor (`Ljava/lang/String;`, `I`, `V`).
    /// Only annotation element values carry this variant.
    Class(String),
}

impl ConstantValue {
    /// Try to convert to a boolean value
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ConstantValue::Boolean(value) => Some(*value),
            ConstantValue::Int(value) => Some(*value != 0),
            _ => None,
        }
    }

    /// Try to convert to an integer value
    ///
    /// Covers every integral kind that widens to `int` without loss.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ConstantValue::Boolean(value) => Some(i32::from(*value)),
            ConstantValue::Byte(value) => Some(i32::from(*value)),
            ConstantValue::Char(value) => Some(i32::from(*value)),
            ConstantValue::Short(value) => Some(i32::from(*value)),
            ConstantValue::Int(value) => Some(*value),
            ConstantValue::Long(value) => i32::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Try to convert to a 64-bit integer value
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConstantValue::Long(value) => Some(*value),
            other => other.as_i32().map(i64::from),
        }
    }

    /// Try to convert to a floating point value
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConstantValue::Float(value) => Some(f64::from(*value)),
            ConstantValue::Double(value) => Some(*value),
            ConstantValue::Int(value) => Some(f64::from(*value)),
            _ => None,
        }
    }

    /// Try to access the string payload
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Boolean(value) => write!(f, "{value}"),
            ConstantValue::Byte(value) => write!(f, "{value}"),
            ConstantValue::Char(value) => match char::from_u32(u32::from(*value)) {
                Some(c) => write!(f, "'{c}'"),
                None => write!(f, "'\\u{value:04x}'"),
            },
            ConstantValue::Short(value) => write!(f, "{value}"),
            ConstantValue::Int(value) => write!(f, "{value}"),
            ConstantValue::Long(value) => write!(f, "{value}L"),
            ConstantValue::Float(value) => write!(f, "{value}f"),
            ConstantValue::Double(value) => write!(f, "{value}d"),
            ConstantValue::String(value) => write!(f, "{value:?}"),
            ConstantValue::Class(descriptor) => write!(f, "{descriptor}.class"),
        }
    }
}

/// The nine JVM primitive kinds, `void` included.
///
/// Each kind has exactly one canonical [`crate::TypeId`] in a [`crate::Library`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Display)]
pub enum PrimitiveKind {
    /// `boolean`, descriptor `Z`
    #[strum(serialize = "boolean")]
    Boolean,
    /// `byte`, descriptor `B`
    #[strum(serialize = "byte")]
    Byte,
    /// `char`, descriptor `C`
    #[strum(serialize = "char")]
    Char,
    /// `short`, descriptor `S`
    #[strum(serialize = "short")]
    Short,
    /// `int`, descriptor `I`
    #[strum(serialize = "int")]
    Int,
    /// `long`, descriptor `J`
    #[strum(serialize = "long")]
    Long,
    /// `float`, descriptor `F`
    #[strum(serialize = "float")]
    Float,
    /// `double`, descriptor `D`
    #[strum(serialize = "double")]
    Double,
    /// `void`, descriptor `V`; only valid as a method return type
    #[strum(serialize = "void")]
    Void,
}

impl PrimitiveKind {
    /// The single-character descriptor of this kind
    #[must_use]
    pub fn descriptor(self) -> char {
        match self {
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Short => 'S',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Double => 'D',
            PrimitiveKind::Void => 'V',
        }
    }

    /// Map a descriptor byte to its kind, `None` for non-primitive descriptor bytes
    #[must_use]
    pub fn from_descriptor(byte: u8) -> Option<Self> {
        match byte {
            b'Z' => Some(PrimitiveKind::Boolean),
            b'B' => Some(PrimitiveKind::Byte),
            b'C' => Some(PrimitiveKind::Char),
            b'S' => Some(PrimitiveKind::Short),
            b'I' => Some(PrimitiveKind::Int),
            b'J' => Some(PrimitiveKind::Long),
            b'F' => Some(PrimitiveKind::Float),
            b'D' => Some(PrimitiveKind::Double),
            b'V' => Some(PrimitiveKind::Void),
            _ => None,
        }
    }

    /// Map a source-level keyword (`int`, `void`, ...) to its kind
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        PrimitiveKind::iter().find(|kind| kind.to_string() == name)
    }

    /// Internal name of the wrapper class, `None` for `void`
    #[must_use]
    pub fn boxed_class(self) -> Option<&'static str> {
        match self {
            PrimitiveKind::Boolean => Some("java/lang/Boolean"),
            PrimitiveKind::Byte => Some("java/lang/Byte"),
            PrimitiveKind::Char => Some("java/lang/Character"),
            PrimitiveKind::Short => Some("java/lang/Short"),
            PrimitiveKind::Int => Some("java/lang/Integer"),
            PrimitiveKind::Long => Some("java/lang/Long"),
            PrimitiveKind::Float => Some("java/lang/Float"),
            PrimitiveKind::Double => Some("java/lang/Double"),
            PrimitiveKind::Void => None,
        }
    }

    /// The numeric kind tag shared with the wrapper class
    #[must_use]
    pub fn numeric_kind(self) -> NumericTypeKind {
        match self {
            PrimitiveKind::Boolean => NumericTypeKind::Boolean,
            PrimitiveKind::Byte => NumericTypeKind::Byte,
            PrimitiveKind::Char => NumericTypeKind::Char,
            PrimitiveKind::Short => NumericTypeKind::Short,
            PrimitiveKind::Int => NumericTypeKind::Int,
            PrimitiveKind::Long => NumericTypeKind::Long,
            PrimitiveKind::Float => NumericTypeKind::Float,
            PrimitiveKind::Double => NumericTypeKind::Double,
            PrimitiveKind::Void => NumericTypeKind::None,
        }
    }

    /// Returns true for `long` and `double`, which take two local slots
    #[must_use]
    pub fn is_wide(self) -> bool {
        matches!(self, PrimitiveKind::Long | PrimitiveKind::Double)
    }
}

/// Tag that lets the compiler treat primitives and their wrapper classes uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumCount, Display)]
pub enum NumericTypeKind {
    /// Not a primitive nor a primitive wrapper
    #[default]
    None,
    /// `boolean` / `java/lang/Boolean`
    Boolean,
    /// `byte` / `java/lang/Byte`
    Byte,
    /// `char` / `java/lang/Character`
    Char,
    /// `short` / `java/lang/Short`
    Short,
    /// `int` / `java/lang/Integer`
    Int,
    /// `long` / `java/lang/Long`
    Long,
    /// `float` / `java/lang/Float`
    Float,
    /// `double` / `java/lang/Double`
    Double,
}

impl NumericTypeKind {
    /// The tag for a wrapper class internal name, [`NumericTypeKind::None`] otherwise
    #[must_use]
    pub fn from_boxed_class(name: &str) -> Self {
        PrimitiveKind::iter()
            .find(|kind| kind.boxed_class() == Some(name))
            .map_or(NumericTypeKind::None, PrimitiveKind::numeric_kind)
    }

    /// The primitive this tag stands for
    #[must_use]
    pub fn primitive(self) -> Option<PrimitiveKind> {
        if self == NumericTypeKind::None {
            return None;
        }
        PrimitiveKind::iter().find(|kind| kind.numeric_kind() == self)
    }

    /// Returns true for the integral kinds, `char` included
    #[must_use]
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            NumericTypeKind::Byte
                | NumericTypeKind::Char
                | NumericTypeKind::Short
                | NumericTypeKind::Int
                | NumericTypeKind::Long
        )
    }

    /// Returns true for `float` and `double`
    #[must_use]
    pub fn is_floating(self) -> bool {
        matches!(self, NumericTypeKind::Float | NumericTypeKind::Double)
    }
}
