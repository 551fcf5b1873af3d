//! Access and property flags of classes, fields, methods and parameters.
//!
//! The JVM encodes all modifiers of a declaration in one 16-bit mask. Several bits are
//! shared between declaration kinds (`0x0020` is `ACC_SUPER` on classes and
//! `ACC_SYNCHRONIZED` on methods, `0x0040` is `ACC_VOLATILE` on fields and `ACC_BRIDGE`
//! on methods), so the predicates below only make sense for the declaration kind they
//! name.

use bitflags::bitflags;

/// Bitmask for the three visibility bits
pub const ACCESS_VISIBILITY_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Modifiers of a class, field, method or parameter
    pub struct AccessFlags: u32 {
        /// Visible everywhere
        const PUBLIC = 0x0001;
        /// Visible only inside the declaring class
        const PRIVATE = 0x0002;
        /// Visible to subclasses and the package
        const PROTECTED = 0x0004;
        /// Belongs to the class rather than an instance
        const STATIC = 0x0008;
        /// Cannot be overridden, subclassed or reassigned
        const FINAL = 0x0010;
        /// Class: treat superclass calls with `invokespecial` semantics
        const SUPER = 0x0020;
        /// Method: invocation is wrapped in a monitor
        const SYNCHRONIZED = 0x0020;
        /// Field: cannot be cached
        const VOLATILE = 0x0040;
        /// Method: compiler generated bridge
        const BRIDGE = 0x0040;
        /// Field: not serialized
        const TRANSIENT = 0x0080;
        /// Method: takes a variable number of arguments
        const VARARGS = 0x0080;
        /// Method: implemented outside the JVM
        const NATIVE = 0x0100;
        /// Class: is an interface
        const INTERFACE = 0x0200;
        /// Class or method: has no implementation
        const ABSTRACT = 0x0400;
        /// Method: strict floating point
        const STRICT = 0x0800;
        /// Not present in source
        const SYNTHETIC = 0x1000;
        /// Class: is an annotation interface
        const ANNOTATION = 0x2000;
        /// Class or field: is an enum or enum constant
        const ENUM = 0x4000;
        /// Parameter: implicitly declared
        const MANDATED = 0x8000;
    }
}

impl AccessFlags {
    /// Build flags from the raw access mask, dropping unknown bits
    #[must_use]
    pub fn from_access(access: u32) -> Self {
        Self::from_bits_truncate(access)
    }

    /// Only the visibility bits of these flags
    #[must_use]
    pub fn visibility(self) -> Self {
        Self::from_bits_truncate(self.bits() & ACCESS_VISIBILITY_MASK)
    }

    /// Returns true if the `PUBLIC` bit is set
    #[must_use]
    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    /// Returns true if the `PRIVATE` bit is set
    #[must_use]
    pub fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    /// Returns true if the `PROTECTED` bit is set
    #[must_use]
    pub fn is_protected(self) -> bool {
        self.contains(Self::PROTECTED)
    }

    /// Returns true if no visibility bit is set
    #[must_use]
    pub fn is_package_private(self) -> bool {
        self.visibility().is_empty()
    }

    /// Returns true if the `STATIC` bit is set
    #[must_use]
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    /// Returns true if the `FINAL` bit is set
    #[must_use]
    pub fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    /// Returns true if the `ABSTRACT` bit is set
    #[must_use]
    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    /// Returns true if the `SYNTHETIC` bit is set
    #[must_use]
    pub fn is_synthetic(self) -> bool {
        self.contains(Self::SYNTHETIC)
    }

    /// Returns true if the `INTERFACE` bit is set
    #[must_use]
    pub fn is_interface(self) -> bool {
        self.contains(Self::INTERFACE)
    }

    /// Returns true if the `ANNOTATION` bit is set
    #[must_use]
    pub fn is_annotation(self) -> bool {
        self.contains(Self::ANNOTATION)
    }

    /// Returns true if the `ENUM` bit is set
    #[must_use]
    pub fn is_enum(self) -> bool {
        self.contains(Self::ENUM)
    }

    /// Method only: returns true if the `VARARGS` bit is set
    #[must_use]
    pub fn is_varargs(self) -> bool {
        self.contains(Self::VARARGS)
    }

    /// Method only: returns true if the `BRIDGE` bit is set
    #[must_use]
    pub fn is_bridge(self) -> bool {
        self.contains(Self::BRIDGE)
    }

    /// Field only: returns true if the `VOLATILE` bit is set
    #[must_use]
    pub fn is_volatile(self) -> bool {
        self.contains(Self::VOLATILE)
    }

    /// Field only: returns true if the `TRANSIENT` bit is set
    #[must_use]
    pub fn is_transient(self) -> bool {
        self.contains(Self::TRANSIENT)
    }

    /// Returns true if the `NATIVE` bit is set
    #[must_use]
    pub fn is_native(self) -> bool {
        self.contains(Self::NATIVE)
    }

    /// Method only: returns true if the `SYNCHRONIZED` bit is set
    #[must_use]
    pub fn is_synchronized(self) -> bool {
        self.contains(Self::SYNCHRONIZED)
    }

    /// Returns true if the `STRICT` bit is set
    #[must_use]
    pub fn is_strict(self) -> bool {
        self.contains(Self::STRICT)
    }
}
