//! Callback traits of the class-file decoder boundary.
//!
//! A decoder turns class-file bytes into calls on these traits. The library
//! implements them to collect an outline, and the in-memory
//! [`crate::metadata::classfile::MemoryProvider`] drives them from recorded
//! definitions. Every callback is fallible so that a collector can stop the decoder as
//! soon as the input is inconsistent.
//!
//! Calls for nested structures (members, annotations, arrays) return a fresh visitor
//! that borrows its parent; the decoder finishes it with `visit_end` before it touches
//! the parent again.

use crate::{
    metadata::{flags::AccessFlags, typesystem::ConstantValue},
    Result,
};

/// Receives the top-level structure of one class file
pub trait ClassVisitor {
    /// First callback, exactly once per class
    ///
    /// ## Arguments
    /// * `modifiers` - Access flags of the class
    /// * `name` - Internal name (`java/util/Map$Entry`)
    /// * `signature` - The generic `Signature` attribute, if any
    /// * `super_name` - Internal name of the superclass, absent for `java/lang/Object`
    /// * `interfaces` - Internal names of the direct interfaces
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_header(
        &mut self,
        modifiers: AccessFlags,
        name: &str,
        signature: Option<&str>,
        super_name: Option<&str>,
        interfaces: &[&str],
    ) -> Result<()>;

    /// A field declaration
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_field<'s>(
        &'s mut self,
        modifiers: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        constant: Option<ConstantValue>,
    ) -> Result<Box<dyn MemberVisitor + 's>>;

    /// A method or constructor declaration
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_method<'s>(
        &'s mut self,
        modifiers: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        exceptions: &[&str],
    ) -> Result<Box<dyn MemberVisitor + 's>>;

    /// An annotation on the class
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_annotation<'s>(
        &'s mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationVisitor + 's>>;

    /// An `InnerClasses` entry; entries describe this class, its members and any
    /// other nested class it references
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_inner_class(
        &mut self,
        name: &str,
        outer_name: Option<&str>,
        inner_name: Option<&str>,
        modifiers: AccessFlags,
    ) -> Result<()>;

    /// Last callback, exactly once per class
    ///
    /// # Errors
    /// Returns an error if the collected data is incomplete
    fn visit_end(&mut self) -> Result<()>;
}

/// Receives the attributes of a field or method
pub trait MemberVisitor {
    /// An annotation on the member
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_annotation<'s>(
        &'s mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationVisitor + 's>>;

    /// An annotation on the parameter at `parameter` (methods only)
    ///
    /// # Errors
    /// Returns an error to abort decoding, or if the member is a field
    fn visit_parameter_annotation<'s>(
        &'s mut self,
        parameter: usize,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationVisitor + 's>>;

    /// The `AnnotationDefault` attribute of an annotation interface method; the returned
    /// visitor receives exactly one unnamed value
    ///
    /// # Errors
    /// Returns an error to abort decoding, or if the member is a field
    fn visit_annotation_default<'s>(&'s mut self) -> Result<Box<dyn AnnotationVisitor + 's>>;

    /// A `MethodParameters` entry, in parameter order
    ///
    /// # Errors
    /// Returns an error to abort decoding, or if the member is a field
    fn visit_parameter(&mut self, name: Option<&str>, modifiers: AccessFlags) -> Result<()>;

    /// Last callback for the member
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_end(&mut self) -> Result<()>;
}

/// Receives one annotation, array, or default value
///
/// `name` is present for elements of an annotation and absent for array elements and
/// default values.
pub trait AnnotationVisitor {
    /// A scalar element value or class literal
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit(&mut self, name: Option<&str>, value: ConstantValue) -> Result<()>;

    /// An enum constant
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, constant: &str) -> Result<()>;

    /// A nested annotation value
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_annotation<'s>(
        &'s mut self,
        name: Option<&str>,
        descriptor: &str,
    ) -> Result<Box<dyn AnnotationVisitor + 's>>;

    /// An array value; its elements are visited without names
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_array<'s>(&'s mut self, name: Option<&str>) -> Result<Box<dyn AnnotationVisitor + 's>>;

    /// Last callback for this value
    ///
    /// # Errors
    /// Returns an error to abort decoding
    fn visit_end(&mut self) -> Result<()>;
}

/// Source of class files, keyed by internal name
pub trait ClassProvider: Send + Sync {
    /// Replay the class named `name` into `visitor`
    ///
    /// Returns `Ok(false)` if the provider has no class of that name, in which case the
    /// visitor must not have been called.
    ///
    /// # Errors
    /// Returns an error if decoding failed or the visitor aborted
    fn visit_class(&self, name: &str, visitor: &mut dyn ClassVisitor) -> Result<bool>;
}

impl<P: ClassProvider + ?Sized> ClassProvider for std::sync::Arc<P> {
    fn visit_class(&self, name: &str, visitor: &mut dyn ClassVisitor) -> Result<bool> {
        (**self).visit_class(name, visitor)
    }
}

impl<P: ClassProvider + ?Sized> ClassProvider for Box<P> {
    fn visit_class(&self, name: &str, visitor: &mut dyn ClassVisitor) -> Result<bool> {
        (**self).visit_class(name, visitor)
    }
}
