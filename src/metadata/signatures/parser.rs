use crate::{
    file::parser::Parser,
    metadata::{
        signatures::{
            ClassSignature, ClassTypeSignature, FormalTypeParameter, MethodDescriptor,
            MethodSignature, TypeSignature,
        },
        typesystem::PrimitiveKind,
    },
    Error::RecursionLimit,
    Result,
};

/// Maximum recursion depth for signature parsing
pub const MAX_RECURSION_DEPTH: usize = 64;

/// Delimiters that end a class name segment inside `L...;`
const CLASS_NAME_END: &[u8] = b";<.";

/// Signature parser for the JVM generic signature grammar and plain descriptors
///
/// # Example
///
/// ```rust
/// use classscope::metadata::signatures::{SignatureParser, TypeSignature};
/// let mut parser = SignatureParser::new("<T:Ljava/lang/Object;>(TT;)TT;");
/// let sig = parser.parse_method_signature().unwrap();
/// assert_eq!(sig.parameters, vec![TypeSignature::TypeVariable("T".to_string())]);
/// ```
///
/// ## Notes:
/// - Input comes from compiled metadata and is trusted; there is no error recovery.
/// - If you're using the `SignatureParser` directly, and not via one of its wrapper functions,
///   make sure to not re-use your parser instance for multiple signatures.
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
    depth: usize,
    max_depth: usize,
    generics: bool,
}

impl<'a> SignatureParser<'a> {
    /// Create a new `SignatureParser` for generic signatures
    ///
    /// ## Arguments
    /// * 'text' - The signature to read from
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        SignatureParser {
            parser: Parser::new(text),
            depth: 0,
            max_depth: MAX_RECURSION_DEPTH,
            generics: true,
        }
    }

    /// Create a new `SignatureParser` that only accepts erased descriptors
    ///
    /// ## Arguments
    /// * 'text' - The descriptor to read from
    #[must_use]
    pub fn descriptor(text: &'a str) -> Self {
        SignatureParser {
            generics: false,
            ..SignatureParser::new(text)
        }
    }

    /// Override the nesting limit
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse a class signature: `[TypeParameters] SuperclassSignature SuperinterfaceSignature*`
    ///
    /// # Errors
    /// Returns an error if the signature does not follow the grammar
    pub fn parse_class_signature(&mut self) -> Result<ClassSignature> {
        let type_parameters = self.parse_formal_type_parameters()?;
        let superclass = self.parse_class_type()?;

        let mut interfaces = Vec::new();
        while self.parser.has_more_data() {
            interfaces.push(self.parse_class_type()?);
        }

        Ok(ClassSignature {
            type_parameters,
            superclass,
            interfaces,
        })
    }

    /// Parse a method signature: `[TypeParameters] ( Type* ) ReturnType ThrowsSignature*`
    ///
    /// # Errors
    /// Returns an error if the signature does not follow the grammar
    pub fn parse_method_signature(&mut self) -> Result<MethodSignature> {
        let type_parameters = self.parse_formal_type_parameters()?;
        let parameters = self.parse_parameter_list()?;
        let return_type = self.parse_return_type()?;

        let mut exceptions = Vec::new();
        while self.parser.consume_if(b'^') {
            let exception = match self.parser.peek_byte()? {
                b'T' => self.parse_type_variable()?,
                _ => TypeSignature::Class(self.parse_class_type()?),
            };
            exceptions.push(exception);
        }
        self.finish()?;

        Ok(MethodSignature {
            type_parameters,
            parameters,
            return_type,
            exceptions,
        })
    }

    /// Parse a method descriptor: `( FieldType* ) ReturnType`
    ///
    /// # Errors
    /// Returns an error if the descriptor does not follow the grammar
    pub fn parse_method_descriptor(&mut self) -> Result<MethodDescriptor> {
        let parameters = self.parse_parameter_list()?;
        let return_type = self.parse_return_type()?;
        self.finish()?;

        Ok(MethodDescriptor {
            parameters,
            return_type,
        })
    }

    /// Parse a complete field type signature or field descriptor
    ///
    /// # Errors
    /// Returns an error if the input does not hold exactly one type
    pub fn parse_type_signature(&mut self) -> Result<TypeSignature> {
        let signature = self.parse_type()?;
        self.finish()?;
        Ok(signature)
    }

    fn finish(&self) -> Result<()> {
        if self.parser.has_more_data() {
            return Err(self.parser.error("trailing characters after signature"));
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_formal_type_parameters(&mut self) -> Result<Vec<FormalTypeParameter>> {
        if self.parser.peek_byte().ok() != Some(b'<') {
            return Ok(Vec::new());
        }
        if !self.generics {
            return Err(self.parser.error("type parameters are not allowed in a descriptor"));
        }
        self.parser.advance()?;

        let mut parameters = Vec::new();
        while !self.parser.consume_if(b'>') {
            let name = self.parser.read_identifier(b":")?.to_string();
            self.parser.expect_byte(b':')?;

            // An empty class bound is written as `T::` followed by interface bounds
            let class_bound = match self.parser.peek_byte()? {
                b':' | b'>' => None,
                _ => Some(self.parse_reference_type()?),
            };

            let mut interface_bounds = Vec::new();
            while self.parser.consume_if(b':') {
                interface_bounds.push(self.parse_reference_type()?);
            }

            parameters.push(FormalTypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }

        if parameters.is_empty() {
            return Err(self.parser.error("empty type parameter list"));
        }
        Ok(parameters)
    }

    fn parse_parameter_list(&mut self) -> Result<Vec<TypeSignature>> {
        self.parser.expect_byte(b'(')?;

        let mut parameters = Vec::new();
        while !self.parser.consume_if(b')') {
            parameters.push(self.parse_type()?);
        }
        Ok(parameters)
    }

    fn parse_return_type(&mut self) -> Result<TypeSignature> {
        if self.parser.consume_if(b'V') {
            return Ok(TypeSignature::Void);
        }
        self.parse_type()
    }

    /// Any value type: primitive or reference
    fn parse_type(&mut self) -> Result<TypeSignature> {
        match self.parser.peek_byte()? {
            b'L' | b'[' | b'T' => self.parse_reference_type(),
            byte => match PrimitiveKind::from_descriptor(byte) {
                Some(PrimitiveKind::Void) => {
                    Err(self.parser.error("'V' is only valid as a return type"))
                }
                Some(kind) => {
                    self.parser.advance()?;
                    Ok(TypeSignature::Primitive(kind))
                }
                None => Err(self
                    .parser
                    .error(format!("unexpected '{}' in type position", byte as char))),
            },
        }
    }

    fn parse_reference_type(&mut self) -> Result<TypeSignature> {
        self.enter()?;
        let signature = match self.parser.peek_byte()? {
            b'L' => TypeSignature::Class(self.parse_class_type()?),
            b'T' => self.parse_type_variable()?,
            b'[' => {
                self.parser.advance()?;
                TypeSignature::Array(Box::new(self.parse_type()?))
            }
            byte => {
                return Err(self
                    .parser
                    .error(format!("expected reference type, found '{}'", byte as char)))
            }
        };
        self.leave();
        Ok(signature)
    }

    fn parse_type_variable(&mut self) -> Result<TypeSignature> {
        if !self.generics {
            return Err(self.parser.error("type variables are not allowed in a descriptor"));
        }
        self.parser.expect_byte(b'T')?;
        let name = self.parser.read_identifier(b";")?.to_string();
        self.parser.expect_byte(b';')?;
        Ok(TypeSignature::TypeVariable(name))
    }

    /// `L` name [TypeArguments] { `.` simple [TypeArguments] } `;`
    fn parse_class_type(&mut self) -> Result<ClassTypeSignature> {
        self.parser.expect_byte(b'L')?;

        let mut current = ClassTypeSignature::new(self.parser.read_identifier(CLASS_NAME_END)?);
        current.type_arguments = self.parse_type_arguments()?;

        while self.parser.consume_if(b'.') {
            if !self.generics {
                return Err(self.parser.error("inner class suffix is not allowed in a descriptor"));
            }
            let simple = self.parser.read_identifier(CLASS_NAME_END)?;
            let mut inner = ClassTypeSignature::new(format!("{}${}", current.name, simple));
            inner.type_arguments = self.parse_type_arguments()?;
            inner.enclosing = Some(Box::new(current));
            current = inner;
        }

        self.parser.expect_byte(b';')?;
        Ok(current)
    }

    fn parse_type_arguments(&mut self) -> Result<Vec<TypeSignature>> {
        if self.parser.peek_byte()? != b'<' {
            return Ok(Vec::new());
        }
        if !self.generics {
            return Err(self.parser.error("type arguments are not allowed in a descriptor"));
        }
        self.parser.advance()?;

        let mut arguments = Vec::new();
        while !self.parser.consume_if(b'>') {
            let argument = match self.parser.peek_byte()? {
                b'*' => {
                    self.parser.advance()?;
                    TypeSignature::Wildcard
                }
                b'+' => {
                    self.parser.advance()?;
                    TypeSignature::WildcardExtends(Box::new(self.parse_reference_type()?))
                }
                b'-' => {
                    self.parser.advance()?;
                    TypeSignature::WildcardSuper(Box::new(self.parse_reference_type()?))
                }
                _ => self.parse_reference_type()?,
            };
            arguments.push(argument);
        }

        if arguments.is_empty() {
            return Err(self.parser.error("empty type argument list"));
        }
        Ok(arguments)
    }
}
