//! Text encoders that turn parsed signatures back into the JVM signature grammar.
//!
//! Every signature type implements [`std::fmt::Display`] so that
//! `parse(x).to_string() == x` holds for well-formed input. The library uses the same
//! encoding when it reports the signature of a constructed type.

use std::fmt::{self, Write};

use crate::metadata::signatures::{
    ClassSignature, ClassTypeSignature, FormalTypeParameter, MethodDescriptor, MethodSignature,
    TypeSignature,
};

fn write_type_parameters(
    f: &mut fmt::Formatter<'_>,
    parameters: &[FormalTypeParameter],
) -> fmt::Result {
    if parameters.is_empty() {
        return Ok(());
    }

    f.write_char('<')?;
    for parameter in parameters {
        write!(f, "{parameter}")?;
    }
    f.write_char('>')
}

fn write_type_arguments(f: &mut fmt::Formatter<'_>, arguments: &[TypeSignature]) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }

    f.write_char('<')?;
    for argument in arguments {
        write!(f, "{argument}")?;
    }
    f.write_char('>')
}

impl ClassTypeSignature {
    fn write_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.enclosing {
            Some(enclosing) => {
                enclosing.write_body(f)?;
                write!(f, ".{}", self.simple_name())?;
            }
            None => f.write_str(&self.name)?,
        }
        write_type_arguments(f, &self.type_arguments)
    }
}

impl fmt::Display for ClassTypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('L')?;
        self.write_body(f)?;
        f.write_char(';')
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Primitive(kind) => f.write_char(kind.descriptor()),
            TypeSignature::Void => f.write_char('V'),
            TypeSignature::Class(class) => write!(f, "{class}"),
            TypeSignature::Array(element) => write!(f, "[{element}"),
            TypeSignature::TypeVariable(name) => write!(f, "T{name};"),
            TypeSignature::Wildcard => f.write_char('*'),
            TypeSignature::WildcardExtends(bound) => write!(f, "+{bound}"),
            TypeSignature::WildcardSuper(bound) => write!(f, "-{bound}"),
        }
    }
}

impl fmt::Display for FormalTypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        if let Some(bound) = &self.class_bound {
            write!(f, "{bound}")?;
        }
        for bound in &self.interface_bounds {
            write!(f, ":{bound}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ClassSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type_parameters(f, &self.type_parameters)?;
        write!(f, "{}", self.superclass)?;
        for interface in &self.interfaces {
            write!(f, "{interface}")?;
        }
        Ok(())
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type_parameters(f, &self.type_parameters)?;
        f.write_char('(')?;
        for parameter in &self.parameters {
            write!(f, "{parameter}")?;
        }
        write!(f, "){}", self.return_type)?;
        for exception in &self.exceptions {
            write!(f, "^{exception}")?;
        }
        Ok(())
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        for parameter in &self.parameters {
            write!(f, "{parameter}")?;
        }
        write!(f, "){}", self.return_type)
    }
}

#[cfg(test)]
mod tests {
    use crate::metadata::signatures::{
        parse_class_signature, parse_method_descriptor, parse_method_signature,
        parse_type_signature,
    };

    #[test]
    fn test_encode_matches_input() {
        let class = "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;";
        assert_eq!(parse_class_signature(class).unwrap().to_string(), class);

        let method = "<T::Ljava/lang/Comparable<-TT;>;>(Ljava/util/List<+TT;>;)TT;^Ljava/io/IOException;";
        assert_eq!(parse_method_signature(method).unwrap().to_string(), method);

        let inner = "Ltest/Outer<TT;>.Inner<[I>.Deeper;";
        assert_eq!(parse_type_signature(inner).unwrap().to_string(), inner);

        let descriptor = "(IJ[Ljava/lang/String;)V";
        assert_eq!(parse_method_descriptor(descriptor).unwrap().to_string(), descriptor);
    }
}
