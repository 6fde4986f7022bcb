//! Conversions between `javac_classfile`'s on-disk descriptor types and the AST's `Type`.

use crate::error::{Error, Result};
use javac_ast::{Primitive, Type};
use javac_classfile::{BaseType, FieldType};

pub(crate) fn base_type_to_primitive(base_type: &BaseType) -> Primitive {
    match base_type {
        BaseType::Boolean => Primitive::Boolean,
        BaseType::Byte => Primitive::Byte,
        BaseType::Char => Primitive::Char,
        BaseType::Double => Primitive::Double,
        BaseType::Float => Primitive::Float,
        BaseType::Int => Primitive::Int,
        BaseType::Long => Primitive::Long,
        BaseType::Short => Primitive::Short,
    }
}

pub(crate) fn field_type_to_ast(field_type: &FieldType) -> Type {
    match field_type {
        FieldType::Base(base) => Type::Primitive(base_type_to_primitive(base)),
        FieldType::Object(name) => Type::Reference(name.clone()),
        FieldType::Array(component) => {
            let (element, dims) = array_dims(component);
            Type::array(element, dims)
        }
    }
}

/// `FieldType::Array` nests one level per dimension; flatten it into `(element, dims)` the way
/// `javac_ast::Type::Array` represents a multi-dimensional array directly.
fn array_dims(component: &FieldType) -> (Type, u8) {
    match component {
        FieldType::Array(inner) => {
            let (element, dims) = array_dims(inner);
            (element, dims + 1)
        }
        other => (field_type_to_ast(other), 1),
    }
}

/// Parses a JVM method descriptor, e.g. `(ILjava/lang/String;)V`, into parameter types and a
/// return type. `javac_classfile::Method` only stores the raw descriptor string, so this is the
/// classpath layer's own small parser (the resolver never touches raw descriptors directly).
pub(crate) fn parse_method_descriptor(descriptor: &str) -> Result<(Vec<Type>, Type)> {
    let mut chars = descriptor.chars().peekable();
    if chars.next() != Some('(') {
        return Err(Error::MalformedDescriptor(descriptor.to_string()));
    }

    let mut params = Vec::new();
    loop {
        match chars.peek() {
            Some(')') => {
                chars.next();
                break;
            }
            Some(_) => params.push(parse_one_field_descriptor(&mut chars, descriptor)?),
            None => return Err(Error::MalformedDescriptor(descriptor.to_string())),
        }
    }

    let remainder: String = chars.collect();
    let return_type = if remainder == "V" {
        Type::Void
    } else {
        field_type_to_ast(&FieldType::parse(&remainder)?)
    };
    Ok((params, return_type))
}

fn parse_one_field_descriptor(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    whole: &str,
) -> Result<Type> {
    let mut buf = String::new();
    loop {
        let Some(&c) = chars.peek() else {
            return Err(Error::MalformedDescriptor(whole.to_string()));
        };
        match c {
            '[' => {
                buf.push(c);
                chars.next();
            }
            'L' => {
                buf.push(c);
                chars.next();
                loop {
                    match chars.next() {
                        Some(';') => {
                            buf.push(';');
                            break;
                        }
                        Some(ch) => buf.push(ch),
                        None => return Err(Error::MalformedDescriptor(whole.to_string())),
                    }
                }
                break;
            }
            _ => {
                buf.push(c);
                chars.next();
                break;
            }
        }
    }
    let field_type = FieldType::parse(&buf)?;
    Ok(field_type_to_ast(&field_type))
}
