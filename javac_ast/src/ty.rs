//! The closed, JVM-visible type model every later compilation stage builds on.
//!
//! See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.3.2>

use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight JVM primitive kinds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    /// The JVM descriptor letter, e.g. `I` for `int`.
    #[must_use]
    pub fn descriptor(self) -> char {
        match self {
            Primitive::Boolean => 'Z',
            Primitive::Byte => 'B',
            Primitive::Short => 'S',
            Primitive::Char => 'C',
            Primitive::Int => 'I',
            Primitive::Long => 'J',
            Primitive::Float => 'F',
            Primitive::Double => 'D',
        }
    }

    /// Computational category: 2 for `long`/`double`, 1 otherwise.
    #[must_use]
    pub fn category(self) -> u8 {
        match self {
            Primitive::Long | Primitive::Double => 2,
            _ => 1,
        }
    }

    /// True for `byte`, `short`, `char`, `int` — the integer family that shares opcodes.
    #[must_use]
    pub fn is_int_family(self) -> bool {
        matches!(
            self,
            Primitive::Boolean | Primitive::Byte | Primitive::Short | Primitive::Char | Primitive::Int
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Char => "char",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        };
        write!(f, "{name}")
    }
}

/// The JVM zero-value used to initialize a field or local with no explicit initializer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ZeroValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Null,
}

/// A closed sum of every type observable by the bytecode generation back-end.
///
/// Invariant: an `Array` element is never `Void`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(Primitive),
    /// A class or interface, named by its internal (`/`-separated) binary name, e.g.
    /// `java/lang/String`.
    Reference(String),
    Array(Box<Type>, u8),
    Void,
}

impl Type {
    #[must_use]
    pub fn reference(internal_name: impl Into<String>) -> Type {
        Type::Reference(internal_name.into())
    }

    #[must_use]
    pub fn array(element: Type, dims: u8) -> Type {
        assert!(dims > 0, "array type must have at least one dimension");
        Type::Array(Box::new(element), dims)
    }

    /// The JVM field descriptor for this type, e.g. `I`, `Ljava/lang/String;`, `[[I`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        match self {
            Type::Primitive(p) => p.descriptor().to_string(),
            Type::Reference(name) => format!("L{name};"),
            Type::Array(element, dims) => format!("{}{}", "[".repeat(*dims as usize), element.descriptor()),
            Type::Void => "V".to_string(),
        }
    }

    /// Computational category: 2 for `long`/`double`, 1 for everything else including `void`
    /// (which never occupies a slot, but callers treat a 1-slot default as harmless).
    #[must_use]
    pub fn category(&self) -> u8 {
        match self {
            Type::Primitive(p) => p.category(),
            _ => 1,
        }
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Reference(_) | Type::Array(_, _))
    }

    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// `true` if this is `long` or `double` (the two category-2 primitives).
    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.category() == 2
    }

    #[must_use]
    pub fn default_value(&self) -> ZeroValue {
        match self {
            Type::Primitive(Primitive::Boolean) => ZeroValue::Boolean(false),
            Type::Primitive(Primitive::Long) => ZeroValue::Long(0),
            Type::Primitive(Primitive::Float) => ZeroValue::Float(0.0),
            Type::Primitive(Primitive::Double) => ZeroValue::Double(0.0),
            Type::Primitive(_) => ZeroValue::Int(0),
            Type::Reference(_) | Type::Array(_, _) => ZeroValue::Null,
            Type::Void => ZeroValue::Int(0),
        }
    }

    #[must_use]
    pub fn object() -> Type {
        Type::reference("java/lang/Object")
    }

    #[must_use]
    pub fn string() -> Type {
        Type::reference("java/lang/String")
    }

    /// The wrapper class internal name for a primitive type, used by autoboxing.
    #[must_use]
    pub fn boxed_name(primitive: Primitive) -> &'static str {
        match primitive {
            Primitive::Boolean => "java/lang/Boolean",
            Primitive::Byte => "java/lang/Byte",
            Primitive::Short => "java/lang/Short",
            Primitive::Char => "java/lang/Character",
            Primitive::Int => "java/lang/Integer",
            Primitive::Long => "java/lang/Long",
            Primitive::Float => "java/lang/Float",
            Primitive::Double => "java/lang/Double",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Reference(name) => write!(f, "{}", name.replace('/', ".")),
            Type::Array(element, dims) => write!(f, "{element}{}", "[]".repeat(*dims as usize)),
            Type::Void => write!(f, "void"),
        }
    }
}

/// Builds a method descriptor string from parameter and return types, e.g. `(IJ)Ljava/lang/String;`.
#[must_use]
pub fn method_descriptor(params: &[Type], return_type: &Type) -> String {
    let mut descriptor = String::from("(");
    for param in params {
        descriptor.push_str(&param.descriptor());
    }
    descriptor.push(')');
    descriptor.push_str(&return_type.descriptor());
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_descriptors() {
        assert_eq!(Primitive::Int.descriptor(), 'I');
        assert_eq!(Primitive::Long.descriptor(), 'J');
        assert_eq!(Primitive::Boolean.descriptor(), 'Z');
    }

    #[test]
    fn category_two_for_wide_types() {
        assert_eq!(Type::Primitive(Primitive::Long).category(), 2);
        assert_eq!(Type::Primitive(Primitive::Double).category(), 2);
        assert_eq!(Type::Primitive(Primitive::Int).category(), 1);
        assert_eq!(Type::string().category(), 1);
    }

    #[test]
    fn array_descriptor_nesting() {
        let ty = Type::array(Type::Primitive(Primitive::Int), 2);
        assert_eq!(ty.descriptor(), "[[I");
    }

    #[test]
    fn reference_descriptor() {
        assert_eq!(Type::string().descriptor(), "Ljava/lang/String;");
    }

    #[test]
    fn method_descriptor_shape() {
        let descriptor = method_descriptor(
            &[Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Long)],
            &Type::string(),
        );
        assert_eq!(descriptor, "(IJ)Ljava/lang/String;");
    }

    #[test]
    fn default_values() {
        assert_eq!(Type::Primitive(Primitive::Boolean).default_value(), ZeroValue::Boolean(false));
        assert_eq!(Type::string().default_value(), ZeroValue::Null);
        assert_eq!(Type::Primitive(Primitive::Double).default_value(), ZeroValue::Double(0.0));
    }
}
