//! # Attributes Module
//!
//! Attributes that can appear on a class, field, or method in the output class file, trimmed to
//! the set the bytecode generation back-end actually produces: `Code`, `ConstantValue`,
//! `Exceptions`, `InnerClasses`, `BootstrapMethods`, `Signature`, and `SourceFile`.
//! `StackMapTable`, the module-system attributes, annotations, and `MethodParameters` are not
//! produced by this compiler (see Non-goals and `DESIGN.md`) and are not modeled here; a class
//! file carrying them is still readable, via the catch-all `Attribute::Unknown` variant.

/// Defines the structure for array type information used by `newarray`.
mod array_type;

/// Core attribute structure that serves as the base for all class file attributes.
mod attribute;

/// Represents bootstrap method entries used for `invokedynamic` instructions.
mod bootstrap_method;

/// Defines exception table entries for try-catch-finally regions in method code.
mod exception_table_entry;

/// Contains information about inner classes and their relationship to the outer class.
mod inner_class;

/// Represents JVM bytecode instructions within method code.
mod instruction;

/// Opcode <-> byte encoding helpers and instruction byte-length computation.
mod instruction_utils;

/// Defines the maximum number of local variables for a method.
mod max_locals;

/// Defines the maximum operand stack size for a method.
mod max_stack;

/// Defines access flags for nested classes referenced by `InnerClasses`.
mod nested_class_access_flags;

/// Utilities for working with bytecode branch offsets.
mod offset_utils;

pub use array_type::ArrayType;
pub use attribute::Attribute;
pub use bootstrap_method::BootstrapMethod;
pub use exception_table_entry::ExceptionTableEntry;
pub use inner_class::InnerClass;
pub use instruction::{Instruction, LookupSwitch, TableSwitch};
pub use max_locals::MaxLocals;
pub use max_stack::MaxStack;
pub use nested_class_access_flags::NestedClassAccessFlags;
