//! Per-method bytecode builder: the `Code` attribute's instruction stream, operand-stack and
//! local-variable accounting, and forward-branch labels, built on top of `javac_classfile`'s
//! instruction set and stack/locals calculators.

mod builder;
mod error;
mod label;
mod locals;

pub use builder::MethodBuilder;
pub use error::{Error, Result};
pub use label::Label;
pub use locals::LocalScope;
