use thiserror::Error;

/// Errors raised while assembling a method's `Code` attribute.
///
/// Mirrors the `#[derive(Error)]` + `#[from]` pattern `javac_classfile::Error` already uses, so
/// a builder failure propagates through `?` the same way a class-file serialization failure does.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error("label {0:?} was branched to but never bound")]
    UnboundLabel(Label),
    #[error("label {0:?} was bound more than once")]
    LabelAlreadyBound(Label),
    #[error("operand stack underflow: popped {popped} below a stack of depth {depth}")]
    StackUnderflow { depth: i32, popped: i32 },
    #[error("local variable slot {0} exceeds u16 range")]
    LocalSlotOverflow(u32),
    #[error(transparent)]
    ClassFile(#[from] javac_classfile::Error),
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),
}

pub type Result<T> = std::result::Result<T, Error>;

use crate::label::Label;
