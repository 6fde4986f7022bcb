//! Closed error-kind set for statement/expression compilation and class assembly (§7).
//!
//! Resolution and type errors carry a [`Span`] so a failure can be reported against source
//! location; invariant violations are reserved for states the earlier compilation phases should
//! have already ruled out and mean a bug in this crate, not in the input program.

use javac_ast::Span;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    ClassFile(#[from] javac_classfile::Error),
    #[error(transparent)]
    Bytecode(#[from] javac_bytecode::Error),
    #[error(transparent)]
    Resolve(#[from] javac_resolve::Error),
    #[error(transparent)]
    Classpath(#[from] javac_classpath::Error),
    #[error("{span}: cannot find symbol: {name}")]
    NameResolution { span: Span, name: String },
    #[error("{span}: incompatible types: {message}")]
    Type { span: Span, message: String },
    #[error("{span}: unsupported: {feature}")]
    UnsupportedFeature { span: Span, feature: String },
    #[error("internal compiler error: {0}")]
    InvariantViolation(String),
}
