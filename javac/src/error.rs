//! Composes every downstream crate's error type into one closed, span-carrying error (§7, §10.1).
//!
//! Each lower layer (`javac_classfile`, `javac_classpath`, `javac_codegen`) already owns a closed
//! `enum` of its own failure modes; this crate's job is only to attach a source [`Span`] and a
//! machine-readable [`ErrorKind`] to whichever one actually fired, so a driver can report file:
//! line:column without caring which crate the failure originated in.

use javac_ast::Span;

pub type Result<T, E = CompileError> = core::result::Result<T, E>;

/// A coarse, stable classification of a compile failure, independent of which crate produced it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Produced upstream by the (out-of-scope) parser and only ever round-tripped here; the core
    /// never constructs this variant itself.
    ParseError,
    NameResolution,
    Type,
    UnsupportedFeature,
    InvariantViolation,
    Classpath,
}

#[derive(Debug, thiserror::Error)]
#[error("{span}: {kind:?}: {message}")]
pub struct CompileError {
    pub span: Span,
    pub kind: ErrorKind,
    pub message: String,
}

impl CompileError {
    #[must_use]
    pub fn new(span: Span, kind: ErrorKind, message: impl Into<String>) -> CompileError {
        CompileError {
            span,
            kind,
            message: message.into(),
        }
    }
}

impl From<javac_codegen::Error> for CompileError {
    fn from(error: javac_codegen::Error) -> CompileError {
        match error {
            javac_codegen::Error::NameResolution { span, name } => {
                CompileError::new(span, ErrorKind::NameResolution, format!("cannot find symbol: {name}"))
            }
            javac_codegen::Error::Type { span, message } => CompileError::new(span, ErrorKind::Type, message),
            javac_codegen::Error::UnsupportedFeature { span, feature } => {
                CompileError::new(span, ErrorKind::UnsupportedFeature, feature)
            }
            javac_codegen::Error::InvariantViolation(message) => {
                CompileError::new(Span::synthetic(), ErrorKind::InvariantViolation, message)
            }
            other => CompileError::new(Span::synthetic(), ErrorKind::InvariantViolation, other.to_string()),
        }
    }
}

impl From<javac_classpath::Error> for CompileError {
    fn from(error: javac_classpath::Error) -> CompileError {
        CompileError::new(Span::synthetic(), ErrorKind::Classpath, error.to_string())
    }
}

impl From<javac_classfile::Error> for CompileError {
    fn from(error: javac_classfile::Error) -> CompileError {
        CompileError::new(Span::synthetic(), ErrorKind::InvariantViolation, error.to_string())
    }
}
