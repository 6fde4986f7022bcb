//! Error handling for name, field, and method resolution.

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Classpath(#[from] javac_classpath::Error),
    #[error("cannot find symbol: {0}")]
    ClassNotFound(String),
    #[error("cannot find symbol: field {field} in {owner}")]
    FieldNotFound { owner: String, field: String },
    #[error("no method named {name} in {owner} is applicable for the given arguments")]
    NoApplicableMethod { owner: String, name: String },
    #[error("reference to {name} is ambiguous, both matching methods in {owner}")]
    AmbiguousMethod { owner: String, name: String },
}
