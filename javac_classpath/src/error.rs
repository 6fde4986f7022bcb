//! Error handling for the classpath/class-reader layer.

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    ClassFile(#[from] javac_classfile::Error),
    #[error("class not found: {0}")]
    ClassNotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed method descriptor: {0}")]
    MalformedDescriptor(String),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
