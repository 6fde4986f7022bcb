use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to parse compilation unit {path}: {source}")]
    Deserialize { path: PathBuf, source: serde_json::Error },
    #[error("failed to install logging subscriber: {0}")]
    Logging(String),
}
