//! Local persistence error types.

use thiserror::Error;

/// Errors from config and favorites persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to determine platform directory")]
    DirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
