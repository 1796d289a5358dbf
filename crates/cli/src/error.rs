//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

use shopfront_session::{CatalogError, ConfigError, DirectoryError, SessionError};

/// Errors that can end a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("User directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The saved session could not be decoded.
    #[error("Corrupt session file {}: {source}", path.display())]
    CorruptSession {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),
}
