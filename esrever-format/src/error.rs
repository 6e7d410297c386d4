//! Error types for esrever

use crate::constants::{EXIT_CONFIRMATION, EXIT_FAILURE, EXIT_NO_CANDIDATES};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// esrever error types
#[derive(Debug, Error)]
pub enum EsreverError {
    /// Sensitive names were forced without the exact confirmation token.
    #[error(
        "--force-sensitive requires --confirm {token}; refusing to wrap sensitive commands",
        token = crate::constants::CONFIRMATION_TOKEN
    )]
    ConfirmationRequired,
    /// Scanning produced no candidate names at all.
    #[error("No candidate commands found on the search path")]
    NoCandidates,
    /// A start marker was found without a matching end marker.
    #[error("Unterminated wrapper block: start marker on line {line} has no matching end marker")]
    UnterminatedBlock {
        /// 1-based line number of the dangling start marker
        line: usize,
    },
    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
    /// I/O on a specific file failed.
    #[error("I/O error on {}: {source}", path.display())]
    FileIo {
        /// File the operation targeted
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
    /// I/O operation failed while reading or writing data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EsreverError {
    /// Attach the path an I/O error relates to.
    pub fn file_io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        EsreverError::FileIo {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Process exit code the CLI reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EsreverError::ConfirmationRequired => EXIT_CONFIRMATION,
            EsreverError::NoCandidates => EXIT_NO_CANDIDATES,
            _ => EXIT_FAILURE,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EsreverError>;
