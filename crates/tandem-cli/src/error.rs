//! Error handling for the tandem CLI.
//!
//! Library errors convert into [`CliError`] through `#[from]`; `main`
//! renders the result with miette (see [`cli_error_to_miette`]).

mod miette;

use std::path::PathBuf;

use tandem_config::ConfigError;
use tandem_split::SplitError;
use thiserror::Error;

pub use self::miette::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Resolution or validation failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The module graph or split policy was rejected
    #[error("Chunk split error: {0}")]
    Split(#[from] SplitError),

    /// A file named on the command line does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Hint shown under the error, when one is known.
    pub fn hint(&self) -> Option<String> {
        match self {
            CliError::Config(err) => err.hint().map(str::to_string),
            CliError::Split(SplitError::InvalidGraph(_)) => Some(
                "The graph needs `modules`, `dependencies` and `entries` keys".to_string(),
            ),
            CliError::FileNotFound(_) => Some("Paths are relative to the current directory".to_string()),
            _ => None,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
