//! Error types for configuration merging, validation and loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::build_config::ValueKind;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors
    #[error("entry '{name}' not found: {}", path.display())]
    EntryNotFound { name: String, path: PathBuf },

    #[error("html template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    // Merge errors
    #[error("cannot merge {overlay} onto {base} at '{path}'")]
    MergeConflict {
        path: String,
        base: ValueKind,
        overlay: ValueKind,
    },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("invalid config value for '{field}'{}", hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    // Schema validation errors (no filesystem checks)
    #[error("no entries specified")]
    NoEntries,

    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    #[error("invalid filename pattern '{pattern}' for '{field}': {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("invalid regex '{pattern}' for '{field}': {source}")]
    InvalidRegex {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Actionable hint for the user, when one is known.
    pub fn hint(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidValue { hint, .. } | ConfigError::SchemaValidation { hint, .. } => {
                hint.as_deref()
            }
            ConfigError::EntryNotFound { .. } => {
                Some("Check the 'entry' table and the project root")
            }
            ConfigError::MergeConflict { .. } => Some(
                "Use matching value types in both layers, or mark the key as an override in the merge policy",
            ),
            ConfigError::InvalidPattern { .. } => {
                Some("Supported tokens: [name], [id], [hash], [contenthash], [chunkhash], [ext], [query]")
            }
            _ => None,
        }
    }
}
