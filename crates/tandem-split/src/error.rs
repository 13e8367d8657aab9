//! Error types for graph construction and chunk splitting.

use tandem_config::ConfigError;
use thiserror::Error;

use crate::graph::ModuleId;

pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("invalid split policy: {0}")]
    Policy(#[from] ConfigError),

    #[error("module '{0}' is declared twice")]
    DuplicateModule(ModuleId),

    #[error("entry '{0}' is declared twice")]
    DuplicateEntry(String),

    #[error("{context} refers to unknown module '{id}'")]
    UnknownModule { id: ModuleId, context: String },

    #[error("invalid module graph: {0}")]
    InvalidGraph(String),
}
