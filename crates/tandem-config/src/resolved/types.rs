use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Build mode, selecting the environment overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Unhashed filenames, inline styles, dev server
    Development,
    /// Content-hashed filenames, extracted styles (default, as in the bundler)
    #[default]
    Production,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(format!("Invalid mode: {}", other)),
        }
    }
}

/// Which chunks take part in splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkScope {
    /// Only on-demand chunks created by dynamic imports (bundler default)
    #[default]
    Async,
    /// Only entry chunks
    Initial,
    /// Entry and on-demand chunks
    All,
}

impl ChunkScope {
    pub fn includes_initial(&self) -> bool {
        matches!(self, ChunkScope::Initial | ChunkScope::All)
    }

    pub fn includes_async(&self) -> bool {
        matches!(self, ChunkScope::Async | ChunkScope::All)
    }
}
