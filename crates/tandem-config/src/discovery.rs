//! File-based project configuration discovery
//!
//! A project may carry a `tandem.toml` (or `tandem.json`) at its root with
//! its own layers:
//!
//! ```toml
//! [settings]
//! mode = "development"
//!
//! [base.output]
//! path = "build"
//!
//! [production.output]
//! filename = "js/[name].[contenthash:8].js"
//! ```
//!
//! `base` is merged onto the common preset, `development` / `production`
//! onto the matching environment overlay.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::build_config::{BuildConfig, EnvironmentOverlay};
use crate::error::{ConfigError, Result};
use crate::resolved::Mode;

pub const TOML_FILE: &str = "tandem.toml";
pub const JSON_FILE: &str = "tandem.json";

/// Project-supplied configuration layers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectFile {
    /// Resolver settings; read through [`crate::Settings`]
    #[serde(default)]
    pub settings: Value,

    #[serde(default)]
    pub base: BuildConfig,

    #[serde(default)]
    pub development: EnvironmentOverlay,

    #[serde(default)]
    pub production: EnvironmentOverlay,
}

impl ProjectFile {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "project file".to_string(),
            hint: Some(e.to_string()),
        })
    }

    pub fn overlay(&self, mode: Mode) -> &EnvironmentOverlay {
        match mode {
            Mode::Development => &self.development,
            Mode::Production => &self.production,
        }
    }
}

/// File-based project configuration discovery
///
/// # Example
///
/// ```no_run
/// use tandem_config::ProjectDiscovery;
///
/// let project = ProjectDiscovery::new(".").load().unwrap();
/// ```
pub struct ProjectDiscovery {
    root: PathBuf,
}

impl ProjectDiscovery {
    /// Create a new discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a project file in the root directory
    ///
    /// Searches in this order:
    /// 1. tandem.toml
    /// 2. tandem.json
    pub fn find(&self) -> Option<PathBuf> {
        [TOML_FILE, JSON_FILE]
            .into_iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }

    /// Load the project file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no project file exists.
    pub fn load(&self) -> Result<ProjectFile> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        load_from(&path)
    }

    /// Load the project file if there is one.
    pub fn load_optional(&self) -> Result<Option<ProjectFile>> {
        self.find().map(|path| load_from(&path)).transpose()
    }
}

/// Load a project file from a specific path, by extension.
pub fn load_from(path: &Path) -> Result<ProjectFile> {
    debug!(path = %path.display(), "loading project file");
    let content = fs::read_to_string(path)?;

    let value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str::<Value>(&content).map_err(|e| {
            ConfigError::InvalidValue {
                field: JSON_FILE.to_string(),
                hint: Some(format!("Invalid JSON: {}", e)),
            }
        })?,
        _ => {
            let toml_val: toml::Value =
                toml::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                    field: TOML_FILE.to_string(),
                    hint: Some(format!("Invalid TOML syntax: {}", e)),
                })?;
            serde_json::to_value(toml_val).map_err(|e| ConfigError::InvalidValue {
                field: TOML_FILE.to_string(),
                hint: Some(format!("TOML to JSON conversion failed: {}", e)),
            })?
        }
    };

    ProjectFile::from_value(value)
}
