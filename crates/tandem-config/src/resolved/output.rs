use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::filename::{FilenamePattern, PatternError};
use crate::resolved::helpers::{default_filename, default_output_dir};

/// Named entry points: bundle name to source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryPoints(IndexMap<String, PathBuf>);

impl EntryPoints {
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.0.get(name).map(PathBuf::as_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.0.iter().map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where and under which names bundles are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    /// Output directory
    #[serde(default = "default_output_dir")]
    pub path: PathBuf,

    /// Pattern for entry bundles
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Pattern for split and on-demand chunks (falls back to `filename`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_filename: Option<String>,
}

impl OutputSpec {
    pub fn chunk_filename(&self) -> &str {
        self.chunk_filename.as_deref().unwrap_or(&self.filename)
    }

    pub fn filename_pattern(&self) -> Result<FilenamePattern, PatternError> {
        FilenamePattern::parse(&self.filename)
    }

    pub fn chunk_filename_pattern(&self) -> Result<FilenamePattern, PatternError> {
        FilenamePattern::parse(self.chunk_filename())
    }
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            path: default_output_dir(),
            filename: default_filename(),
            chunk_filename: None,
        }
    }
}
