//! The untyped build configuration mapping.
//!
//! `BuildConfig` is what every layer (common preset, environment overlay,
//! project file) is expressed as before merging. It is an insertion-ordered
//! JSON object so the resolved output keeps the declaration order of its
//! layers, and it is what ultimately gets handed to the bundler.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};
use crate::merge::{MergePolicy, merge};

/// A mapping from configuration key to value.
///
/// Values may be nested mappings, ordered sequences, or scalars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildConfig(Map<String, Value>);

/// A partial configuration merged onto a base.
pub type EnvironmentOverlay = BuildConfig;

impl BuildConfig {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Create from a `serde_json::Value`.
    ///
    /// `null` is accepted as the empty configuration; anything other than an
    /// object is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_config::BuildConfig;
    /// use serde_json::json;
    ///
    /// let config = BuildConfig::from_value(json!({ "mode": "production" })).unwrap();
    /// assert_eq!(config.get("mode"), Some(&json!("production")));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::InvalidValue {
                field: "config".to_string(),
                hint: Some(format!(
                    "expected a mapping at the top level, found a {}",
                    ValueKind::of(&other)
                )),
            }),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a value by dotted key path, e.g. `"output.filename"`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Merge `overlay` onto this configuration. See [`merge`].
    pub fn merge(&self, overlay: &BuildConfig, policy: &MergePolicy) -> Result<BuildConfig> {
        merge(self, overlay, policy)
    }
}

impl From<Map<String, Value>> for BuildConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<BuildConfig> for Value {
    fn from(config: BuildConfig) -> Self {
        config.into_value()
    }
}

/// Structural kind of a configuration value, used in merge diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Scalar,
    Sequence,
    Mapping,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Array(_) => ValueKind::Sequence,
            Value::Object(_) => ValueKind::Mapping,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => ValueKind::Scalar,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Scalar => "scalar",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_rejects_non_mapping() {
        let err = BuildConfig::from_value(json!(["a"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn null_is_empty_config() {
        assert!(BuildConfig::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn get_path_walks_nested_mappings() {
        let config = BuildConfig::from_value(json!({
            "output": { "filename": "[name].js" }
        }))
        .unwrap();
        assert_eq!(config.get_path("output.filename"), Some(&json!("[name].js")));
        assert_eq!(config.get_path("output.missing"), None);
        assert_eq!(config.get_path("output.filename.deeper"), None);
    }

    #[test]
    fn preserves_insertion_order() {
        let config = BuildConfig::from_value(json!({ "z": 1, "a": 2, "m": 3 })).unwrap();
        let keys: Vec<_> = config.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
