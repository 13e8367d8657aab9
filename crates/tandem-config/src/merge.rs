//! Deterministic deep merge of configuration layers.
//!
//! Mappings merge key by key, sequences concatenate base-first, scalars are
//! overridden by the overlay. A [`MergePolicy`] can designate key paths whose
//! sequences (or mappings) are replaced wholesale, and key paths where a
//! structural type change is an intentional override rather than an error.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::build_config::{BuildConfig, ValueKind};
use crate::error::{ConfigError, Result};

/// How the merge treats a particular key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Recurse into mappings, concatenate sequences, overlay wins on scalars.
    Merge,
    /// The overlay value replaces the base value outright.
    Replace,
    /// Like `Merge`, but a structural type mismatch lets the overlay win
    /// instead of failing.
    Override,
}

/// Per-key merge designations, addressed by dotted key path
/// (`"plugins"`, `"module.rules"`, `"devServer.proxy"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePolicy {
    replace: BTreeSet<String>,
    overrides: BTreeSet<String>,
}

impl MergePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Designate `path` as replace: the overlay's value fully replaces the
    /// base's value instead of being concatenated or merged into it.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_config::{BuildConfig, MergePolicy};
    /// use serde_json::json;
    ///
    /// let base = BuildConfig::from_value(json!({ "plugins": ["html"] })).unwrap();
    /// let overlay = BuildConfig::from_value(json!({ "plugins": ["clean"] })).unwrap();
    ///
    /// let policy = MergePolicy::new().replace("plugins");
    /// let merged = base.merge(&overlay, &policy).unwrap();
    /// assert_eq!(merged.get("plugins"), Some(&json!(["clean"])));
    /// ```
    pub fn replace(mut self, path: impl Into<String>) -> Self {
        self.replace.insert(path.into());
        self
    }

    /// Designate `path` as a scalar override: the overlay may change the
    /// structural kind of the value (mapping to scalar, and so on).
    pub fn allow_override(mut self, path: impl Into<String>) -> Self {
        self.overrides.insert(path.into());
        self
    }

    pub fn strategy(&self, path: &str) -> KeyStrategy {
        if self.replace.contains(path) {
            KeyStrategy::Replace
        } else if self.overrides.contains(path) {
            KeyStrategy::Override
        } else {
            KeyStrategy::Merge
        }
    }
}

/// Merge `overlay` onto `base`.
///
/// For each key present in either input:
/// - absent in the overlay: the base value is kept;
/// - absent in the base: the overlay value is taken;
/// - both mappings: merged recursively;
/// - both sequences: concatenated base-first, unless the key is `Replace`;
/// - both scalars: the overlay wins;
/// - any other combination is a [`ConfigError::MergeConflict`] unless the key
///   is `Override`.
///
/// `null` is treated as "unset": it never overrides a base value and is
/// replaced by any overlay value.
///
/// Neither input is modified and the result shares nothing with them.
///
/// # Example
///
/// ```
/// use tandem_config::{merge, BuildConfig, MergePolicy};
/// use serde_json::json;
///
/// let base = BuildConfig::from_value(json!({
///     "mode": null,
///     "output": { "filename": "[name].js" }
/// })).unwrap();
/// let overlay = BuildConfig::from_value(json!({
///     "mode": "production",
///     "output": { "filename": "js/[name]_[contenthash].js" }
/// })).unwrap();
///
/// let merged = merge(&base, &overlay, &MergePolicy::default()).unwrap();
/// assert_eq!(merged.get_path("output.filename"), Some(&json!("js/[name]_[contenthash].js")));
/// assert_eq!(merged.get("mode"), Some(&json!("production")));
/// ```
pub fn merge(base: &BuildConfig, overlay: &BuildConfig, policy: &MergePolicy) -> Result<BuildConfig> {
    let merged = merge_maps(base.as_map(), overlay.as_map(), policy, "")?;
    debug!(
        base_keys = base.len(),
        overlay_keys = overlay.len(),
        merged_keys = merged.len(),
        "merged configuration layer"
    );
    Ok(BuildConfig::from(merged))
}

/// Fold `layers` left to right with [`merge`], starting from an empty config.
pub fn merge_all<'a, I>(layers: I, policy: &MergePolicy) -> Result<BuildConfig>
where
    I: IntoIterator<Item = &'a BuildConfig>,
{
    layers
        .into_iter()
        .try_fold(BuildConfig::new(), |acc, layer| merge(&acc, layer, policy))
}

fn merge_maps(
    base: &Map<String, Value>,
    overlay: &Map<String, Value>,
    policy: &MergePolicy,
    prefix: &str,
) -> Result<Map<String, Value>> {
    let mut merged = base.clone();

    for (key, value) in overlay {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        let next = match base.get(key) {
            Some(existing) => merge_values(existing, value, policy, &path)?,
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }

    Ok(merged)
}

fn merge_values(base: &Value, overlay: &Value, policy: &MergePolicy, path: &str) -> Result<Value> {
    let strategy = policy.strategy(path);

    match (base, overlay) {
        (_, Value::Null) => Ok(base.clone()),
        (Value::Null, _) => Ok(overlay.clone()),
        _ if strategy == KeyStrategy::Replace => {
            trace!(path, "replacing value");
            Ok(overlay.clone())
        }
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            merge_maps(base_map, overlay_map, policy, path).map(Value::Object)
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            trace!(
                path,
                base = base_items.len(),
                overlay = overlay_items.len(),
                "concatenating sequences"
            );
            let mut items = Vec::with_capacity(base_items.len() + overlay_items.len());
            items.extend(base_items.iter().cloned());
            items.extend(overlay_items.iter().cloned());
            Ok(Value::Array(items))
        }
        _ if ValueKind::of(base) == ValueKind::Scalar && ValueKind::of(overlay) == ValueKind::Scalar => {
            Ok(overlay.clone())
        }
        _ if strategy == KeyStrategy::Override => {
            trace!(path, "overriding value of a different kind");
            Ok(overlay.clone())
        }
        _ => Err(ConfigError::MergeConflict {
            path: path.to_string(),
            base: ValueKind::of(base),
            overlay: ValueKind::of(overlay),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> BuildConfig {
        BuildConfig::from_value(value).unwrap()
    }

    #[test]
    fn disjoint_keys_are_unioned() {
        let base = config(json!({ "entry": { "main": "src/index.js" } }));
        let overlay = config(json!({ "mode": "development" }));

        let merged = merge(&base, &overlay, &MergePolicy::default()).unwrap();
        assert_eq!(
            merged.into_value(),
            json!({ "entry": { "main": "src/index.js" }, "mode": "development" })
        );
    }

    #[test]
    fn nested_mappings_merge_recursively() {
        let base = config(json!({
            "output": { "path": "dist", "filename": "[name].js" }
        }));
        let overlay = config(json!({
            "output": { "filename": "js/[name]_[contenthash].js" }
        }));

        let merged = merge(&base, &overlay, &MergePolicy::default()).unwrap();
        assert_eq!(merged.get_path("output.path"), Some(&json!("dist")));
        assert_eq!(
            merged.get_path("output.filename"),
            Some(&json!("js/[name]_[contenthash].js"))
        );
    }

    #[test]
    fn sequences_concatenate_base_first() {
        let base = config(json!({ "module": { "rules": [{ "test": "a" }, { "test": "b" }] } }));
        let overlay = config(json!({ "module": { "rules": [{ "test": "c" }, { "test": "a" }] } }));

        let merged = merge(&base, &overlay, &MergePolicy::default()).unwrap();
        assert_eq!(
            merged.get_path("module.rules"),
            Some(&json!([{ "test": "a" }, { "test": "b" }, { "test": "c" }, { "test": "a" }]))
        );
    }

    #[test]
    fn replace_policy_applies_only_to_its_path() {
        let base = config(json!({ "plugins": [1, 2], "extra": { "plugins": [1] } }));
        let overlay = config(json!({ "plugins": [3], "extra": { "plugins": [2] } }));

        let policy = MergePolicy::new().replace("plugins");
        let merged = merge(&base, &overlay, &policy).unwrap();
        assert_eq!(merged.get("plugins"), Some(&json!([3])));
        assert_eq!(merged.get_path("extra.plugins"), Some(&json!([1, 2])));
    }

    #[test]
    fn mapping_versus_scalar_is_a_conflict() {
        let base = config(json!({ "devServer": { "port": 8088 } }));
        let overlay = config(json!({ "devServer": false }));

        let err = merge(&base, &overlay, &MergePolicy::default()).unwrap_err();
        match err {
            ConfigError::MergeConflict { path, base, overlay } => {
                assert_eq!(path, "devServer");
                assert_eq!(base, ValueKind::Mapping);
                assert_eq!(overlay, ValueKind::Scalar);
            }
            other => panic!("expected MergeConflict, got {other:?}"),
        }
    }

    #[test]
    fn nested_conflict_reports_full_path() {
        let base = config(json!({ "optimization": { "splitChunks": { "cacheGroups": {} } } }));
        let overlay = config(json!({ "optimization": { "splitChunks": { "cacheGroups": [] } } }));

        let err = merge(&base, &overlay, &MergePolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MergeConflict { ref path, .. } if path == "optimization.splitChunks.cacheGroups"
        ));
    }

    #[test]
    fn override_policy_lets_overlay_change_kind() {
        let base = config(json!({ "devServer": { "port": 8088 } }));
        let overlay = config(json!({ "devServer": false }));

        let policy = MergePolicy::new().allow_override("devServer");
        let merged = merge(&base, &overlay, &policy).unwrap();
        assert_eq!(merged.get("devServer"), Some(&json!(false)));
    }

    #[test]
    fn null_overlay_keeps_base() {
        let base = config(json!({ "mode": "development" }));
        let overlay = config(json!({ "mode": null }));

        let merged = merge(&base, &overlay, &MergePolicy::default()).unwrap();
        assert_eq!(merged.get("mode"), Some(&json!("development")));
    }

    #[test]
    fn inputs_are_left_untouched() {
        let base = config(json!({ "module": { "rules": [1] } }));
        let overlay = config(json!({ "module": { "rules": [2] } }));
        let base_before = base.clone();
        let overlay_before = overlay.clone();

        let _ = merge(&base, &overlay, &MergePolicy::default()).unwrap();
        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn merge_all_folds_left_to_right() {
        let a = config(json!({ "mode": "development", "list": [1] }));
        let b = config(json!({ "list": [2] }));
        let c = config(json!({ "mode": "production", "list": [3] }));

        let merged = merge_all([&a, &b, &c], &MergePolicy::default()).unwrap();
        assert_eq!(merged.into_value(), json!({ "mode": "production", "list": [1, 2, 3] }));
    }

    #[test]
    fn strategy_lookup() {
        let policy = MergePolicy::new().replace("plugins").allow_override("devServer");
        assert_eq!(policy.strategy("plugins"), KeyStrategy::Replace);
        assert_eq!(policy.strategy("devServer"), KeyStrategy::Override);
        assert_eq!(policy.strategy("module.rules"), KeyStrategy::Merge);
    }
}
