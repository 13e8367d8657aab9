//! Typed view over a fully merged build configuration.

pub(crate) mod helpers;
mod output;
mod plugin;
mod rules;
mod split;
mod types;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

pub use output::{EntryPoints, OutputSpec};
pub use plugin::{
    CLEAN_PLUGIN, CSS_EXTRACT_PLUGIN, CssExtractOptions, HOT_MODULE_REPLACEMENT_PLUGIN,
    HTML_PLUGIN, HtmlPage, PluginKind, PluginSpec,
};
pub use rules::{CompiledRules, LoaderSpec, ModuleRule, ModuleRules, RuleMatch};
pub use split::{CacheGroup, ChunkSplitPolicy, Optimization};
pub use types::{ChunkScope, Mode};

use crate::build_config::BuildConfig;
use crate::dev::DevServerConfig;
use crate::error::{ConfigError, Result};

/// A resolved configuration: the raw merged mapping handed to the bundler,
/// plus a typed view of the parts this crate reasons about.
///
/// Keys the typed view does not model stay in [`ResolvedConfig::raw`] and
/// are serialized unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub entry: EntryPoints,

    #[serde(default)]
    pub output: OutputSpec,

    #[serde(default)]
    pub module: ModuleRules,

    #[serde(default)]
    pub optimization: Optimization,

    #[serde(default)]
    pub plugins: Vec<PluginSpec>,

    #[serde(default)]
    pub dev_server: Option<DevServerConfig>,

    #[serde(skip)]
    raw: BuildConfig,
}

impl ResolvedConfig {
    /// Build the typed view of a merged configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_config::{BuildConfig, Mode, ResolvedConfig};
    /// use serde_json::json;
    ///
    /// let raw = BuildConfig::from_value(json!({
    ///     "mode": "development",
    ///     "entry": { "main": "src/index.js" },
    ///     "stats": "minimal"
    /// })).unwrap();
    ///
    /// let resolved = ResolvedConfig::from_config(raw).unwrap();
    /// assert_eq!(resolved.mode, Mode::Development);
    /// assert_eq!(resolved.to_value()["stats"], json!("minimal"));
    /// ```
    pub fn from_config(raw: BuildConfig) -> Result<Self> {
        let mut resolved: ResolvedConfig =
            serde_json::from_value(raw.clone().into_value()).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "config".to_string(),
                    hint: Some(e.to_string()),
                }
            })?;
        resolved.raw = raw;
        Ok(resolved)
    }

    pub fn raw(&self) -> &BuildConfig {
        &self.raw
    }

    /// The configuration as handed to the bundler.
    pub fn to_value(&self) -> Value {
        self.raw.clone().into_value()
    }

    pub fn split_policy(&self) -> &ChunkSplitPolicy {
        &self.optimization.split_chunks
    }

    /// Pages declared by `html` plugins, in plugin order.
    pub fn html_pages(&self) -> Result<Vec<HtmlPage>> {
        let mut pages = Vec::new();
        for plugin in &self.plugins {
            if let Some(page) = plugin.html_page()? {
                pages.push(page);
            }
        }
        Ok(pages)
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}
