use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::resolved::helpers::default_html_filename;

pub const HTML_PLUGIN: &str = "html";
pub const HOT_MODULE_REPLACEMENT_PLUGIN: &str = "hot-module-replacement";
pub const CLEAN_PLUGIN: &str = "clean";
pub const CSS_EXTRACT_PLUGIN: &str = "mini-css-extract";

/// A bundler plugin instantiation. Options are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Html,
    HotModuleReplacement,
    Clean,
    CssExtract,
    Other,
}

/// Options of an `html` plugin: one generated page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPage {
    pub template: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Chunks injected into the page, by chunk name
    #[serde(default)]
    pub chunks: Vec<String>,

    #[serde(default = "default_html_filename")]
    pub filename: String,
}

/// Options of a `mini-css-extract` plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssExtractOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_filename: Option<String>,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn kind(&self) -> PluginKind {
        match self.name.as_str() {
            HTML_PLUGIN => PluginKind::Html,
            HOT_MODULE_REPLACEMENT_PLUGIN => PluginKind::HotModuleReplacement,
            CLEAN_PLUGIN => PluginKind::Clean,
            CSS_EXTRACT_PLUGIN => PluginKind::CssExtract,
            _ => PluginKind::Other,
        }
    }

    /// Page options when this is an `html` plugin.
    pub fn html_page(&self) -> Result<Option<HtmlPage>> {
        match self.kind() {
            PluginKind::Html => self.typed_options().map(Some),
            _ => Ok(None),
        }
    }

    /// Filename options when this is a `mini-css-extract` plugin.
    pub fn css_extract(&self) -> Result<Option<CssExtractOptions>> {
        match self.kind() {
            PluginKind::CssExtract if self.options.is_null() => Ok(Some(CssExtractOptions::default())),
            PluginKind::CssExtract => self.typed_options().map(Some),
            _ => Ok(None),
        }
    }

    fn typed_options<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.options.clone()).map_err(|e| ConfigError::InvalidValue {
            field: format!("plugins[{}].options", self.name),
            hint: Some(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn html_plugin_options_are_typed() {
        let plugin = PluginSpec::new(
            HTML_PLUGIN,
            json!({
                "template": "public/about.html",
                "title": "webpack--about",
                "chunks": ["vender", "about"],
                "filename": "about.html"
            }),
        );

        let page = plugin.html_page().unwrap().unwrap();
        assert_eq!(page.template, PathBuf::from("public/about.html"));
        assert_eq!(page.chunks, vec!["vender", "about"]);
        assert_eq!(page.filename, "about.html");
    }

    #[test]
    fn html_plugin_without_template_is_invalid() {
        let plugin = PluginSpec::new(HTML_PLUGIN, json!({ "title": "x" }));
        assert!(matches!(
            plugin.html_page(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn other_plugins_have_no_typed_options() {
        let plugin = PluginSpec::new("bundle-analyzer", json!({ "port": 1 }));
        assert_eq!(plugin.kind(), PluginKind::Other);
        assert!(plugin.html_page().unwrap().is_none());
        assert!(plugin.css_extract().unwrap().is_none());
    }

    #[test]
    fn css_extract_without_options_defaults() {
        let plugin = PluginSpec::new(CSS_EXTRACT_PLUGIN, Value::Null);
        assert_eq!(plugin.css_extract().unwrap(), Some(CssExtractOptions::default()));
    }
}
