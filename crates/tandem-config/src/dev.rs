//! Development server configuration types.
//!
//! These are passed through to the bundler's dev server; nothing here serves
//! requests.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::resolved::helpers::{default_dev_port, default_true};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
    #[serde(default = "default_dev_port")]
    pub port: u16,

    /// Serve the index page for unknown paths
    #[serde(default)]
    pub history_api_fallback: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_base: Option<PathBuf>,

    /// Page opened in the browser on start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_page: Option<String>,

    #[serde(default)]
    pub open: bool,

    /// Hot module replacement
    #[serde(default)]
    pub hot: bool,

    /// Path prefix to upstream
    #[serde(default)]
    pub proxy: IndexMap<String, ProxyRule>,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            port: default_dev_port(),
            history_api_fallback: false,
            content_base: None,
            open_page: None,
            open: false,
            hot: false,
            proxy: IndexMap::new(),
        }
    }
}

/// Either a bare upstream target or a detailed rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProxyRule {
    Target(String),
    Detailed(ProxyOptions),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyOptions {
    pub target: String,

    /// Regex to replacement, applied to the request path
    #[serde(default)]
    pub path_rewrite: IndexMap<String, String>,

    /// Verify the upstream TLS certificate
    #[serde(default = "default_true")]
    pub secure: bool,

    /// Rewrite the Host header to the target
    #[serde(default)]
    pub change_origin: bool,

}

impl ProxyRule {
    pub fn target(&self) -> &str {
        match self {
            ProxyRule::Target(target) => target,
            ProxyRule::Detailed(options) => &options.target,
        }
    }

    pub fn secure(&self) -> bool {
        match self {
            ProxyRule::Target(_) => true,
            ProxyRule::Detailed(options) => options.secure,
        }
    }

    /// Expand a bare target into full options.
    pub fn to_options(&self) -> ProxyOptions {
        match self {
            ProxyRule::Target(target) => ProxyOptions {
                target: target.clone(),
                path_rewrite: IndexMap::new(),
                secure: true,
                change_origin: false,
            },
            ProxyRule::Detailed(options) => options.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn proxy_rules_accept_both_shapes() {
        let config: DevServerConfig = serde_json::from_value(json!({
            "port": 8088,
            "hot": true,
            "proxy": {
                "api/get": "xxxx.com/api",
                "api/vue": {
                    "target": "xxxx.com/api",
                    "pathRewrite": { "head": "demo" },
                    "secure": false,
                    "changeOrigin": true
                }
            }
        }))
        .unwrap();

        assert_eq!(config.port, 8088);
        assert!(config.hot);
        assert!(!config.open);

        let bare = &config.proxy["api/get"];
        assert_eq!(bare.target(), "xxxx.com/api");
        assert!(bare.secure());

        let detailed = config.proxy["api/vue"].to_options();
        assert!(!detailed.secure);
        assert!(detailed.change_origin);
        assert_eq!(detailed.path_rewrite["head"], "demo");
    }

    #[test]
    fn defaults_apply() {
        let config: DevServerConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, DevServerConfig::default());
    }
}
