//! Built-in configuration layers for the two-page application.
//!
//! [`common`] is the shared base; [`development`] and [`production`] are the
//! environment overlays merged onto it.

use std::path::Path;

use serde_json::{Value, json};

use crate::build_config::{BuildConfig, EnvironmentOverlay};
use crate::resolved::{
    CLEAN_PLUGIN, CSS_EXTRACT_PLUGIN, HOT_MODULE_REPLACEMENT_PLUGIN, HTML_PLUGIN, Mode,
};

fn path_value(root: &Path, relative: &str) -> Value {
    Value::String(root.join(relative).to_string_lossy().into_owned())
}

fn layer(value: Value) -> BuildConfig {
    match value {
        Value::Object(map) => BuildConfig::from(map),
        _ => BuildConfig::new(),
    }
}

/// The shared base: entries, output, asset rules, chunk splitting, pages.
pub fn common(root: &Path) -> BuildConfig {
    layer(json!({
        "entry": {
            "main": path_value(root, "src/index.js"),
            "about": path_value(root, "src/about.js")
        },
        "output": {
            "path": path_value(root, "dist"),
            "filename": "[name].js",
            "chunkFilename": "[id].[chunkhash].js"
        },
        "module": {
            "rules": [
                {
                    "test": r"\.jsx?$",
                    "exclude": "node_modules",
                    "include": path_value(root, "src"),
                    "use": ["babel-loader"]
                },
                {
                    "test": r"\.(jpg|png|gif)$",
                    "use": {
                        "loader": "url-loader",
                        "options": {
                            "name": "[name].[ext]?[hash]",
                            "outputPath": "images/",
                            "limit": 4096
                        }
                    }
                },
                {
                    "test": r"\.(eot|ttf|svg)$",
                    "use": { "loader": "file-loader" }
                }
            ]
        },
        "optimization": {
            "splitChunks": {
                "chunks": "all",
                "minSize": 30000,
                "minChunks": 1,
                "maxAsyncRequests": 5,
                "maxInitialRequests": 3,
                "automaticNameDelimiter": "_",
                "cacheGroups": {
                    "vendors": {
                        "test": r"[\\/]node_modules[\\/]",
                        "priority": -10,
                        "name": "vender"
                    },
                    "default": {
                        "minChunks": 2,
                        "priority": -20,
                        "name": "common",
                        "reuseExistingChunk": true
                    }
                }
            },
            "usedExports": true
        },
        "plugins": [
            {
                "name": HTML_PLUGIN,
                "options": {
                    "template": path_value(root, "public/index.html"),
                    "title": "webpack-index",
                    "chunks": ["vender", "main"],
                    "filename": "index.html"
                }
            },
            {
                "name": HTML_PLUGIN,
                "options": {
                    "template": path_value(root, "public/about.html"),
                    "title": "webpack--about",
                    "chunks": ["vender", "about"],
                    "filename": "about.html"
                }
            }
        ]
    }))
}

/// Development overlay: inline styles, dev server with proxies, hot reload,
/// unhashed filenames.
pub fn development() -> EnvironmentOverlay {
    layer(json!({
        "mode": Mode::Development.as_str(),
        "module": {
            "rules": [
                {
                    "test": r"\.(css|less)$",
                    "use": [
                        "style-loader",
                        { "loader": "css-loader", "options": { "importLoaders": 2 } },
                        "less-loader"
                    ]
                }
            ]
        },
        "devServer": {
            "port": 8088,
            "historyApiFallback": true,
            "contentBase": "../dist",
            "openPage": "about.html",
            "open": true,
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
        },
        "plugins": [
            { "name": HOT_MODULE_REPLACEMENT_PLUGIN }
        ],
        "output": {
            "filename": "[name].js",
            "chunkFilename": "[name].js"
        }
    }))
}

/// Production overlay: content-hashed filenames, extracted styles, clean
/// output directory.
pub fn production() -> EnvironmentOverlay {
    layer(json!({
        "mode": Mode::Production.as_str(),
        "output": {
            "filename": "js/[name]_[contenthash].js",
            "chunkFilename": "js/[name]_[contenthash].chunk.js"
        },
        "module": {
            "rules": [
                {
                    "test": r"\.(css|less)$",
                    "use": [
                        {
                            "loader": "mini-css-extract-plugin/loader",
                            "options": { "publicPath": "../" }
                        },
                        { "loader": "css-loader", "options": { "importLoaders": 2 } },
                        "less-loader"
                    ]
                }
            ]
        },
        "plugins": [
            { "name": CLEAN_PLUGIN },
            {
                "name": CSS_EXTRACT_PLUGIN,
                "options": {
                    "filename": "css/[id].[name]_[hash].css",
                    "chunkFilename": "css/[id].[name]_[hash].chunk.css"
                }
            }
        ]
    }))
}

/// The overlay for `mode`.
pub fn overlay(mode: Mode) -> EnvironmentOverlay {
    match mode {
        Mode::Development => development(),
        Mode::Production => production(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{MergePolicy, merge};
    use crate::resolved::ResolvedConfig;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn common_paths_are_rooted() {
        let root = PathBuf::from("/project");
        let base = common(&root);
        assert_eq!(
            base.get_path("entry.main"),
            Some(&json!(root.join("src/index.js").to_string_lossy()))
        );
        assert_eq!(base.get("mode"), None);
    }

    #[test]
    fn production_overrides_filenames_and_appends_rules() {
        let base = common(Path::new("/project"));
        let merged = merge(&base, &production(), &MergePolicy::default()).unwrap();
        let resolved = ResolvedConfig::from_config(merged).unwrap();

        assert_eq!(resolved.mode, Mode::Production);
        assert_eq!(resolved.output.filename, "js/[name]_[contenthash].js");
        assert_eq!(resolved.output.chunk_filename(), "js/[name]_[contenthash].chunk.js");
        assert_eq!(resolved.module.rules.len(), 4);
        assert_eq!(resolved.module.rules[3].test, r"\.(css|less)$");
        let names: Vec<_> = resolved.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["html", "html", "clean", "mini-css-extract"]);
    }

    #[test]
    fn development_adds_dev_server_and_hot_reload() {
        let base = common(Path::new("/project"));
        let merged = merge(&base, &development(), &MergePolicy::default()).unwrap();
        let resolved = ResolvedConfig::from_config(merged).unwrap();

        assert_eq!(resolved.mode, Mode::Development);
        assert_eq!(resolved.output.chunk_filename(), "[name].js");
        let dev = resolved.dev_server.expect("dev server");
        assert_eq!(dev.port, 8088);
        assert_eq!(dev.open_page.as_deref(), Some("about.html"));
        assert_eq!(dev.proxy.len(), 2);
        assert_eq!(
            resolved.plugins.last().map(|p| p.name.as_str()),
            Some(HOT_MODULE_REPLACEMENT_PLUGIN)
        );
    }

    #[test]
    fn overlay_selects_by_mode() {
        assert_eq!(overlay(Mode::Development), development());
        assert_eq!(overlay(Mode::Production), production());
    }
}
