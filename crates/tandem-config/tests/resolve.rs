//! End-to-end resolution against a project on disk.

use std::fs;
use std::path::Path;

use serde_json::json;
use tandem_config::{
    ConfigError, FilenameContext, Mode, PluginKind, Resolver, validate_schema,
};
use tempfile::TempDir;

fn scaffold(root: &Path) {
    fs::create_dir_all(root.join("src")).expect("create src");
    fs::create_dir_all(root.join("public")).expect("create public");
    fs::write(root.join("src/index.js"), "import './about.js';").expect("write index");
    fs::write(root.join("src/about.js"), "export {};").expect("write about");
    fs::write(root.join("public/index.html"), "<html></html>").expect("write index.html");
    fs::write(root.join("public/about.html"), "<html></html>").expect("write about.html");
}

#[test]
fn resolves_production_for_scaffolded_project() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());

    let resolved = Resolver::discover(dir.path())
        .expect("discover")
        .resolve(Mode::Production)
        .expect("resolve");

    assert_eq!(resolved.mode, Mode::Production);
    assert_eq!(resolved.entry.names().collect::<Vec<_>>(), vec!["main", "about"]);
    assert_eq!(
        resolved.entry.get("about"),
        Some(dir.path().join("src/about.js").as_path())
    );

    let pattern = resolved.output.chunk_filename_pattern().expect("pattern");
    let file = pattern.render(&FilenameContext {
        name: "vender",
        hash: "deadbeef",
        ..Default::default()
    });
    assert_eq!(file, "js/vender_deadbeef.chunk.js");

    let kinds: Vec<PluginKind> = resolved.plugins.iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            PluginKind::Html,
            PluginKind::Html,
            PluginKind::Clean,
            PluginKind::CssExtract
        ]
    );
    assert!(resolved.dev_server.is_none());
}

#[test]
fn resolves_development_with_dev_server() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());

    let resolved = Resolver::new(dir.path())
        .resolve(Mode::Development)
        .expect("resolve");

    let dev = resolved.dev_server.as_ref().expect("dev server");
    assert!(dev.history_api_fallback);
    assert!(!dev.proxy["api/vue"].secure());

    let compiled = resolved.module.compile().expect("rules");
    let css = compiled
        .match_path(&dir.path().join("src/style.less"))
        .expect("css rule");
    assert_eq!(css.rule.loaders[0].loader(), "style-loader");

    let js = compiled
        .match_path(&dir.path().join("src/index.js"))
        .expect("js rule");
    assert_eq!(js.index, 0);
    assert!(
        compiled
            .match_path(&dir.path().join("node_modules/lib/index.js"))
            .is_none()
    );
}

#[test]
fn missing_entry_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::remove_file(dir.path().join("src/about.js")).expect("remove about");

    match Resolver::new(dir.path()).resolve(Mode::Production) {
        Err(ConfigError::EntryNotFound { name, path }) => {
            assert_eq!(name, "about");
            assert!(path.ends_with("src/about.js"));
        }
        other => panic!("expected EntryNotFound, got {other:?}"),
    }
}

#[test]
fn missing_template_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::remove_file(dir.path().join("public/about.html")).expect("remove template");

    assert!(matches!(
        Resolver::new(dir.path()).resolve(Mode::Development),
        Err(ConfigError::TemplateNotFound { .. })
    ));
}

#[test]
fn project_file_layers_apply() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::write(
        dir.path().join("tandem.toml"),
        r#"
[base.output]
publicPath = "/assets/"

[production.output]
filename = "js/[name].[contenthash:8].js"
"#,
    )
    .expect("write project file");

    let resolved = Resolver::discover(dir.path())
        .expect("discover")
        .resolve(Mode::Production)
        .expect("resolve");

    assert_eq!(resolved.output.filename, "js/[name].[contenthash:8].js");
    assert_eq!(resolved.to_value()["output"]["publicPath"], json!("/assets/"));
}

#[test]
fn project_overlay_type_conflict_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::write(
        dir.path().join("tandem.json"),
        r#"{ "development": { "devServer": "off" } }"#,
    )
    .expect("write project file");

    let err = Resolver::discover(dir.path())
        .expect("discover")
        .resolve(Mode::Development)
        .unwrap_err();
    assert!(matches!(err, ConfigError::MergeConflict { ref path, .. } if path == "devServer"));
}

#[test]
fn project_overlay_with_unhashed_production_name_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::write(
        dir.path().join("tandem.toml"),
        "[production.output]\nfilename = \"[name].js\"\n",
    )
    .expect("write project file");

    let resolver = Resolver::discover(dir.path()).expect("discover");
    let unchecked = resolver
        .resolve_unchecked(Mode::Production)
        .expect("merge succeeds");
    assert!(matches!(
        validate_schema(&unchecked),
        Err(ConfigError::InvalidPattern { .. })
    ));
}
