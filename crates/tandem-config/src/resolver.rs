//! Resolution of the final build configuration for a mode.
//!
//! Layers, in merge order:
//! 1. the common preset,
//! 2. the project file's `base`,
//! 3. the preset overlay for the mode,
//! 4. the project file's overlay for the mode.

use std::path::{Path, PathBuf};

use tracing::{debug, info_span};

use crate::build_config::BuildConfig;
use crate::discovery::{ProjectDiscovery, ProjectFile};
use crate::error::Result;
use crate::merge::{MergePolicy, merge_all};
use crate::presets;
use crate::resolved::{Mode, ResolvedConfig};
use crate::validation::{ConfigValidator, FsValidator};

/// Builds the resolved configuration for a project root.
///
/// # Example
///
/// ```
/// use tandem_config::{Mode, Resolver};
/// use serde_json::json;
///
/// let merged = Resolver::new("/project").merged(Mode::Production).unwrap();
/// assert_eq!(merged.get("mode"), Some(&json!("production")));
/// assert_eq!(
///     merged.get_path("output.filename"),
///     Some(&json!("js/[name]_[contenthash].js"))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    project: ProjectFile,
    policy: MergePolicy,
}

impl Resolver {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            project: ProjectFile::default(),
            policy: MergePolicy::default(),
        }
    }

    /// Resolver for `root` with its project file, if present.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self> {
        let resolver = Self::new(root);
        let project = ProjectDiscovery::new(&resolver.root)
            .load_optional()?
            .unwrap_or_default();
        Ok(resolver.with_project(project))
    }

    pub fn with_project(mut self, project: ProjectFile) -> Self {
        self.project = project;
        self
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// All layers merged, without validation.
    pub fn merged(&self, mode: Mode) -> Result<BuildConfig> {
        let common = presets::common(&self.root);
        let overlay = presets::overlay(mode);
        let layers = [
            &common,
            &self.project.base,
            &overlay,
            self.project.overlay(mode),
        ];
        merge_all(layers, &self.policy)
    }

    /// Merge, type and validate the configuration for `mode`, including
    /// filesystem checks on entries and html templates.
    pub fn resolve(&self, mode: Mode) -> Result<ResolvedConfig> {
        let resolved = self.resolve_unchecked(mode)?;
        FsValidator::new(&self.root).validate(&resolved)?;
        debug!(mode = %mode, "configuration resolved");
        Ok(resolved)
    }

    /// Merge and type the configuration without any validation.
    pub fn resolve_unchecked(&self, mode: Mode) -> Result<ResolvedConfig> {
        let span = info_span!("resolve", mode = %mode, root = %self.root.display());
        let _guard = span.enter();

        let resolved = ResolvedConfig::from_config(self.merged(mode)?)?;
        debug!(
            entries = resolved.entry.len(),
            rules = resolved.module.rules.len(),
            plugins = resolved.plugins.len(),
            "configuration merged"
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use serde_json::json;

    #[test]
    fn project_base_sits_under_the_environment_overlay() {
        let project = ProjectFile::from_value(json!({
            "base": { "output": { "filename": "[name].base.js", "publicPath": "/static/" } }
        }))
        .unwrap();
        let resolver = Resolver::new("/project").with_project(project);

        let merged = resolver.merged(Mode::Production).unwrap();
        assert_eq!(
            merged.get_path("output.filename"),
            Some(&json!("js/[name]_[contenthash].js"))
        );
        assert_eq!(merged.get_path("output.publicPath"), Some(&json!("/static/")));
    }

    #[test]
    fn project_overlay_wins_last() {
        let project = ProjectFile::from_value(json!({
            "development": { "devServer": { "port": 9000 } }
        }))
        .unwrap();
        let resolver = Resolver::new("/project").with_project(project);

        let resolved = resolver.resolve_unchecked(Mode::Development).unwrap();
        let dev = resolved.dev_server.unwrap();
        assert_eq!(dev.port, 9000);
        assert!(dev.hot);
    }

    #[test]
    fn replace_policy_drops_preset_plugins() {
        let project = ProjectFile::from_value(json!({
            "production": { "plugins": [{ "name": "clean" }] }
        }))
        .unwrap();
        let resolver = Resolver::new("/project")
            .with_project(project)
            .with_policy(MergePolicy::new().replace("plugins"));

        let resolved = resolver.resolve_unchecked(Mode::Production).unwrap();
        assert_eq!(resolved.plugins.len(), 1);
        assert_eq!(resolved.plugins[0].name, "clean");
    }

    #[test]
    fn resolve_fails_on_missing_entries() {
        let resolver = Resolver::new("/definitely/not/a/project");
        assert!(matches!(
            resolver.resolve(Mode::Development),
            Err(ConfigError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn merged_is_deterministic() {
        let resolver = Resolver::new("/project");
        assert_eq!(
            resolver.merged(Mode::Production).unwrap(),
            resolver.merged(Mode::Production).unwrap()
        );
    }
}
