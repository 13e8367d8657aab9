//! Pluggable config validation strategies
//!
//! Separates filesystem validation (entries and templates exist) from schema
//! validation (structure, patterns and regexes, no I/O).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::filename::FilenamePattern;
use crate::resolved::ResolvedConfig;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &ResolvedConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use tandem_config::{BuildConfig, ConfigValidator, ResolvedConfig, SchemaValidator};
/// use serde_json::json;
///
/// let raw = BuildConfig::from_value(json!({
///     "entry": { "main": "src/index.js" },
///     "output": { "filename": "[name]_[contenthash].js" }
/// })).unwrap();
/// let config = ResolvedConfig::from_config(raw).unwrap();
///
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ResolvedConfig) -> Result<()> {
        validate_entries(config)?;
        validate_output(config)?;

        config.module.compile()?;

        let policy = config.split_policy();
        for (key, group) in &policy.cache_groups {
            group.compile_test(key)?;
        }

        validate_plugins(config)?;
        validate_dev_server(config)?;

        Ok(())
    }
}

fn validate_entries(config: &ResolvedConfig) -> Result<()> {
    if config.entry.is_empty() {
        return Err(ConfigError::NoEntries);
    }

    for (name, path) in config.entry.iter() {
        if name.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "entry names cannot be empty".to_string(),
                hint: Some("Give every entry in the 'entry' table a name".to_string()),
            });
        }
        if path.as_os_str().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: format!("entry '{name}' has an empty path"),
                hint: None,
            });
        }
    }

    Ok(())
}

fn parse_pattern(field: &str, pattern: &str) -> Result<FilenamePattern> {
    FilenamePattern::parse(pattern).map_err(|e| ConfigError::InvalidPattern {
        field: field.to_string(),
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn validate_output(config: &ResolvedConfig) -> Result<()> {
    let output = &config.output;
    let patterns = [
        ("output.filename", output.filename.as_str()),
        ("output.chunkFilename", output.chunk_filename()),
    ];

    for (field, raw) in patterns {
        let pattern = parse_pattern(field, raw)?;
        if !pattern.is_unique() {
            return Err(ConfigError::InvalidPattern {
                field: field.to_string(),
                pattern: raw.to_string(),
                reason: "needs [name], [id] or a hash token so chunks do not collide".to_string(),
            });
        }
        if config.mode.is_production() && !pattern.has_content_hash() {
            return Err(ConfigError::InvalidPattern {
                field: field.to_string(),
                pattern: raw.to_string(),
                reason: "production filenames need [contenthash], [chunkhash] or [hash]"
                    .to_string(),
            });
        }
    }

    Ok(())
}

fn validate_plugins(config: &ResolvedConfig) -> Result<()> {
    let policy = config.split_policy();
    let known_chunks: HashSet<&str> = config
        .entry
        .names()
        .chain(policy.named_chunks())
        .collect();

    let mut page_files = HashSet::new();
    for page in config.html_pages()? {
        if !page_files.insert(page.filename.clone()) {
            return Err(ConfigError::SchemaValidation {
                message: format!("two html pages write '{}'", page.filename),
                hint: Some("Give each html plugin a distinct 'filename'".to_string()),
            });
        }
        for chunk in &page.chunks {
            if !known_chunks.contains(chunk.as_str()) {
                return Err(ConfigError::SchemaValidation {
                    message: format!(
                        "html page '{}' references unknown chunk '{}'",
                        page.filename, chunk
                    ),
                    hint: Some(
                        "Chunks must name an entry or a cache group with a fixed 'name'".to_string(),
                    ),
                });
            }
        }
    }

    for plugin in &config.plugins {
        if plugin.name.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "plugin name cannot be empty".to_string(),
                hint: None,
            });
        }
        if let Some(css) = plugin.css_extract()? {
            if let Some(filename) = &css.filename {
                parse_pattern("plugins.mini-css-extract.filename", filename)?;
            }
            if let Some(chunk_filename) = &css.chunk_filename {
                parse_pattern("plugins.mini-css-extract.chunkFilename", chunk_filename)?;
            }
        }
    }

    Ok(())
}

fn validate_dev_server(config: &ResolvedConfig) -> Result<()> {
    let Some(dev) = &config.dev_server else {
        return Ok(());
    };

    if dev.port == 0 {
        return Err(ConfigError::SchemaValidation {
            message: "devServer.port cannot be 0".to_string(),
            hint: Some("Pick a fixed port such as 8080".to_string()),
        });
    }

    for (prefix, rule) in &dev.proxy {
        if prefix.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "proxy path prefixes cannot be empty".to_string(),
                hint: None,
            });
        }
        if rule.target().trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: format!("proxy '{prefix}' has no target"),
                hint: Some("Set 'target' to the upstream host".to_string()),
            });
        }
    }

    Ok(())
}

/// Filesystem validator
///
/// Runs schema validation, then checks that entry files and html templates
/// exist under the project root.
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    /// Create a new filesystem validator with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &ResolvedConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        for (name, entry) in config.entry.iter() {
            let path = self.root.join(entry);
            if !path.is_file() {
                return Err(ConfigError::EntryNotFound {
                    name: name.to_string(),
                    path,
                });
            }
        }

        for page in config.html_pages()? {
            let path = self.root.join(&page.template);
            if !path.is_file() {
                return Err(ConfigError::TemplateNotFound { path });
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &ResolvedConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &ResolvedConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}
