use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Ordered module rules. The first matching rule decides a file's pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRules {
    #[serde(default)]
    pub rules: Vec<ModuleRule>,
}

/// A file pattern and the loaders applied to matching files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRule {
    /// Regex matched against the module path
    pub test: String,

    /// Only paths under this directory match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<PathBuf>,

    /// Regex; matching paths are excluded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    /// Loader pipeline, applied last to first by the bundler
    #[serde(rename = "use", default, deserialize_with = "one_or_many")]
    pub loaders: Vec<LoaderSpec>,
}

/// A loader reference, either by name or with options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoaderSpec {
    Name(String),
    Detailed {
        loader: String,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        options: Value,
    },
}

impl LoaderSpec {
    pub fn loader(&self) -> &str {
        match self {
            LoaderSpec::Name(name) => name,
            LoaderSpec::Detailed { loader, .. } => loader,
        }
    }

    pub fn options(&self) -> Option<&Value> {
        match self {
            LoaderSpec::Detailed { options, .. } if !options.is_null() => Some(options),
            _ => None,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<LoaderSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<LoaderSpec>),
        One(LoaderSpec),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(loaders) => loaders,
        OneOrMany::One(loader) => vec![loader],
    })
}

impl ModuleRules {
    /// Compile every rule's regexes once.
    pub fn compile(&self) -> Result<CompiledRules<'_>> {
        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                let test = compile_regex(&format!("module.rules[{index}].test"), &rule.test)?;
                let exclude = rule
                    .exclude
                    .as_deref()
                    .map(|pattern| compile_regex(&format!("module.rules[{index}].exclude"), pattern))
                    .transpose()?;
                Ok(CompiledRule { rule, test, exclude })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledRules { rules })
    }
}

pub(crate) fn compile_regex(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
        field: field.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

struct CompiledRule<'a> {
    rule: &'a ModuleRule,
    test: Regex,
    exclude: Option<Regex>,
}

impl CompiledRule<'_> {
    fn matches(&self, path: &Path, text: &str) -> bool {
        if !self.test.is_match(text) {
            return false;
        }
        if let Some(include) = &self.rule.include {
            if !path.starts_with(include) {
                return false;
            }
        }
        !self.exclude.as_ref().is_some_and(|exclude| exclude.is_match(text))
    }
}

/// Module rules with compiled regexes, ready for matching.
pub struct CompiledRules<'a> {
    rules: Vec<CompiledRule<'a>>,
}

/// The rule chosen for a file.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'a> {
    pub index: usize,
    pub rule: &'a ModuleRule,
}

impl<'a> CompiledRules<'a> {
    /// The first rule that accepts `path`, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_config::{ModuleRule, ModuleRules, LoaderSpec};
    /// use std::path::Path;
    ///
    /// let rules = ModuleRules {
    ///     rules: vec![ModuleRule {
    ///         test: r"\.jsx?$".to_string(),
    ///         include: None,
    ///         exclude: Some("node_modules".to_string()),
    ///         loaders: vec![LoaderSpec::Name("babel-loader".to_string())],
    ///     }],
    /// };
    /// let compiled = rules.compile().unwrap();
    /// assert!(compiled.match_path(Path::new("src/app.jsx")).is_some());
    /// assert!(compiled.match_path(Path::new("node_modules/x/index.js")).is_none());
    /// ```
    pub fn match_path(&self, path: &Path) -> Option<RuleMatch<'a>> {
        let text = path.to_string_lossy();
        self.rules
            .iter()
            .enumerate()
            .find(|(_, compiled)| compiled.matches(path, &text))
            .map(|(index, compiled)| RuleMatch {
                index,
                rule: compiled.rule,
            })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules(value: Value) -> ModuleRules {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn use_accepts_single_loader_or_list() {
        let parsed = rules(json!({
            "rules": [
                { "test": "\\.(eot|ttf|svg)$", "use": { "loader": "file-loader" } },
                { "test": "\\.less$", "use": ["style-loader", { "loader": "css-loader", "options": { "importLoaders": 2 } }] }
            ]
        }));

        assert_eq!(parsed.rules[0].loaders.len(), 1);
        assert_eq!(parsed.rules[0].loaders[0].loader(), "file-loader");
        assert!(parsed.rules[0].loaders[0].options().is_none());

        let second = &parsed.rules[1].loaders;
        assert_eq!(second[0], LoaderSpec::Name("style-loader".to_string()));
        assert_eq!(second[1].options(), Some(&json!({ "importLoaders": 2 })));
    }

    #[test]
    fn first_match_wins_without_fallthrough() {
        let parsed = rules(json!({
            "rules": [
                { "test": "\\.svg$", "use": "svg-loader" },
                { "test": "\\.(eot|ttf|svg)$", "use": "file-loader" }
            ]
        }));
        let compiled = parsed.compile().unwrap();

        let hit = compiled.match_path(Path::new("assets/icon.svg")).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.rule.loaders[0].loader(), "svg-loader");

        let font = compiled.match_path(Path::new("assets/font.ttf")).unwrap();
        assert_eq!(font.index, 1);
    }

    #[test]
    fn include_and_exclude_narrow_matches() {
        let parsed = rules(json!({
            "rules": [
                { "test": "\\.jsx?$", "include": "/app/src", "exclude": "node_modules", "use": "babel-loader" }
            ]
        }));
        let compiled = parsed.compile().unwrap();

        assert!(compiled.match_path(Path::new("/app/src/index.js")).is_some());
        assert!(compiled.match_path(Path::new("/app/lib/index.js")).is_none());
        assert!(compiled.match_path(Path::new("/app/src/node_modules/a.js")).is_none());
        assert!(compiled.match_path(Path::new("/app/src/style.css")).is_none());
    }

    #[test]
    fn invalid_regex_is_reported_with_its_field() {
        let parsed = rules(json!({ "rules": [{ "test": "(unclosed", "use": "x" }] }));
        match parsed.compile() {
            Err(ConfigError::InvalidRegex { field, .. }) => {
                assert_eq!(field, "module.rules[0].test");
            }
            other => panic!("expected InvalidRegex, got {:?}", other.map(|c| c.len())),
        }
    }
}
