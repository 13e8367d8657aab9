//! Resolver settings layered from defaults, the project file and the
//! environment.
//!
//! Priority: `TANDEM_*` environment variables > `[settings]` in the project
//! file > defaults.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::discovery::{JSON_FILE, TOML_FILE};
use crate::error::{ConfigError, Result};
use crate::resolved::Mode;

pub const ENV_PREFIX: &str = "TANDEM_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Mode used when none is given explicitly
    #[serde(default)]
    pub mode: Mode,

    /// Log filter directive (e.g. "debug")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Settings {
    /// The provider stack for `root`.
    pub fn figment(root: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        let toml_path = root.join(TOML_FILE);
        let json_path = root.join(JSON_FILE);
        if toml_path.is_file() {
            figment = figment.merge(Figment::from(Toml::file(toml_path)).focus("settings"));
        } else if json_path.is_file() {
            figment = figment.merge(Figment::from(Json::file(json_path)).focus("settings"));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).only(&["mode", "log_level"]))
    }

    /// Load settings for the project at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        Self::figment(root)
            .extract()
            .map_err(|e| ConfigError::Settings(Box::new(e)))
    }
}
