//! # tandem-config
//!
//! Build configuration for the tandem two-page application: an untyped
//! [`BuildConfig`] mapping, a deterministic deep [`merge`], the built-in
//! common / development / production layers, and a typed, validated
//! [`ResolvedConfig`] view.
//!
//! ```rust,no_run
//! use tandem_config::{Mode, Resolver};
//!
//! # fn main() -> tandem_config::Result<()> {
//! let resolved = Resolver::discover(".")?.resolve(Mode::Production)?;
//! println!("{}", serde_json::to_string_pretty(&resolved.to_value()).unwrap());
//! # Ok(())
//! # }
//! ```

pub mod build_config;
pub mod dev;
pub mod discovery;
pub mod error;
pub mod filename;
pub mod merge;
pub mod presets;
pub mod resolved;
pub mod resolver;
pub mod settings;
pub mod validation;

// Re-export main types
pub use build_config::{BuildConfig, EnvironmentOverlay, ValueKind};
pub use dev::{DevServerConfig, ProxyOptions, ProxyRule};
pub use discovery::{ProjectDiscovery, ProjectFile};
pub use error::{ConfigError, Result};
pub use filename::{FilenameContext, FilenamePattern, PatternError, Segment, Token};
pub use merge::{KeyStrategy, MergePolicy, merge, merge_all};
pub use resolved::*;
pub use resolver::Resolver;
pub use settings::Settings;
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
