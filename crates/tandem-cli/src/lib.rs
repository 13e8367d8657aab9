//! tandem CLI: resolve, check and split the build configuration of a
//! two-page application.
//!
//! - [`cli`] - Argument definitions
//! - [`commands`] - Command implementations
//! - [`error`] - CLI error type and miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - Status lines

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
