//! Miette diagnostic conversion for CLI errors.

use miette::{MietteDiagnostic, Report};
use tandem_config::ConfigError;

use crate::error::CliError;

/// Convert a [`CliError`] into a miette report, with its hint as help text.
pub fn cli_error_to_miette(err: CliError) -> Report {
    let help = err.hint();
    let message = match err {
        CliError::Config(ConfigError::MergeConflict {
            path,
            base,
            overlay,
        }) => format!("Cannot merge '{path}': base is a {base} but the overlay is a {overlay}"),
        other => other.to_string(),
    };

    let mut diagnostic = MietteDiagnostic::new(message);
    if let Some(help) = help {
        diagnostic = diagnostic.with_help(help);
    }
    Report::new(diagnostic)
}
