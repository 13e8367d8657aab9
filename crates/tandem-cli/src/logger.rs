//! Logging setup for the tandem CLI.
//!
//! The filter is chosen in this order:
//! 1. `--verbose`: debug for tandem crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. `log_level` from the project settings
//! 5. info for tandem crates
//!
//! ```rust,no_run
//! use tandem_cli::logger::init_logger;
//!
//! init_logger(false, false, false, None);
//! tracing::info!("resolving");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "tandem=debug,tandem_config=debug,tandem_split=debug,tandem_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "tandem=info,tandem_config=info,tandem_split=info,tandem_cli=info";

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, level: Option<&str>) {
    init_logger_with_filter(build_filter(verbose, quiet, level), no_color);
}

/// Initialize the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second initialization is ignored
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Filter for the given flags and settings level.
pub fn build_filter(verbose: bool, quiet: bool, level: Option<&str>) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env()
            .ok()
            .or_else(|| level.and_then(settings_filter))
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// A bare level like "debug" applies to the tandem crates only.
fn settings_filter(level: &str) -> Option<EnvFilter> {
    let directives = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        DEFAULT_FILTER.replace("info", level)
    };
    EnvFilter::try_new(directives).ok()
}

/// Whether colored output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
