//! Command-line interface definition for tandem.
//!
//! - `tandem resolve` - Print the resolved build configuration
//! - `tandem check` - Validate the configuration for a mode
//! - `tandem split` - Classify a module graph into chunks

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tandem_config::Mode;

/// tandem - layered build configuration for a two-page application
#[derive(Parser, Debug)]
#[command(
    name = "tandem",
    version,
    about = "Resolve, validate and split the build configuration of a two-page application"
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root containing the entries, templates and tandem.toml
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved configuration as JSON
    ///
    /// Merges the common layer, the project base, and the overlay for the
    /// selected mode, then validates the result.
    Resolve(ResolveArgs),

    /// Validate the configuration without printing it
    ///
    /// Checks entry files and html templates exist, filename patterns are
    /// well formed, and every regex compiles.
    Check(CheckArgs),

    /// Classify the modules of a dependency graph into chunks
    ///
    /// Reads a module graph as JSON and prints the chunk plan produced by
    /// the configuration's `optimization.splitChunks` policy.
    Split(SplitArgs),
}

/// Build mode as accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "prod")]
    Production,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Development => Mode::Development,
            ModeArg::Production => Mode::Production,
        }
    }
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Mode to resolve; defaults to the project settings
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Skip validation
    #[arg(long)]
    pub no_check: bool,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Mode to check; defaults to the project settings
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Mode whose split policy is used; defaults to the project settings
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Module graph JSON file
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
}
