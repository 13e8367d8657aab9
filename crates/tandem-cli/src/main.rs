//! tandem CLI entry point: argument parsing, logging setup and dispatch.

use clap::Parser;
use miette::Result;
use tandem_cli::commands::{self, Context};
use tandem_cli::{cli, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let ctx = Context::load(args.root.clone()).map_err(error::cli_error_to_miette)?;

    logger::init_logger(
        args.verbose,
        args.quiet,
        args.no_color,
        ctx.settings.log_level.as_deref(),
    );
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Resolve(resolve_args) => commands::resolve_execute(resolve_args, &ctx),
        cli::Command::Check(check_args) => commands::check_execute(check_args, &ctx),
        cli::Command::Split(split_args) => commands::split_execute(split_args, &ctx),
    };

    result.map_err(error::cli_error_to_miette)
}
