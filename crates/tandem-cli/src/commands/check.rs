//! `tandem check`: validate the configuration for a mode.

use tandem_config::Resolver;
use tandem_split::ChunkSplitter;

use crate::cli::CheckArgs;
use crate::commands::Context;
use crate::error::Result;
use crate::ui;

/// Validate entries, templates, filename patterns and split groups.
///
/// # Errors
///
/// The first problem found, as a [`crate::error::CliError::Config`].
pub fn execute(args: CheckArgs, ctx: &Context) -> Result<()> {
    let mode = ctx.mode(args.mode);
    ui::info(&format!("Checking {mode} configuration..."));

    let resolved = Resolver::discover(&ctx.root)?.resolve(mode)?;
    let splitter = ChunkSplitter::new(resolved.split_policy())?;

    for (name, path) in resolved.entry.iter() {
        ui::success(&format!("  entry {name}: {}", path.display()));
    }
    for page in resolved.html_pages()? {
        ui::success(&format!("  page {}: {}", page.filename, page.template.display()));
    }
    ui::success(&format!(
        "Configuration is valid ({} rules, {} plugins, {} cache groups)",
        resolved.module.rules.len(),
        resolved.plugins.len(),
        splitter.policy().cache_groups.len()
    ));

    if let Some(dev) = &resolved.dev_server {
        ui::info(&format!(
            "Dev server on port {} with {} proxy rules",
            dev.port,
            dev.proxy.len()
        ));
    }
    Ok(())
}
