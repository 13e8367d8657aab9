//! `tandem split`: classify a module graph into chunks.

use std::fs;

use tandem_config::{Resolver, validate_schema};
use tandem_split::{ChunkSplitter, ModuleGraph, RequestBudget};
use tracing::debug;

use crate::cli::SplitArgs;
use crate::commands::{Context, print_json};
use crate::error::{CliError, Result};
use crate::ui;

/// Print the chunk plan for the graph in `args.graph`.
///
/// Entry files need not exist; only the configuration's own consistency
/// is checked before splitting.
pub fn execute(args: SplitArgs, ctx: &Context) -> Result<()> {
    if !args.graph.is_file() {
        return Err(CliError::FileNotFound(args.graph));
    }
    let graph = ModuleGraph::from_json(&fs::read_to_string(&args.graph)?)?;
    debug!(
        modules = graph.module_count(),
        dependencies = graph.dependencies().len(),
        "module graph loaded"
    );

    let mode = ctx.mode(args.mode);
    let resolved = Resolver::discover(&ctx.root)?.resolve_unchecked(mode)?;
    validate_schema(&resolved)?;

    let plan = ChunkSplitter::new(resolved.split_policy())?.split(&graph);

    for chunk in plan.split_chunks() {
        ui::info(&format!(
            "{} ({} modules, {})",
            chunk.name,
            chunk.modules.len(),
            ui::format_size(chunk.size)
        ));
    }
    for violation in &plan.violations {
        let budget = match violation.budget {
            RequestBudget::Initial => "maxInitialRequests",
            RequestBudget::Async => "maxAsyncRequests",
        };
        ui::warning(&format!(
            "{} needs {} requests, {budget} is {}",
            violation.chunk, violation.requests, violation.limit
        ));
    }

    print_json(&plan, args.compact)
}
