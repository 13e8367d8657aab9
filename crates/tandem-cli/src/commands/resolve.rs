//! `tandem resolve`: print the resolved configuration.

use tandem_config::Resolver;
use tracing::info;

use crate::cli::ResolveArgs;
use crate::commands::{Context, print_json};
use crate::error::Result;

pub fn execute(args: ResolveArgs, ctx: &Context) -> Result<()> {
    let mode = ctx.mode(args.mode);
    let resolver = Resolver::discover(&ctx.root)?;

    let resolved = if args.no_check {
        resolver.resolve_unchecked(mode)?
    } else {
        resolver.resolve(mode)?
    };
    info!(%mode, keys = resolved.raw().len(), "resolved configuration");

    print_json(&resolved, args.compact)
}
