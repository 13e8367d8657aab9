//! # tandem-split
//!
//! Decides which modules of an application leave their entry chunks for
//! shared cache-group chunks. The input is a [`ModuleGraph`] produced by
//! the bundler's resolver and the `optimization.splitChunks` section of a
//! resolved configuration.
//!
//! ```rust,no_run
//! use tandem_config::{Mode, Resolver};
//! use tandem_split::{ModuleGraph, split_chunks};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Resolver::discover(".")?.resolve(Mode::Production)?;
//! let graph = ModuleGraph::from_json(&std::fs::read_to_string("graph.json")?)?;
//! let plan = split_chunks(&graph, config.split_policy())?;
//! for chunk in plan.split_chunks() {
//!     println!("{} ({} modules)", chunk.name, chunk.modules.len());
//! }
//! # Ok(())
//! # }
//! ```

mod chunks;
pub mod classify;
pub mod error;
pub mod graph;
pub mod plan;

pub use classify::{ChunkSplitter, split_chunks};
pub use error::{Result, SplitError};
pub use graph::{Dependency, ImportKind, ModuleGraph, ModuleId, ModuleNode};
pub use plan::{
    Assignment, BudgetViolation, ChunkPlan, OutputChunk, OutputKind, RequestBudget,
};
