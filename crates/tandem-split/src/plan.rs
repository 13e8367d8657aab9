//! The result of chunk splitting.

use indexmap::IndexMap;
use serde::Serialize;

use crate::graph::ModuleId;

/// Where a module ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Assignment {
    /// Moved into the output chunk of a cache group. Source chunks outside
    /// the policy's `chunks` scope still carry their own copy.
    Group { group: String, chunk: String },
    /// Left inside every source chunk that contains it
    Inline { chunks: Vec<String> },
    /// Not reachable from any entry or dynamic import
    Unreachable,
}

impl Assignment {
    /// The cache group key, if the module was moved into one.
    pub fn group(&self) -> Option<&str> {
        match self {
            Assignment::Group { group, .. } => Some(group),
            _ => None,
        }
    }

    pub fn chunk(&self) -> Option<&str> {
        match self {
            Assignment::Group { chunk, .. } => Some(chunk),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputKind {
    /// Loaded by an entry's page
    Entry,
    /// Loaded on `import()`
    Async,
    /// Produced by a cache group
    Split,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputChunk {
    pub name: String,
    pub kind: OutputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub modules: Vec<ModuleId>,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestBudget {
    Initial,
    Async,
}

/// A chunk that needs more parallel requests than the policy allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetViolation {
    pub chunk: String,
    pub budget: RequestBudget,
    pub requests: usize,
    pub limit: usize,
}

/// Per-module assignments plus the output chunks they produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPlan {
    pub assignments: IndexMap<ModuleId, Assignment>,
    pub chunks: Vec<OutputChunk>,
    /// Requests needed to load each entry: the entry chunk plus its split chunks
    pub initial_requests: IndexMap<String, usize>,
    pub async_requests: IndexMap<String, usize>,
    pub violations: Vec<BudgetViolation>,
}

impl ChunkPlan {
    pub fn assignment(&self, id: &ModuleId) -> Option<&Assignment> {
        self.assignments.get(id)
    }

    pub fn chunk(&self, name: &str) -> Option<&OutputChunk> {
        self.chunks.iter().find(|chunk| chunk.name == name)
    }

    pub fn split_chunks(&self) -> impl Iterator<Item = &OutputChunk> {
        self.chunks.iter().filter(|c| c.kind == OutputKind::Split)
    }

    pub fn is_within_budget(&self) -> bool {
        self.violations.is_empty()
    }
}
