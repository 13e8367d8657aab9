//! Chunks as they exist before any splitting: one per entry, one per
//! dynamic import target.

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tandem_config::ChunkScope;

use crate::graph::{ModuleGraph, ModuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    Initial,
    Async,
}

impl SourceKind {
    pub(crate) fn in_scope(self, scope: ChunkScope) -> bool {
        match self {
            SourceKind::Initial => scope.includes_initial(),
            SourceKind::Async => scope.includes_async(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SourceChunk {
    pub name: String,
    pub kind: SourceKind,
    pub modules: IndexSet<ModuleId>,
}

/// Entry chunks in entry order, then async chunks in order of first
/// `import()`.
///
/// An async chunk is named after its root module. When that name is an
/// entry name, a `reserved` name, or another async chunk's name, it gets a
/// `<delimiter><n>` suffix.
pub(crate) fn source_chunks(
    graph: &ModuleGraph,
    reserved: &[&str],
    delimiter: &str,
) -> Vec<SourceChunk> {
    let mut taken: FxHashSet<String> = graph
        .entries()
        .map(|(name, _)| name.to_string())
        .chain(reserved.iter().map(|name| name.to_string()))
        .collect();

    let mut chunks: Vec<SourceChunk> = graph
        .entries()
        .map(|(name, root)| SourceChunk {
            name: name.to_string(),
            kind: SourceKind::Initial,
            modules: graph.static_closure(root),
        })
        .collect();

    for root in graph.dynamic_targets() {
        let name = unique_name(root.as_str(), delimiter, &taken);
        taken.insert(name.clone());
        chunks.push(SourceChunk {
            name,
            kind: SourceKind::Async,
            modules: graph.static_closure(root),
        });
    }
    chunks
}

fn unique_name(base: &str, delimiter: &str, taken: &FxHashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}{delimiter}{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
