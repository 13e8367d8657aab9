//! Module dependency graph consumed by the chunk splitter.
//!
//! The graph is produced by whatever resolved the application's imports;
//! this crate only reads it. The JSON form is:
//!
//! ```json
//! {
//!   "modules": [{ "id": "src/index.js", "path": "/app/src/index.js", "size": 1200 }],
//!   "dependencies": [{ "from": "src/index.js", "to": "src/lazy.js", "kind": "dynamic" }],
//!   "entries": { "main": "src/index.js" }
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};

/// Stable identifier of a module within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub id: ModuleId,

    /// Path matched against cache group `test` patterns
    pub path: PathBuf,

    /// Size in bytes
    #[serde(default)]
    pub size: u64,
}

impl ModuleNode {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            id: ModuleId::new(id),
            path: path.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    #[default]
    Static,
    /// `import()`: the target starts its own async chunk
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub from: ModuleId,
    pub to: ModuleId,
    #[serde(default)]
    pub kind: ImportKind,
}

/// Serialized form of a [`ModuleGraph`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphDocument {
    #[serde(default)]
    modules: Vec<ModuleNode>,
    #[serde(default)]
    dependencies: Vec<Dependency>,
    #[serde(default)]
    entries: IndexMap<String, ModuleId>,
}

/// Modules, their imports, and the named entry points.
///
/// Modules, dependencies and entries keep insertion order, so everything
/// derived from the graph is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: IndexMap<ModuleId, ModuleNode>,
    dependencies: Vec<Dependency>,
    entries: IndexMap<String, ModuleId>,
    adjacency: HashMap<ModuleId, Vec<usize>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON form and check every reference.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: GraphDocument =
            serde_json::from_str(json).map_err(|e| SplitError::InvalidGraph(e.to_string()))?;
        Self::from_document(document)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let document: GraphDocument =
            serde_json::from_value(value).map_err(|e| SplitError::InvalidGraph(e.to_string()))?;
        Self::from_document(document)
    }

    fn from_document(document: GraphDocument) -> Result<Self> {
        let mut graph = Self::new();
        for module in document.modules {
            graph.add_module(module)?;
        }
        for dependency in document.dependencies {
            graph.add_dependency(dependency.from, dependency.to, dependency.kind)?;
        }
        for (name, module) in document.entries {
            graph.add_entry(name, module)?;
        }
        Ok(graph)
    }

    pub fn add_module(&mut self, module: ModuleNode) -> Result<()> {
        if self.modules.contains_key(&module.id) {
            return Err(SplitError::DuplicateModule(module.id));
        }
        self.modules.insert(module.id.clone(), module);
        Ok(())
    }

    pub fn add_dependency(
        &mut self,
        from: impl Into<ModuleId>,
        to: impl Into<ModuleId>,
        kind: ImportKind,
    ) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        for id in [&from, &to] {
            self.require(id, || format!("dependency {from} -> {to}"))?;
        }

        self.adjacency
            .entry(from.clone())
            .or_default()
            .push(self.dependencies.len());
        self.dependencies.push(Dependency { from, to, kind });
        Ok(())
    }

    pub fn add_entry(&mut self, name: impl Into<String>, module: impl Into<ModuleId>) -> Result<()> {
        let (name, module) = (name.into(), module.into());
        if self.entries.contains_key(&name) {
            return Err(SplitError::DuplicateEntry(name));
        }
        self.require(&module, || format!("entry '{name}'"))?;
        self.entries.insert(name, module);
        Ok(())
    }

    fn require(&self, id: &ModuleId, context: impl FnOnce() -> String) -> Result<()> {
        if self.modules.contains_key(id) {
            Ok(())
        } else {
            Err(SplitError::UnknownModule {
                id: id.clone(),
                context: context(),
            })
        }
    }

    pub fn module(&self, id: &ModuleId) -> Option<&ModuleNode> {
        self.modules.get(id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.modules.values()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ModuleId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), id))
    }

    /// Outgoing imports of `id`, in insertion order.
    pub fn imports_of(&self, id: &ModuleId) -> impl Iterator<Item = &Dependency> {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .map(|&index| &self.dependencies[index])
    }

    /// Targets of `import()` anywhere in the graph, first occurrence first.
    pub fn dynamic_targets(&self) -> IndexSet<&ModuleId> {
        self.dependencies
            .iter()
            .filter(|dep| dep.kind == ImportKind::Dynamic)
            .map(|dep| &dep.to)
            .collect()
    }

    /// Modules reachable from `root` through static imports, `root` included.
    pub fn static_closure(&self, root: &ModuleId) -> IndexSet<ModuleId> {
        let mut seen = IndexSet::new();
        let mut stack = vec![root.clone()];

        while let Some(id) = stack.pop() {
            if !seen.insert(id.clone()) {
                continue;
            }
            // Reverse so the first import is visited first
            let next: Vec<&Dependency> = self
                .imports_of(&id)
                .filter(|dep| dep.kind == ImportKind::Static)
                .collect();
            for dep in next.into_iter().rev() {
                if !seen.contains(&dep.to) {
                    stack.push(dep.to.clone());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diamond() -> ModuleGraph {
        let mut graph = ModuleGraph::new();
        for id in ["a", "b", "c", "d", "lazy"] {
            graph
                .add_module(ModuleNode::new(id, format!("/app/src/{id}.js"), 100))
                .unwrap();
        }
        graph.add_dependency("a", "b", ImportKind::Static).unwrap();
        graph.add_dependency("a", "c", ImportKind::Static).unwrap();
        graph.add_dependency("b", "d", ImportKind::Static).unwrap();
        graph.add_dependency("c", "d", ImportKind::Static).unwrap();
        graph.add_dependency("c", "lazy", ImportKind::Dynamic).unwrap();
        graph.add_entry("main", "a").unwrap();
        graph
    }

    #[test]
    fn static_closure_skips_dynamic_imports() {
        let graph = diamond();
        let closure = graph.static_closure(&ModuleId::from("a"));
        let ids: Vec<&str> = closure.iter().map(ModuleId::as_str).collect();
        assert_eq!(ids, vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn dynamic_targets_are_collected() {
        let graph = diamond();
        let targets: Vec<&str> = graph.dynamic_targets().into_iter().map(|id| id.as_str()).collect();
        assert_eq!(targets, vec!["lazy"]);
    }

    #[test]
    fn cycles_terminate() {
        let mut graph = ModuleGraph::new();
        graph.add_module(ModuleNode::new("x", "x.js", 1)).unwrap();
        graph.add_module(ModuleNode::new("y", "y.js", 1)).unwrap();
        graph.add_dependency("x", "y", ImportKind::Static).unwrap();
        graph.add_dependency("y", "x", ImportKind::Static).unwrap();

        assert_eq!(graph.static_closure(&ModuleId::from("y")).len(), 2);
    }

    #[test]
    fn unknown_references_are_rejected() {
        let mut graph = ModuleGraph::new();
        graph.add_module(ModuleNode::new("x", "x.js", 1)).unwrap();

        let err = graph
            .add_dependency("x", "missing", ImportKind::Static)
            .unwrap_err();
        assert!(matches!(err, SplitError::UnknownModule { ref id, .. } if id.as_str() == "missing"));

        let err = graph.add_entry("main", "nope").unwrap_err();
        assert!(err.to_string().contains("entry 'main'"));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut graph = ModuleGraph::new();
        graph.add_module(ModuleNode::new("x", "x.js", 1)).unwrap();
        assert!(matches!(
            graph.add_module(ModuleNode::new("x", "other.js", 2)),
            Err(SplitError::DuplicateModule(_))
        ));

        graph.add_entry("main", "x").unwrap();
        assert!(matches!(
            graph.add_entry("main", "x"),
            Err(SplitError::DuplicateEntry(_))
        ));
    }

    #[test]
    fn parses_json_document() {
        let graph = ModuleGraph::from_value(json!({
            "modules": [
                { "id": "index", "path": "/app/src/index.js", "size": 10 },
                { "id": "lazy", "path": "/app/src/lazy.js" }
            ],
            "dependencies": [{ "from": "index", "to": "lazy", "kind": "dynamic" }],
            "entries": { "main": "index" }
        }))
        .unwrap();

        assert_eq!(graph.module_count(), 2);
        assert_eq!(graph.module(&ModuleId::from("lazy")).unwrap().size, 0);
        assert_eq!(graph.dependencies()[0].kind, ImportKind::Dynamic);
        assert_eq!(graph.entries().next(), Some(("main", &ModuleId::from("index"))));
    }

    #[test]
    fn malformed_json_is_invalid_graph() {
        assert!(matches!(
            ModuleGraph::from_json("{ \"modules\": 3 }"),
            Err(SplitError::InvalidGraph(_))
        ));
        assert!(matches!(
            ModuleGraph::from_json("{ \"nodes\": [] }"),
            Err(SplitError::InvalidGraph(_))
        ));
    }
}
