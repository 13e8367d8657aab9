//! Assignment of modules to cache groups.
//!
//! A module joins the first group, in priority order, whose test matches
//! its path and whose `minChunks` / `minSize` it meets. The decision looks
//! only at the module itself and the number of in-scope chunks containing
//! it, so adding or removing an unrelated module never moves another one.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use rustc_hash::FxHashMap as HashMap;
use tandem_config::{CacheGroup, ChunkSplitPolicy};
use tracing::{debug, trace, warn};

use crate::chunks::{SourceChunk, SourceKind, source_chunks};
use crate::error::Result;
use crate::graph::{ModuleGraph, ModuleId};
use crate::plan::{
    Assignment, BudgetViolation, ChunkPlan, OutputChunk, OutputKind, RequestBudget,
};

#[derive(Debug)]
struct CompiledGroup<'p> {
    key: &'p str,
    group: &'p CacheGroup,
    test: Option<Regex>,
    min_chunks: usize,
    min_size: u64,
}

impl CompiledGroup<'_> {
    fn accepts(&self, path: &str, size: u64, references: usize) -> bool {
        references >= self.min_chunks
            && size >= self.min_size
            && self.test.as_ref().is_none_or(|test| test.is_match(path))
    }
}

/// A split policy with its group patterns compiled.
#[derive(Debug)]
pub struct ChunkSplitter<'p> {
    policy: &'p ChunkSplitPolicy,
    groups: Vec<CompiledGroup<'p>>,
}

/// A module on its way into a group chunk.
struct Grouped<'g> {
    id: &'g ModuleId,
    group: usize,
    chunk: String,
}

impl<'p> ChunkSplitter<'p> {
    pub fn new(policy: &'p ChunkSplitPolicy) -> Result<Self> {
        let groups = policy
            .ordered_groups()
            .into_iter()
            .map(|(key, group)| {
                Ok(CompiledGroup {
                    key,
                    group,
                    test: group.compile_test(key)?,
                    min_chunks: policy.min_chunks_for(group),
                    min_size: policy.min_size_for(group),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { policy, groups })
    }

    pub fn policy(&self) -> &ChunkSplitPolicy {
        self.policy
    }

    /// Key of the group a module joins, or `None` when it stays inline.
    ///
    /// `references` counts the in-scope chunks containing the module. A
    /// module in no in-scope chunk is never moved.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use tandem_config::ChunkSplitPolicy;
    /// use tandem_split::ChunkSplitter;
    /// use serde_json::json;
    ///
    /// let policy: ChunkSplitPolicy = serde_json::from_value(json!({
    ///     "minSize": 0,
    ///     "cacheGroups": {
    ///         "vendors": { "test": "[\\\\/]node_modules[\\\\/]", "priority": -10 },
    ///         "default": { "minChunks": 2, "priority": -20 }
    ///     }
    /// })).unwrap();
    /// let splitter = ChunkSplitter::new(&policy).unwrap();
    ///
    /// let lib = Path::new("/app/node_modules/lib/index.js");
    /// assert_eq!(splitter.classify(lib, 500, 3), Some("vendors"));
    /// assert_eq!(splitter.classify(Path::new("/app/src/util.js"), 500, 2), Some("default"));
    /// assert_eq!(splitter.classify(Path::new("/app/src/util.js"), 500, 1), None);
    /// ```
    pub fn classify(&self, path: &Path, size: u64, references: usize) -> Option<&'p str> {
        self.classify_index(path, size, references)
            .map(|index| self.groups[index].key)
    }

    fn classify_index(&self, path: &Path, size: u64, references: usize) -> Option<usize> {
        if references == 0 {
            return None;
        }
        let path = path.to_string_lossy();
        self.groups
            .iter()
            .position(|group| group.accepts(&path, size, references))
    }

    /// Split the chunks of `graph` according to the policy.
    pub fn split(&self, graph: &ModuleGraph) -> ChunkPlan {
        let reserved: Vec<&str> = self.policy.named_chunks().collect();
        let sources = source_chunks(graph, &reserved, &self.policy.automatic_name_delimiter);
        let scope = self.policy.chunks;

        let mut containing: HashMap<&ModuleId, Vec<usize>> = HashMap::default();
        for (index, source) in sources.iter().enumerate() {
            for id in &source.modules {
                containing.entry(id).or_default().push(index);
            }
        }

        let mut assignments = IndexMap::new();
        let mut grouped = Vec::new();

        for module in graph.modules() {
            let Some(chunks) = containing.get(&module.id) else {
                assignments.insert(module.id.clone(), Assignment::Unreachable);
                continue;
            };

            let mut referencing: Vec<&str> = chunks
                .iter()
                .map(|&index| &sources[index])
                .filter(|source| source.kind.in_scope(scope))
                .map(|source| source.name.as_str())
                .collect();

            match self.classify_index(&module.path, module.size, referencing.len()) {
                Some(group) => {
                    referencing.sort_unstable();
                    let chunk = self.chunk_name(&self.groups[group], &referencing);
                    trace!(module = %module.id, group = self.groups[group].key, %chunk, "grouped");
                    // Replaced once chunk names are final; inserting now keeps graph order
                    assignments.insert(module.id.clone(), Assignment::Unreachable);
                    grouped.push(Grouped {
                        id: &module.id,
                        group,
                        chunk,
                    });
                }
                None => {
                    let chunks = chunks.iter().map(|&i| sources[i].name.clone()).collect();
                    assignments.insert(module.id.clone(), Assignment::Inline { chunks });
                }
            }
        }

        let renames = self.reused_chunks(&grouped, &sources);
        let mut split_outputs: IndexMap<String, OutputChunk> = IndexMap::new();
        let mut group_of: HashMap<&ModuleId, String> = HashMap::default();

        for entry in &grouped {
            let key = self.groups[entry.group].key;
            let name = renames
                .get(&entry.chunk)
                .cloned()
                .unwrap_or_else(|| entry.chunk.clone());
            let size = graph.module(entry.id).map_or(0, |m| m.size);

            let chunk = split_outputs
                .entry(name.clone())
                .or_insert_with(|| OutputChunk {
                    name: name.clone(),
                    kind: OutputKind::Split,
                    group: Some(key.to_string()),
                    modules: Vec::new(),
                    size: 0,
                });
            chunk.modules.push(entry.id.clone());
            chunk.size += size;

            group_of.insert(entry.id, name.clone());
            assignments.insert(
                entry.id.clone(),
                Assignment::Group {
                    group: key.to_string(),
                    chunk: name,
                },
            );
        }

        let mut plan = ChunkPlan {
            assignments,
            ..ChunkPlan::default()
        };

        for source in &sources {
            // Out-of-scope chunks keep their grouped modules
            let in_scope = source.kind.in_scope(scope);
            let requests = if in_scope {
                split_requests(source, &group_of)
            } else {
                1
            };

            let reused = source.kind == SourceKind::Async
                && renames.values().any(|name| *name == source.name);
            if !reused {
                let modules: Vec<ModuleId> = source
                    .modules
                    .iter()
                    .filter(|id| !in_scope || !group_of.contains_key(id))
                    .cloned()
                    .collect();
                let size = modules
                    .iter()
                    .filter_map(|id| graph.module(id))
                    .map(|m| m.size)
                    .sum();
                plan.chunks.push(OutputChunk {
                    name: source.name.clone(),
                    kind: match source.kind {
                        SourceKind::Initial => OutputKind::Entry,
                        SourceKind::Async => OutputKind::Async,
                    },
                    group: None,
                    modules,
                    size,
                });
            }

            let (budget, limit, counts) = match source.kind {
                SourceKind::Initial => (
                    RequestBudget::Initial,
                    self.policy.max_initial_requests,
                    &mut plan.initial_requests,
                ),
                SourceKind::Async => (
                    RequestBudget::Async,
                    self.policy.max_async_requests,
                    &mut plan.async_requests,
                ),
            };
            counts.insert(source.name.clone(), requests);

            if requests > limit {
                warn!(
                    chunk = %source.name,
                    requests,
                    limit,
                    "chunk needs more parallel requests than allowed"
                );
                plan.violations.push(BudgetViolation {
                    chunk: source.name.clone(),
                    budget,
                    requests,
                    limit,
                });
            }
        }

        plan.chunks.extend(split_outputs.into_values());

        debug!(
            modules = plan.assignments.len(),
            grouped = grouped.len(),
            chunks = plan.chunks.len(),
            violations = plan.violations.len(),
            "chunks split"
        );
        plan
    }

    fn chunk_name(&self, group: &CompiledGroup<'_>, referencing: &[&str]) -> String {
        match &group.group.name {
            Some(name) => name.clone(),
            None => {
                let delimiter = &self.policy.automatic_name_delimiter;
                let mut name = group.key.to_string();
                for chunk in referencing {
                    name.push_str(delimiter);
                    name.push_str(chunk);
                }
                name
            }
        }
    }

    /// Split chunks that contain exactly the modules of an async chunk take
    /// that chunk's name when their group allows reuse.
    fn reused_chunks(
        &self,
        grouped: &[Grouped<'_>],
        sources: &[SourceChunk],
    ) -> HashMap<String, String> {
        let mut members: IndexMap<&str, (usize, IndexSet<&ModuleId>)> = IndexMap::new();
        for entry in grouped {
            members
                .entry(entry.chunk.as_str())
                .or_insert_with(|| (entry.group, IndexSet::new()))
                .1
                .insert(entry.id);
        }

        let mut renames = HashMap::default();
        for (chunk, (group, modules)) in members {
            if !self.groups[group].group.reuse_existing_chunk {
                continue;
            }
            let existing = sources.iter().find(|source| {
                source.kind == SourceKind::Async
                    && source.kind.in_scope(self.policy.chunks)
                    && source.modules.len() == modules.len()
                    && source.modules.iter().all(|id| modules.contains(id))
            });
            if let Some(existing) = existing {
                debug!(chunk, reused = %existing.name, "reusing existing chunk");
                renames.insert(chunk.to_string(), existing.name.clone());
            }
        }
        renames
    }
}

/// The chunk itself plus each distinct split chunk holding one of its modules.
fn split_requests(source: &SourceChunk, group_of: &HashMap<&ModuleId, String>) -> usize {
    let split: IndexSet<&str> = source
        .modules
        .iter()
        .filter_map(|id| group_of.get(id))
        .map(String::as_str)
        .filter(|name| *name != source.name)
        .collect();
    1 + split.len()
}

/// Compile `policy` and split `graph` with it.
pub fn split_chunks(graph: &ModuleGraph, policy: &ChunkSplitPolicy) -> Result<ChunkPlan> {
    Ok(ChunkSplitter::new(policy)?.split(graph))
}
