use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolved::helpers::{
    default_max_async_requests, default_max_initial_requests, default_min_chunks,
    default_min_size, default_name_delimiter,
};
use crate::resolved::rules::compile_regex;
use crate::resolved::types::ChunkScope;

/// Optimization settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    #[serde(default)]
    pub split_chunks: ChunkSplitPolicy,

    /// Mark unused exports for removal
    #[serde(default)]
    pub used_exports: bool,
}

/// Thresholds and named groups deciding how modules are split into chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkSplitPolicy {
    /// Which chunks take part in splitting
    #[serde(default)]
    pub chunks: ChunkScope,

    /// Minimum module size (bytes) for a group to take it
    #[serde(default = "default_min_size")]
    pub min_size: u64,

    /// Minimum number of chunks that must contain a module
    #[serde(default = "default_min_chunks")]
    pub min_chunks: usize,

    /// Maximum parallel requests when loading an on-demand chunk
    #[serde(default = "default_max_async_requests")]
    pub max_async_requests: usize,

    /// Maximum parallel requests at an entry point
    #[serde(default = "default_max_initial_requests")]
    pub max_initial_requests: usize,

    /// Separator used when generating names for unnamed groups
    #[serde(default = "default_name_delimiter")]
    pub automatic_name_delimiter: String,

    /// Named groups in declaration order
    #[serde(default)]
    pub cache_groups: IndexMap<String, CacheGroup>,
}

impl Default for ChunkSplitPolicy {
    fn default() -> Self {
        Self {
            chunks: ChunkScope::default(),
            min_size: default_min_size(),
            min_chunks: default_min_chunks(),
            max_async_requests: default_max_async_requests(),
            max_initial_requests: default_max_initial_requests(),
            automatic_name_delimiter: default_name_delimiter(),
            cache_groups: IndexMap::new(),
        }
    }
}

/// A named chunk group and the predicate a module must satisfy to join it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheGroup {
    /// Regex matched against the module path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,

    /// Higher priority groups are evaluated first
    #[serde(default)]
    pub priority: i32,

    /// Overrides the policy's `minChunks`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_chunks: Option<usize>,

    /// Overrides the policy's `minSize`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,

    /// Fixed output chunk name; generated from the referencing chunks when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Reuse an existing chunk when it already contains exactly these modules
    #[serde(default)]
    pub reuse_existing_chunk: bool,
}

impl CacheGroup {
    pub fn compile_test(&self, key: &str) -> Result<Option<Regex>> {
        self.test
            .as_deref()
            .map(|pattern| {
                compile_regex(
                    &format!("optimization.splitChunks.cacheGroups.{key}.test"),
                    pattern,
                )
            })
            .transpose()
    }
}

impl ChunkSplitPolicy {
    /// Groups in evaluation order: priority descending, declaration order
    /// among equal priorities.
    pub fn ordered_groups(&self) -> Vec<(&str, &CacheGroup)> {
        let mut groups: Vec<(&str, &CacheGroup)> = self
            .cache_groups
            .iter()
            .map(|(key, group)| (key.as_str(), group))
            .collect();
        // sort_by is stable
        groups.sort_by(|a, b| b.1.priority.cmp(&a.1.priority));
        groups
    }

    pub fn min_chunks_for(&self, group: &CacheGroup) -> usize {
        group.min_chunks.unwrap_or(self.min_chunks)
    }

    pub fn min_size_for(&self, group: &CacheGroup) -> u64 {
        group.min_size.unwrap_or(self.min_size)
    }

    /// Names of fixed-name output chunks produced by the groups.
    pub fn named_chunks(&self) -> impl Iterator<Item = &str> {
        self.cache_groups
            .values()
            .filter_map(|group| group.name.as_deref())
    }
}
