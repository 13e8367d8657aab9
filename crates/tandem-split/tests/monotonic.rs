//! Property tests: a module's group depends only on the module itself.

use proptest::prelude::*;
use serde_json::json;
use tandem_config::ChunkSplitPolicy;
use tandem_split::{
    Assignment, ChunkSplitter, ImportKind, ModuleGraph, ModuleNode, OutputKind,
};

fn policy() -> ChunkSplitPolicy {
    serde_json::from_value(json!({
        "chunks": "all",
        "minSize": 20000,
        "cacheGroups": {
            "vendors": { "test": "[\\\\/]node_modules[\\\\/]", "priority": -10, "name": "vender" },
            "shared": { "minChunks": 2, "priority": -20 },
            "large": { "minSize": 50000, "priority": -30, "name": "large" }
        }
    }))
    .unwrap()
}

type Edge = (usize, usize, bool);

fn build(modules: &[(bool, u64)], edges: &[Edge], roots: &[usize]) -> ModuleGraph {
    let mut graph = ModuleGraph::new();
    for (i, (vendor, size)) in modules.iter().enumerate() {
        let path = if *vendor {
            format!("/app/node_modules/pkg{i}/index.js")
        } else {
            format!("/app/src/m{i}.js")
        };
        graph
            .add_module(ModuleNode::new(format!("m{i}"), path, *size))
            .unwrap();
    }
    for (from, to, dynamic) in edges {
        let kind = if *dynamic {
            ImportKind::Dynamic
        } else {
            ImportKind::Static
        };
        graph
            .add_dependency(format!("m{from}").as_str(), format!("m{to}").as_str(), kind)
            .unwrap();
    }
    for (j, root) in roots.iter().enumerate() {
        graph.add_entry(format!("e{j}"), format!("m{root}").as_str()).unwrap();
    }
    graph
}

fn graph_parts() -> impl Strategy<Value = (Vec<(bool, u64)>, Vec<Edge>, Vec<usize>)> {
    (2usize..12).prop_flat_map(|n| {
        (
            prop::collection::vec((any::<bool>(), 0u64..80_000), n),
            prop::collection::vec((0..n, 0..n, prop::bool::weighted(0.2)), 0..n * 2),
            prop::collection::vec(0..n, 1..4),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Adding a module imported by one entry never regroups existing modules.
    #[test]
    fn adding_a_module_keeps_other_groups(
        (modules, edges, roots) in graph_parts(),
        leaf_size in 0u64..80_000,
        leaf_vendor in any::<bool>(),
    ) {
        let policy = policy();
        let splitter = ChunkSplitter::new(&policy).unwrap();

        let before = splitter.split(&build(&modules, &edges, &roots));

        let mut grown = build(&modules, &edges, &roots);
        let leaf_path = if leaf_vendor { "/app/node_modules/leaf/index.js" } else { "/app/src/leaf.js" };
        grown.add_module(ModuleNode::new("leaf", leaf_path, leaf_size)).unwrap();
        grown
            .add_dependency(format!("m{}", roots[0]).as_str(), "leaf", ImportKind::Static)
            .unwrap();
        let after = splitter.split(&grown);

        for (id, assignment) in &before.assignments {
            let later = after.assignment(id).unwrap();
            prop_assert_eq!(assignment.group(), later.group(), "module {} moved", id);
        }
    }

    /// Every module gets exactly one assignment, and every grouped module
    /// lives in exactly one split chunk.
    #[test]
    fn assignments_are_total_and_exclusive((modules, edges, roots) in graph_parts()) {
        let policy = policy();
        let graph = build(&modules, &edges, &roots);
        let plan = ChunkSplitter::new(&policy).unwrap().split(&graph);

        prop_assert_eq!(plan.assignments.len(), graph.module_count());

        for (id, assignment) in &plan.assignments {
            let holders: Vec<&str> = plan
                .chunks
                .iter()
                .filter(|c| c.kind == OutputKind::Split && c.modules.contains(id))
                .map(|c| c.name.as_str())
                .collect();
            match assignment {
                Assignment::Group { chunk, .. } => {
                    prop_assert_eq!(holders, vec![chunk.as_str()]);
                }
                Assignment::Inline { chunks } => {
                    prop_assert!(holders.is_empty());
                    prop_assert!(!chunks.is_empty());
                }
                Assignment::Unreachable => prop_assert!(holders.is_empty()),
            }
        }
    }

    /// Splitting the same graph twice gives the same plan.
    #[test]
    fn split_is_deterministic((modules, edges, roots) in graph_parts()) {
        let policy = policy();
        let splitter = ChunkSplitter::new(&policy).unwrap();
        let graph = build(&modules, &edges, &roots);
        prop_assert_eq!(splitter.split(&graph), splitter.split(&graph));
    }
}
