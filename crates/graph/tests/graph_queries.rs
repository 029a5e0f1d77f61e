use codeintel_extract::{FsReader, Language, SourceFile};
use codeintel_graph::{
    build_dependency_graph, find_cycles, transitive_dependents, DependencyGraph, GraphDigest,
    DEFAULT_MAX_DEPTH,
};
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use pretty_assertions::assert_eq;
use std::collections::{BTreeSet, HashMap};
use tempfile::TempDir;

/// Forward edges of a small graph with two overlapping cycle clusters
const EDGES: &[(&str, &str)] = &[
    ("app", "router"),
    ("router", "handlers"),
    ("handlers", "router"),
    ("handlers", "db"),
    ("db", "models"),
    ("models", "schema"),
    ("schema", "models"),
    ("schema", "db"),
    ("cli", "app"),
    ("cli", "config"),
    ("config", "config"),
];

#[test]
fn cycles_match_petgraph_tarjan() {
    let graph = DependencyGraph::from_edges(EDGES.iter().copied());
    let ours: BTreeSet<BTreeSet<String>> = find_cycles(&graph)
        .cycles
        .into_iter()
        .map(|c| c.into_iter().collect())
        .collect();

    let mut oracle = DiGraph::<&str, ()>::new();
    let mut index = HashMap::new();
    for (from, to) in EDGES {
        for node in [from, to] {
            if !index.contains_key(node) {
                index.insert(*node, oracle.add_node(*node));
            }
        }
        oracle.add_edge(index[from], index[to], ());
    }
    let expected: BTreeSet<BTreeSet<String>> = tarjan_scc(&oracle)
        .into_iter()
        .filter(|scc| scc.len() >= 2)
        .map(|scc| scc.into_iter().map(|n| oracle[n].to_string()).collect())
        .collect();

    assert_eq!(ours, expected);
    assert_eq!(ours.len(), 2);
}

#[test]
fn impact_terminates_on_cyclic_graph() {
    let graph = DependencyGraph::from_edges(EDGES.iter().copied());
    for depth in [1, 2, 3, DEFAULT_MAX_DEPTH] {
        let report = transitive_dependents(&graph, "models", depth);
        assert!(report.max_depth_reached <= depth);
        assert!(!report.direct_dependents.contains(&"models".to_string()));
    }

    let full = transitive_dependents(&graph, "models", DEFAULT_MAX_DEPTH);
    let mut reached: Vec<&str> = full
        .direct_dependents
        .iter()
        .map(String::as_str)
        .chain(full.transitive_dependents.iter().map(|d| d.file.as_str()))
        .collect();
    reached.sort();
    assert_eq!(reached, vec!["app", "cli", "db", "handlers", "router", "schema"]);
    assert_eq!(full.fan_in, 6);
    assert!(!full.truncated);
}

#[test]
fn build_from_disk() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("src/lib")).unwrap();
    std::fs::write(root.join("src/index.ts"), "import { a } from './lib';\nexport * from './b';\n").unwrap();
    std::fs::write(root.join("src/lib/index.ts"), "import { b } from '../b';\n").unwrap();
    std::fs::write(root.join("src/b.ts"), "import { a } from './lib';\n").unwrap();

    let files: Vec<SourceFile> = ["src/index.ts", "src/lib/index.ts", "src/b.ts", "src/missing.ts"]
        .into_iter()
        .map(SourceFile::from_path)
        .collect();
    let graph = build_dependency_graph(&files, &FsReader::new(root));

    assert_eq!(graph.imports_of("src/index.ts"), ["src/lib/index.ts", "src/b.ts"]);
    assert_eq!(graph.stats.parse_errors, 1);
    assert_eq!(graph.stats.languages_parsed, vec![Language::TypeScript]);

    let cycles = find_cycles(&graph);
    assert_eq!(cycles.cycle_count, 1);
    assert_eq!(cycles.files_in_cycles, 2);

    let digest = GraphDigest::from_graph(&graph, 3);
    assert!(digest.has_cycles);
    assert_eq!(digest.total_modules, 3);
    assert_eq!(digest.top_imported[0].file, "src/b.ts");
}
