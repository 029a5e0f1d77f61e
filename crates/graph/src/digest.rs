use crate::cycles::find_cycles;
use crate::types::DependencyGraph;
use serde::{Deserialize, Serialize};

/// How many files import a given file directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanIn {
    pub file: String,
    pub imported_by_count: usize,
}

/// Files with the most direct importers, highest first (ties by path)
pub fn top_dependents(graph: &DependencyGraph, limit: usize) -> Vec<FanIn> {
    let mut ranked: Vec<FanIn> = graph
        .reverse
        .iter()
        .map(|(file, importers)| FanIn {
            file: file.clone(),
            imported_by_count: importers.len(),
        })
        .collect();
    ranked.sort_by(|a, b| b.imported_by_count.cmp(&a.imported_by_count));
    ranked.truncate(limit);
    ranked
}

/// Compact summary of a graph for agent prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDigest {
    pub total_modules: usize,
    pub total_edges: usize,
    pub top_imported: Vec<FanIn>,
    pub has_cycles: bool,
}

impl GraphDigest {
    pub fn from_graph(graph: &DependencyGraph, limit: usize) -> Self {
        Self {
            total_modules: graph.nodes().len(),
            total_edges: graph.edge_count(),
            top_imported: top_dependents(graph, limit),
            has_cycles: find_cycles(graph).has_cycles(),
        }
    }
}
