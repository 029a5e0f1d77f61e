use codeintel_extract::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Adjacency keyed by file path
pub type Adjacency = BTreeMap<String, Vec<String>>;

/// One import statement of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEdge {
    /// Specifier as written in the source
    pub raw: String,
    /// Project file it resolves to, if any
    pub resolved: Option<String>,
}

/// Totals collected while building a [`DependencyGraph`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_files_parsed: usize,
    /// Resolved imports, counted per distinct specifier
    pub total_edges: usize,
    /// Sorted by language name
    pub languages_parsed: Vec<Language>,
    pub parse_errors: usize,
}

/// Project-wide import relationships.
///
/// Adjacency lists hold only resolved project files, each at most once per
/// list. A built graph is an immutable snapshot; see
/// [`GraphHandle`](crate::GraphHandle) for swapping in a rebuilt one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// File → files it imports
    pub forward: Adjacency,
    /// File → files importing it
    pub reverse: Adjacency,
    pub stats: GraphStats,
}

impl DependencyGraph {
    /// Build a graph from `(importer, imported)` pairs
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut graph = Self::default();
        for (from, to) in edges {
            graph.add_edge(from.into(), to.into());
        }
        graph.stats.total_edges = graph.edge_count();
        graph
    }

    /// Insert an edge, ignoring duplicates. Returns whether it was new.
    pub(crate) fn add_edge(&mut self, from: String, to: String) -> bool {
        let targets = self.forward.entry(from.clone()).or_default();
        if targets.contains(&to) {
            return false;
        }
        targets.push(to.clone());

        let importers = self.reverse.entry(to).or_default();
        if !importers.contains(&from) {
            importers.push(from);
        }
        true
    }

    pub fn imports_of(&self, path: &str) -> &[String] {
        self.forward.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn importers_of(&self, path: &str) -> &[String] {
        self.reverse.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct forward edges
    pub fn edge_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }

    /// Every file that imports or is imported, in path order
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = self
            .forward
            .keys()
            .chain(self.reverse.keys())
            .map(String::as_str)
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
