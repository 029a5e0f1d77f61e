use crate::builder::GraphBuilder;
use crate::types::DependencyGraph;
use codeintel_extract::{SourceFile, SourceReader};
use std::sync::{Arc, PoisonError, RwLock};

/// Shared, swappable reference to the current [`DependencyGraph`].
///
/// Readers take a snapshot and keep using it for as long as they like; a
/// rebuild constructs the new graph completely before swapping it in, so no
/// reader ever sees a half-built graph.
#[derive(Debug, Clone, Default)]
pub struct GraphHandle {
    current: Arc<RwLock<Arc<DependencyGraph>>>,
}

impl GraphHandle {
    pub fn new(graph: DependencyGraph) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(graph))),
        }
    }

    /// Point-in-time view of the graph
    pub fn snapshot(&self) -> Arc<DependencyGraph> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in `graph`, returning the snapshot it replaces
    pub fn replace(&self, graph: DependencyGraph) -> Arc<DependencyGraph> {
        let next = Arc::new(graph);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Build a fresh graph over `files` and make it current
    pub fn rebuild(&self, files: &[SourceFile], reader: &dyn SourceReader) -> Arc<DependencyGraph> {
        let graph = GraphBuilder::new(reader).build(files);
        self.replace(graph);
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_snapshot_survives_rebuild() {
        let handle = GraphHandle::new(DependencyGraph::from_edges([("a.js", "b.js")]));
        let before = handle.snapshot();

        let mut files = HashMap::new();
        files.insert("x.js".to_string(), "import './y';".to_string());
        files.insert("y.js".to_string(), String::new());
        let list = vec![SourceFile::from_path("x.js"), SourceFile::from_path("y.js")];
        let after = handle.rebuild(&list, &files);

        assert_eq!(before.imports_of("a.js"), ["b.js"]);
        assert!(after.imports_of("a.js").is_empty());
        assert_eq!(after.imports_of("x.js"), ["y.js"]);
        assert!(Arc::ptr_eq(&after, &handle.snapshot()));
    }

    #[test]
    fn test_shared_across_threads() {
        let handle = GraphHandle::default();
        let clone = handle.clone();
        std::thread::spawn(move || {
            clone.replace(DependencyGraph::from_edges([("a", "b")]));
        })
        .join()
        .unwrap();
        assert_eq!(handle.snapshot().importers_of("b"), ["a"]);
    }
}
