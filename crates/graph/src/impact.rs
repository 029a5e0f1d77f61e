use crate::types::DependencyGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// BFS depth cap used when the caller does not supply one
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// A file reached through at least one intermediate importer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitiveDependent {
    pub file: String,
    pub depth: usize,
}

/// Files affected by a change to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub file: String,
    /// Files importing `file` directly
    pub direct_dependents: Vec<String>,
    /// Deeper importers, by increasing depth
    pub transitive_dependents: Vec<TransitiveDependent>,
    pub fan_in: usize,
    pub max_depth_reached: usize,
    /// The depth cap stopped the walk while importers were still unvisited
    pub truncated: bool,
}

/// Walk the reverse adjacency breadth-first from `file`, at most
/// `max_depth` levels deep (values below 1 are treated as 1).
///
/// Each dependent is reported once, at the depth it was first reached.
pub fn transitive_dependents(graph: &DependencyGraph, file: &str, max_depth: usize) -> ImpactReport {
    let max_depth = max_depth.max(1);
    let mut visited: HashSet<&str> = HashSet::from([file]);
    let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(file, 0)]);
    let mut frontier: Vec<&str> = Vec::new();

    let mut direct = Vec::new();
    let mut transitive = Vec::new();
    let mut max_depth_reached = 0;

    while let Some((current, depth)) = queue.pop_front() {
        for dependent in graph.importers_of(current) {
            if !visited.insert(dependent.as_str()) {
                continue;
            }
            let dep_depth = depth + 1;
            max_depth_reached = max_depth_reached.max(dep_depth);

            if dep_depth == 1 {
                direct.push(dependent.clone());
            } else {
                transitive.push(TransitiveDependent {
                    file: dependent.clone(),
                    depth: dep_depth,
                });
            }

            if dep_depth < max_depth {
                queue.push_back((dependent.as_str(), dep_depth));
            } else {
                frontier.push(dependent.as_str());
            }
        }
    }

    let truncated = frontier.iter().any(|node| {
        graph
            .importers_of(node)
            .iter()
            .any(|importer| !visited.contains(importer.as_str()))
    });
    if truncated {
        log::debug!("Impact walk from {file} stopped at depth {max_depth}");
    }

    transitive.sort_by_key(|d| d.depth);
    ImpactReport {
        file: file.to_string(),
        fan_in: direct.len() + transitive.len(),
        direct_dependents: direct,
        transitive_dependents: transitive,
        max_depth_reached,
        truncated,
    }
}

/// Impact reports for several files, in the order given
pub fn impact_many<S: AsRef<str>>(
    graph: &DependencyGraph,
    files: &[S],
    max_depth: usize,
) -> Vec<ImpactReport> {
    files
        .iter()
        .map(|file| transitive_dependents(graph, file.as_ref(), max_depth))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chain() -> DependencyGraph {
        // c imports b, b imports a
        DependencyGraph::from_edges([("b", "a"), ("c", "b")])
    }

    #[test]
    fn test_direct_and_transitive() {
        let report = transitive_dependents(&chain(), "a", DEFAULT_MAX_DEPTH);
        assert_eq!(report.direct_dependents, vec!["b"]);
        assert_eq!(
            report.transitive_dependents,
            vec![TransitiveDependent {
                file: "c".into(),
                depth: 2
            }]
        );
        assert_eq!(report.fan_in, 2);
        assert_eq!(report.max_depth_reached, 2);
        assert!(!report.truncated);
    }

    #[test]
    fn test_depth_cap_sets_truncated() {
        let report = transitive_dependents(&chain(), "a", 1);
        assert_eq!(report.direct_dependents, vec!["b"]);
        assert!(report.transitive_dependents.is_empty());
        assert_eq!(report.fan_in, 1);
        assert!(report.truncated);

        let clamped = transitive_dependents(&chain(), "a", 0);
        assert_eq!(clamped, report);
    }

    #[test]
    fn test_cap_exactly_at_leaf_is_not_truncated() {
        let report = transitive_dependents(&chain(), "a", 2);
        assert_eq!(report.fan_in, 2);
        assert!(!report.truncated);
    }

    #[test]
    fn test_unknown_file() {
        let report = transitive_dependents(&chain(), "zzz", DEFAULT_MAX_DEPTH);
        assert_eq!(report.fan_in, 0);
        assert_eq!(report.max_depth_reached, 0);
    }

    #[test]
    fn test_impact_many() {
        let reports = impact_many(&chain(), &["a", "b", "c"], DEFAULT_MAX_DEPTH);
        let fan_in: Vec<usize> = reports.iter().map(|r| r.fan_in).collect();
        assert_eq!(fan_in, vec![2, 1, 0]);
    }
}
