//! Import cycle detection.
//!
//! Tarjan's strongly-connected-components algorithm, run with an explicit
//! work stack so deep import chains cannot overflow the thread stack.

use crate::types::DependencyGraph;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Import cycles of a graph, largest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycles: Vec<Vec<String>>,
    pub cycle_count: usize,
    /// Distinct files taking part in any cycle
    pub files_in_cycles: usize,
}

impl CycleReport {
    pub fn has_cycles(&self) -> bool {
        self.cycle_count > 0
    }
}

/// Lift the forward adjacency into petgraph.
///
/// Nodes are added importers first (in path order), then any target not
/// yet seen, so traversal order is stable across runs.
pub(crate) fn to_petgraph(graph: &DependencyGraph) -> DiGraph<&str, ()> {
    let mut digraph = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();

    let importers = graph.forward.keys().map(String::as_str);
    let targets = graph.forward.values().flatten().map(String::as_str);
    for node in importers.chain(targets) {
        index.entry(node).or_insert_with(|| digraph.add_node(node));
    }

    for (from, targets) in &graph.forward {
        for to in targets {
            digraph.add_edge(index[from.as_str()], index[to.as_str()], ());
        }
    }
    digraph
}

struct Frame {
    node: NodeIndex,
    neighbors: Vec<NodeIndex>,
    next: usize,
}

struct Tarjan<'g> {
    graph: &'g DiGraph<&'g str, ()>,
    counter: usize,
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<NodeIndex>,
    components: Vec<Vec<NodeIndex>>,
}

impl<'g> Tarjan<'g> {
    fn new(graph: &'g DiGraph<&'g str, ()>) -> Self {
        let n = graph.node_count();
        Self {
            graph,
            counter: 0,
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn open(&mut self, node: NodeIndex) -> Frame {
        let i = node.index();
        self.index[i] = Some(self.counter);
        self.lowlink[i] = self.counter;
        self.counter += 1;
        self.stack.push(node);
        self.on_stack[i] = true;

        // petgraph yields neighbors newest-first
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        neighbors.reverse();
        Frame {
            node,
            neighbors,
            next: 0,
        }
    }

    fn close(&mut self, node: NodeIndex) {
        let i = node.index();
        if Some(self.lowlink[i]) != self.index[i] {
            return;
        }
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member.index()] = false;
            component.push(member);
            if member == node {
                break;
            }
        }
        self.components.push(component);
    }

    fn visit(&mut self, start: NodeIndex) {
        let mut frames = vec![self.open(start)];

        while let Some(frame) = frames.last_mut() {
            let v = frame.node.index();
            let next = frame.neighbors.get(frame.next).copied();
            frame.next += 1;

            match next {
                Some(w) => match self.index[w.index()] {
                    None => {
                        let child = self.open(w);
                        frames.push(child);
                    }
                    Some(w_index) if self.on_stack[w.index()] => {
                        self.lowlink[v] = self.lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                },
                None => {
                    let node = frame.node;
                    frames.pop();
                    if let Some(parent) = frames.last() {
                        let p = parent.node.index();
                        self.lowlink[p] = self.lowlink[p].min(self.lowlink[node.index()]);
                    }
                    self.close(node);
                }
            }
        }
    }

    fn run(mut self) -> Vec<Vec<NodeIndex>> {
        for node in self.graph.node_indices() {
            if self.index[node.index()].is_none() {
                self.visit(node);
            }
        }
        self.components
    }
}

/// Find import cycles: strongly connected components of two or more files.
///
/// Every file appearing as an importer or as a target is a node. Cycles are
/// sorted by size, largest first; equal sizes keep discovery order.
pub fn find_cycles(graph: &DependencyGraph) -> CycleReport {
    let digraph = to_petgraph(graph);
    let mut cycles: Vec<Vec<String>> = Tarjan::new(&digraph)
        .run()
        .into_iter()
        .filter(|component| component.len() >= 2)
        .map(|component| {
            component
                .into_iter()
                .map(|node| digraph[node].to_string())
                .collect()
        })
        .collect();
    cycles.sort_by(|a, b| b.len().cmp(&a.len()));

    let files_in_cycles = cycles.iter().flatten().collect::<BTreeSet<_>>().len();
    if !cycles.is_empty() {
        log::debug!("Found {} import cycles over {files_in_cycles} files", cycles.len());
    }

    CycleReport {
        cycle_count: cycles.len(),
        cycles,
        files_in_cycles,
    }
}
