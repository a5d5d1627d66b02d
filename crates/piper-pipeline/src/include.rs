//! Include graph of piper files using `petgraph`.
//!
//! Every file interpreted during a run is a node; every successful `load`
//! adds an edge from the including file to the included one. Load cycles are
//! rejected before an edge is recorded, so the graph stays acyclic.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::NodeIndex;

/// Which piper files included which.
#[derive(Debug, Default)]
pub struct IncludeGraph {
    graph: petgraph::Graph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl IncludeGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, file: &str) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(file) {
            return idx;
        }
        let idx = self.graph.add_node(file.to_string());
        let _ = self.nodes.insert(file.to_string(), idx);
        idx
    }

    /// Records a file loaded at top level.
    pub fn record_root(&mut self, file: &str) {
        let _ = self.node(file);
    }

    /// Records that `parent` loaded `child`.
    ///
    /// Repeated loads of the same pair keep a single edge.
    pub fn record_include(&mut self, parent: &str, child: &str) {
        let parent = self.node(parent);
        let child = self.node(child);
        if self.graph.find_edge(parent, child).is_none() {
            let _ = self.graph.add_edge(parent, child, ());
        }
    }

    /// Files directly loaded by `file`, in load order.
    pub fn includes_of(&self, file: &str) -> Vec<&str> {
        let Some(&idx) = self.nodes.get(file) else {
            return Vec::new();
        };
        // petgraph walks the most recently added edge first.
        let mut children: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).map(String::as_str))
            .collect();
        children.reverse();
        children
    }

    /// Files that no other file loaded, in first-seen order.
    pub fn roots(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .filter_map(|idx| self.graph.node_weight(idx).map(String::as_str))
            .collect()
    }

    /// Number of distinct files seen.
    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether no file has been recorded.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Renders the graph as indented lines, one per file occurrence.
    ///
    /// A file included from several parents appears under each of them.
    pub fn tree_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for root in self.roots() {
            self.push_tree(root, 0, &mut lines);
        }
        lines
    }

    fn push_tree(&self, file: &str, depth: usize, lines: &mut Vec<String>) {
        lines.push(format!("{}{file}", "  ".repeat(depth)));
        for child in self.includes_of(file) {
            self.push_tree(child, depth + 1, lines);
        }
    }
}
