//! DOT graph description rendering.
//!
//! Produces the textual node/edge format consumed by Graphviz. Node and
//! edge statements are emitted in insertion order (deduplicated), so the
//! description is deterministic for a given traversal.

use std::collections::HashSet;
use std::fmt::Write;

/// An accumulating DOT digraph.
#[derive(Debug, Default)]
pub struct DotGraph {
    nodes: Vec<String>,
    edges: Vec<(String, String)>,
    seen_nodes: HashSet<String>,
    seen_edges: HashSet<(String, String)>,
}

impl DotGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit node statement. Nodes implied by edges do not need
    /// one; this is for anchors that may have no edges at all.
    pub fn add_node(&mut self, label: &str) {
        if self.seen_nodes.insert(label.to_string()) {
            self.nodes.push(label.to_string());
        }
    }

    /// Add a caller→callee edge.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let key = (from.to_string(), to.to_string());
        if self.seen_edges.insert(key.clone()) {
            self.edges.push(key);
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Render the graph description.
    ///
    /// When `strip` is given, the substring is removed from every label
    /// before emission - display brevity only, typically a common package
    /// root.
    pub fn render(&self, strip: Option<&str>) -> String {
        let clean = |label: &str| -> String {
            let label = match strip {
                Some(s) if !s.is_empty() => label.replace(s, ""),
                _ => label.to_string(),
            };
            label.replace('"', "\\\"")
        };

        let mut out = String::from("digraph G {\n");
        for node in &self.nodes {
            let _ = writeln!(out, "  \"{}\";", clean(node));
        }
        for (from, to) in &self.edges {
            let _ = writeln!(out, "  \"{}\" -> \"{}\";", clean(from), clean(to));
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nodes_and_edges() {
        let mut graph = DotGraph::new();
        graph.add_node("GET /users");
        graph.add_edge("UserService.list", "GET /users");
        graph.add_edge("UserController.index", "UserService.list");

        let dot = graph.render(None);
        assert!(dot.starts_with("digraph G {"));
        assert!(dot.contains("  \"GET /users\";"));
        assert!(dot.contains("\"UserService.list\" -> \"GET /users\";"));
        assert!(dot.contains("\"UserController.index\" -> \"UserService.list\";"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_duplicate_edges_folded() {
        let mut graph = DotGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("a", "b");
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_strip_filter() {
        let mut graph = DotGraph::new();
        graph.add_edge("com.acme.app.UserService.list", "com.acme.app.api.users");

        let dot = graph.render(Some("com.acme.app."));
        assert!(dot.contains("\"UserService.list\" -> \"api.users\";"));
        assert!(!dot.contains("com.acme"));
    }
}
