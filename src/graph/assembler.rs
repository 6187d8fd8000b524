//! Call graph assembly and per-entry caller aggregation.
//!
//! The assembler consumes two IR-shaped inputs - API-entry descriptors
//! and the full dependency adjacency set - and produces a DOT graph of
//! caller→callee edges plus a distinct-caller count per entry point.
//!
//! The adjacency map is built once, reversed (callee → callers), before
//! any traversal. Traversal is iterative with a visited set: call graphs
//! in real codebases contain recursion and mutual calls, and the walk
//! must terminate regardless.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::dot::DotGraph;
use super::model::{ApiDescriptor, ClassNode};

/// Per-entry aggregate: how many distinct callers transitively reach the
/// entry point, plus a display label for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiCallCount {
    /// Count of distinct transitive callers.
    pub size: usize,
    /// The entry point's display name.
    pub api_name: String,
    /// Distinct callers in discovery order, joined with ';'. Empty when
    /// nothing reaches the entry.
    pub caller: String,
}

/// Reverse adjacency over the dependency node set.
pub struct CallGraph {
    /// callee identity → caller identities, in input order.
    callers: HashMap<String, Vec<String>>,
    /// Every identity the dependency set knows about, caller or callee.
    identities: HashSet<String>,
}

impl CallGraph {
    /// Build the adjacency map once, before any traversal.
    pub fn from_nodes(nodes: &[ClassNode]) -> Self {
        let mut callers: HashMap<String, Vec<String>> = HashMap::new();
        let mut identities = HashSet::new();

        for node in nodes {
            for method in &node.methods {
                let caller_id = node.method_identity(method);
                identities.insert(caller_id.clone());

                for call in &method.method_calls {
                    let callee_id = call.identity();
                    identities.insert(callee_id.clone());

                    let entry = callers.entry(callee_id).or_default();
                    if !entry.contains(&caller_id) {
                        entry.push(caller_id.clone());
                    }
                }
            }
        }

        Self { callers, identities }
    }

    /// Whether an identity appears anywhere in the dependency set.
    pub fn knows(&self, identity: &str) -> bool {
        self.identities.contains(identity)
    }

    /// Traverse from every API entry and aggregate.
    ///
    /// Returns one shared graph description plus one count per entry, in
    /// the order of the input API list. An entry whose chain matches no
    /// dependency node contributes no edges and a zero count - a normal
    /// outcome, not an error.
    pub fn analyze(&self, apis: &[ApiDescriptor]) -> (DotGraph, Vec<ApiCallCount>) {
        let mut graph = DotGraph::new();
        let mut counts = Vec::with_capacity(apis.len());

        for api in apis {
            let count = self.analyze_entry(api, &mut graph);
            counts.push(count);
        }

        (graph, counts)
    }

    /// Traverse one entry's chain, collecting its distinct callers.
    fn analyze_entry(&self, api: &ApiDescriptor, graph: &mut DotGraph) -> ApiCallCount {
        graph.add_node(&api.name);

        // Seeds that the dependency set knows anchor the entry into the
        // graph; unknown seeds contribute nothing.
        let mut expanded: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        for seed in &api.chain {
            if !self.knows(seed) {
                continue;
            }
            graph.add_edge(seed, &api.name);
            if expanded.insert(seed.clone()) {
                queue.push_back(seed.clone());
            }
        }

        let mut distinct: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        while let Some(callee) = queue.pop_front() {
            let Some(callers) = self.callers.get(&callee) else {
                continue;
            };
            for caller in callers {
                graph.add_edge(caller, &callee);
                if seen.insert(caller.clone()) {
                    distinct.push(caller.clone());
                }
                // The visited set bounds the walk; cycles revisit nothing.
                if expanded.insert(caller.clone()) {
                    queue.push_back(caller.clone());
                }
            }
        }

        ApiCallCount {
            size: distinct.len(),
            api_name: api.name.clone(),
            caller: distinct.join(";"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{MethodCallRef, MethodNode};

    fn node(class: &str, methods: &[(&str, &[(&str, &str)])]) -> ClassNode {
        ClassNode {
            package: String::new(),
            class: class.to_string(),
            methods: methods
                .iter()
                .map(|(name, calls)| MethodNode {
                    name: name.to_string(),
                    method_calls: calls
                        .iter()
                        .map(|(c, m)| MethodCallRef {
                            package: String::new(),
                            class: c.to_string(),
                            method_name: m.to_string(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn api(name: &str, chain: &[&str]) -> ApiDescriptor {
        ApiDescriptor {
            name: name.to_string(),
            chain: chain.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_direct_and_transitive_callers() {
        // Controller.index -> Service.list -> Repo.all
        let nodes = vec![
            node("Controller", &[("index", &[("Service", "list")])]),
            node("Service", &[("list", &[("Repo", "all")])]),
            node("Repo", &[("all", &[])]),
        ];

        let graph = CallGraph::from_nodes(&nodes);
        let apis = vec![api("GET /items", &["Repo.all"])];
        let (dot, counts) = graph.analyze(&apis);

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].size, 2);
        assert_eq!(counts[0].api_name, "GET /items");
        assert_eq!(counts[0].caller, "Service.list;Controller.index");

        let rendered = dot.render(None);
        assert!(rendered.contains("\"Repo.all\" -> \"GET /items\";"));
        assert!(rendered.contains("\"Service.list\" -> \"Repo.all\";"));
        assert!(rendered.contains("\"Controller.index\" -> \"Service.list\";"));
    }

    #[test]
    fn test_cycle_terminates_and_counts_once() {
        // A.run calls B.run, B.run calls A.run.
        let nodes = vec![
            node("A", &[("run", &[("B", "run")])]),
            node("B", &[("run", &[("A", "run")])]),
        ];

        let graph = CallGraph::from_nodes(&nodes);
        let apis = vec![api("GET /loop", &["B.run"])];
        let (_, counts) = graph.analyze(&apis);

        // Each cycle member is a distinct caller exactly once.
        assert_eq!(counts[0].size, 2);
        assert_eq!(counts[0].caller, "A.run;B.run");
    }

    #[test]
    fn test_zero_match_is_normal() {
        let nodes = vec![node("Other", &[("run", &[])])];
        let graph = CallGraph::from_nodes(&nodes);

        let apis = vec![api("GetUser", &["Service.Create"])];
        let (dot, counts) = graph.analyze(&apis);

        assert_eq!(
            counts[0],
            ApiCallCount {
                size: 0,
                api_name: "GetUser".to_string(),
                caller: String::new(),
            }
        );
        // The entry still appears as a node, with no edge contribution.
        assert_eq!(dot.edge_count(), 0);
        assert!(dot.render(None).contains("\"GetUser\";"));
    }

    #[test]
    fn test_report_follows_input_order() {
        let nodes = vec![
            node("Busy", &[("run", &[("Hot", "spot")])]),
            node("Hot", &[("spot", &[])]),
        ];
        let graph = CallGraph::from_nodes(&nodes);

        // The low-count entry comes first in the input and must stay first.
        let apis = vec![api("GET /quiet", &["Nowhere.at"]), api("GET /hot", &["Hot.spot"])];
        let (_, counts) = graph.analyze(&apis);

        assert_eq!(counts[0].api_name, "GET /quiet");
        assert_eq!(counts[0].size, 0);
        assert_eq!(counts[1].api_name, "GET /hot");
        assert_eq!(counts[1].size, 1);
    }

    #[test]
    fn test_shared_caller_counted_once() {
        // Two paths into the entry through the same caller.
        let nodes = vec![
            node("Front", &[("a", &[("Mid", "x")]), ("b", &[("Mid", "x")])]),
            node("Mid", &[("x", &[("Deep", "end")])]),
        ];
        let graph = CallGraph::from_nodes(&nodes);

        let (_, counts) = graph.analyze(&[api("GET /deep", &["Deep.end"])]);
        assert_eq!(counts[0].size, 3);
        assert_eq!(counts[0].caller, "Mid.x;Front.a;Front.b");
    }
}
