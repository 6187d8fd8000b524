//! Integration tests for the call graph assembler pipeline.
//!
//! These run the assembler against the JSON fixtures the external scans
//! would produce, and check the graph description and count output.

use std::path::Path;

use callmap::graph::{self, ApiCallCount, CallGraph, ClassNode, InputError};
use callmap::report;

fn load_fixture() -> (Vec<graph::ApiDescriptor>, Vec<ClassNode>) {
    let apis = graph::load_descriptors(Path::new("testdata/apis.json")).unwrap();
    let deps = graph::load_class_nodes(Path::new("testdata/deps.json")).unwrap();
    (apis, deps)
}

#[test]
fn test_api_round_trip() {
    let (apis, _) = load_fixture();

    let json = serde_json::to_string_pretty(&apis).unwrap();
    let back: Vec<graph::ApiDescriptor> = serde_json::from_str(&json).unwrap();
    assert_eq!(apis, back);
}

#[test]
fn test_fixture_counts() {
    let (apis, deps) = load_fixture();

    let call_graph = CallGraph::from_nodes(&deps);
    let (_, counts) = call_graph.analyze(&apis);

    // Order follows the input API list, never re-sorted by count.
    assert_eq!(counts.len(), 3);

    // GET /users: Router.dispatch calls the chain head, Scheduler.tick
    // calls Router.dispatch.
    assert_eq!(counts[0].api_name, "GET /users");
    assert_eq!(counts[0].size, 2);
    assert_eq!(counts[0].caller, "Router.dispatch;Scheduler.tick");

    assert_eq!(counts[1].api_name, "POST /users");
    assert_eq!(counts[1].size, 2);

    // An entry whose chain matches nothing is a normal zero, not an error.
    assert_eq!(
        counts[2],
        ApiCallCount {
            size: 0,
            api_name: "GET /health".to_string(),
            caller: String::new(),
        }
    );
}

#[test]
fn test_fixture_graph_description() {
    let (apis, deps) = load_fixture();

    let call_graph = CallGraph::from_nodes(&deps);
    let (dot, _) = call_graph.analyze(&apis);
    let rendered = dot.render(None);

    assert!(rendered.contains("\"UserController.list\" -> \"GET /users\";"));
    assert!(rendered.contains("\"Router.dispatch\" -> \"UserController.list\";"));
    assert!(rendered.contains("\"Scheduler.tick\" -> \"Router.dispatch\";"));
    // The zero-match entry still appears as a node.
    assert!(rendered.contains("\"GET /health\";"));
    assert!(!rendered.contains("Missing.handler"));
}

#[test]
fn test_label_strip_is_display_only() {
    let (apis, deps) = load_fixture();

    let call_graph = CallGraph::from_nodes(&deps);
    let (dot, counts) = call_graph.analyze(&apis);

    let rendered = dot.render(Some("User"));
    assert!(rendered.contains("\"Controller.list\" -> \"GET /users\";"));

    // Counts are unaffected by the display filter.
    assert_eq!(counts[0].size, 2);
    let table = report::render_count_table(&counts, "Router.");
    assert!(table.contains("dispatch;Scheduler.tick"));
}

#[test]
fn test_missing_dependence_file_is_fatal() {
    let err = graph::load_class_nodes(Path::new("testdata/nope.json")).unwrap_err();
    match err {
        InputError::Missing(path) => assert!(path.contains("nope.json")),
        other => panic!("expected Missing, got {:?}", other),
    }
}

#[test]
fn test_scan_output_feeds_assembler() {
    // End-to-end: build IR from source, fold it into adjacency nodes,
    // and traverse.
    use callmap::analysis::LanguageAnalyzer;
    use callmap::GoAnalyzer;

    let source = br#"
package app

type Handler struct {
    svc Service
}

func (h *Handler) Get() {
    h.svc.Fetch()
}
"#;

    let analyzer = GoAnalyzer::new();
    let parsed = analyzer.parse(Path::new("app.go"), source).unwrap();
    let file = analyzer.build_ir(&parsed).unwrap();

    let nodes = ClassNode::from_code_files([&file]);
    let call_graph = CallGraph::from_nodes(&nodes);

    let apis = vec![graph::ApiDescriptor {
        name: "GET /fetch".to_string(),
        chain: vec!["Service.Fetch".to_string()],
    }];
    let (_, counts) = call_graph.analyze(&apis);

    assert_eq!(counts[0].size, 1);
    assert_eq!(counts[0].caller, "app.Get");
}
