//! Call graph assembly over merged IR fragments.
//!
//! Consumes the REST-API scan (entry descriptors) and the full dependency
//! scan (class/method adjacency nodes), builds a directed caller→callee
//! graph, aggregates per-entry caller counts, and renders a DOT graph
//! description for Graphviz.

mod assembler;
mod dot;
mod model;

pub use assembler::{ApiCallCount, CallGraph};
pub use dot::DotGraph;
pub use model::{
    load_class_nodes, load_descriptors, ApiDescriptor, ClassNode, InputError, MethodCallRef,
    MethodNode,
};
