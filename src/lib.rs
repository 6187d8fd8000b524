//! Callmap - static-analysis call graph engine.
//!
//! Callmap turns source-code syntax trees into a unified,
//! language-neutral intermediate representation (IR), then builds a call
//! graph over that IR to answer reachability questions: which call chains
//! ultimately invoke a REST endpoint, and how many distinct callers does
//! it have. The graph description feeds Graphviz for visualization.
//!
//! # Architecture
//!
//! - `ir`: the typed property model every other module shares
//! - `analysis`: tree-sitter IR builders plus the scope resolver
//! - `graph`: the call graph assembler and DOT rendering
//! - `report`: console output formatting
//!
//! # Adding a New Language
//!
//! See `src/analysis/languages/` - implement `LanguageAnalyzer` and
//! register it in `languages/mod.rs`.

pub mod analysis;
pub mod cli;
pub mod graph;
pub mod ir;
pub mod report;

pub use analysis::{GoAnalyzer, LanguageAnalyzer, ParsedFile};
pub use graph::{ApiCallCount, ApiDescriptor, CallGraph, ClassNode, DotGraph};
pub use ir::{CodeCall, CodeFile, CodeFunction, CodeImport, CodeProperty};

/// Initialize all subsystems.
///
/// Call this once at startup.
pub fn init() {
    analysis::register_analyzers();
}
