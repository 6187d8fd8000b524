//! Core traits for language analysis.

use std::path::Path;

use crate::ir::CodeFile;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// Kept separate from the IR so a tree can feed multiple extraction
/// passes without re-parsing.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Language-specific IR builder trait.
///
/// Each language implements this trait to translate its syntax trees into
/// the language-neutral IR.
///
/// # Thread Safety
///
/// Note: tree_sitter::Parser is not Sync, so implementations should
/// create parsers as needed rather than holding one.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "go").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse a source file into a tree-sitter tree.
    ///
    /// Returns an error if parsing fails completely. Partial parse errors
    /// are still returned as a valid tree with ERROR nodes.
    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile>;

    /// Build the IR for a parsed file.
    ///
    /// Unsupported syntax shapes degrade precision (empty-typed slots plus
    /// a diagnostic on the returned file); they never abort the build.
    fn build_ir(&self, parsed: &ParsedFile) -> anyhow::Result<CodeFile>;

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}
