//! Syntax-tree-to-IR building.
//!
//! This module turns language-specific syntax trees into the
//! language-neutral IR (`crate::ir`):
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Source Files │────▶│ Analyzers    │────▶│ CodeFile IR  │
//! └──────────────┘     │ (Go, ...)    │     │ (functions,  │
//!                      └──────────────┘     │  calls, ...) │
//!                             │             └──────────────┘
//!                             ▼
//!                      ┌──────────────┐
//!                      │ Scope        │  locals → fields → imports
//!                      │ Resolver     │
//!                      └──────────────┘
//! ```
//!
//! Each file's builder run is independent; the batch driver fans out
//! over rayon and collects results, sorted by path for determinism.
//!
//! # Adding a New Language
//!
//! Implement `LanguageAnalyzer` in `src/analysis/languages/` and register
//! it in `languages/mod.rs`. See `languages/go.rs` for the reference
//! implementation.

mod languages;
pub mod scope;
mod traits;

pub use languages::{get_analyzer, register_analyzers, registered_extensions, GoAnalyzer};
pub use scope::{LocalBinding, LocalBindings, PackageInference, SuffixMatchInference};
pub use traits::{LanguageAnalyzer, ParsedFile};

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::ir::CodeFile;

/// Build IR for one file, dispatching on its extension.
///
/// Returns None for files no registered analyzer handles.
pub fn build_file(path: &Path) -> anyhow::Result<Option<CodeFile>> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let analyzer = match get_analyzer(ext) {
        Some(a) => a,
        None => return Ok(None),
    };

    let source = fs::read(path)?;
    let parsed = analyzer.parse(path, &source)?;
    let file = analyzer.build_ir(&parsed)?;
    Ok(Some(file))
}

/// Build IR for many files in parallel.
///
/// File passes share no mutable state, so they fan out over rayon and
/// only the collection step is sequential. Per-file failures are logged
/// and skipped; a single unreadable file never sinks the batch. Results
/// are paired with their paths and sorted by path for deterministic
/// output.
pub fn build_files(paths: &[PathBuf]) -> Vec<(PathBuf, CodeFile)> {
    let mut results: Vec<_> = paths
        .par_iter()
        .filter_map(|path| match build_file(path) {
            Ok(Some(file)) => Some((path.clone(), file)),
            Ok(None) => None,
            Err(e) => {
                eprintln!("Warning: failed to analyze {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_files_parallel() {
        let temp = TempDir::new().unwrap();

        let a = temp.path().join("a.go");
        fs::write(&a, "package main\nfunc a() { helper() }").unwrap();

        let b = temp.path().join("b.go");
        fs::write(&b, "package main\nfunc b() {}").unwrap();

        let skipped = temp.path().join("notes.txt");
        fs::write(&skipped, "not source").unwrap();

        let files = build_files(&[b.clone(), a.clone(), skipped]);

        assert_eq!(files.len(), 2);
        // Sorted by path regardless of input order.
        assert_eq!(files[0].0, a);
        assert_eq!(files[1].0, b);
        assert_eq!(files[0].1.functions[0].name, "a");
    }
}
