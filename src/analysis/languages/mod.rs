//! Language-specific IR builder implementations.

mod go;

pub use go::GoAnalyzer;

use super::LanguageAnalyzer;
use once_cell::sync::OnceCell;

/// Static storage for the Go analyzer.
static GO_ANALYZER: OnceCell<GoAnalyzer> = OnceCell::new();

/// Register all available language analyzers.
///
/// Idempotent - calling it multiple times is safe.
pub fn register_analyzers() {
    GO_ANALYZER.get_or_init(GoAnalyzer::new);
}

/// Get an analyzer for the given file extension.
///
/// Returns None if no analyzer is registered for the extension.
pub fn get_analyzer(ext: &str) -> Option<&'static dyn LanguageAnalyzer> {
    register_analyzers();

    match ext {
        "go" => GO_ANALYZER.get().map(|a| a as &'static dyn LanguageAnalyzer),
        _ => None,
    }
}

/// Get all registered file extensions.
pub fn registered_extensions() -> Vec<String> {
    vec!["go".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_lookup() {
        let analyzer = get_analyzer("go").expect("Go analyzer should be registered");
        assert_eq!(analyzer.language_id(), "go");
        assert!(analyzer.handles_extension("go"));

        assert!(get_analyzer("java").is_none());
    }
}
