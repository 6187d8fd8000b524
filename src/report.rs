//! Console output formatting.
//!
//! The count table mirrors the `(Size, API, Caller)` layout of the
//! original tooling; the scan summary is a short human-readable recap of
//! an IR build.

use colored::*;

use crate::graph::ApiCallCount;
use crate::ir::CodeFile;

/// Render the per-entry count table.
///
/// Rows follow the input API order. `remove` strips a caller-supplied
/// prefix from the caller labels, display brevity only.
pub fn render_count_table(counts: &[ApiCallCount], remove: &str) -> String {
    let rows: Vec<(String, String, String)> = counts
        .iter()
        .map(|c| {
            let caller = if remove.is_empty() {
                c.caller.clone()
            } else {
                c.caller.replace(remove, "")
            };
            (c.size.to_string(), c.api_name.clone(), caller)
        })
        .collect();

    let size_width = rows
        .iter()
        .map(|r| r.0.len())
        .chain(["SIZE".len()].into_iter())
        .max()
        .unwrap_or(4);
    let api_width = rows
        .iter()
        .map(|r| r.1.len())
        .chain(["API".len()].into_iter())
        .max()
        .unwrap_or(3);

    let mut out = String::new();
    out.push_str(&format!(
        "{:>size$}  {:<api$}  {}\n",
        "SIZE",
        "API",
        "CALLER",
        size = size_width,
        api = api_width,
    ));
    for (size, api, caller) in &rows {
        out.push_str(&format!(
            "{:>size$}  {:<api$}  {}\n",
            size,
            api,
            caller,
            size = size_width,
            api = api_width,
        ));
    }
    out
}

/// Print the count table with a colored header line.
pub fn write_count_table(counts: &[ApiCallCount], remove: &str) {
    println!("{}", "API caller counts".bold());
    print!("{}", render_count_table(counts, remove));
}

/// Print a one-screen summary of an IR build.
pub fn write_scan_summary(files: &[(std::path::PathBuf, CodeFile)]) {
    let functions: usize = files.iter().map(|(_, f)| f.functions.len()).sum();
    let calls: usize = files
        .iter()
        .flat_map(|(_, f)| &f.functions)
        .map(|f| f.function_calls.len())
        .sum();
    let diagnostics: usize = files.iter().map(|(_, f)| f.diagnostics.len()).sum();

    println!(
        "Scanned {} files: {} functions, {} calls",
        files.len().to_string().bold(),
        functions,
        calls
    );
    if diagnostics > 0 {
        println!(
            "{} {} unsupported shapes degraded to unknown types",
            "note:".yellow(),
            diagnostics
        );
    }
}

/// Print builder diagnostics to stderr, one per line.
pub fn write_diagnostics(files: &[(std::path::PathBuf, CodeFile)]) {
    for (path, file) in files {
        for diagnostic in &file.diagnostics {
            eprintln!("{}: {}", path.display(), diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_table_layout() {
        let counts = vec![
            ApiCallCount {
                size: 12,
                api_name: "GET /users".to_string(),
                caller: "com.acme.UserService.list".to_string(),
            },
            ApiCallCount {
                size: 0,
                api_name: "POST /users".to_string(),
                caller: String::new(),
            },
        ];

        let table = render_count_table(&counts, "");
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("SIZE"));
        assert!(lines[1].contains("12"));
        assert!(lines[1].contains("com.acme.UserService.list"));
        assert!(lines[2].contains("POST /users"));
    }

    #[test]
    fn test_count_table_strips_prefix() {
        let counts = vec![ApiCallCount {
            size: 1,
            api_name: "GET /users".to_string(),
            caller: "com.acme.UserService.list".to_string(),
        }];

        let table = render_count_table(&counts, "com.acme.");
        assert!(table.contains("UserService.list"));
        assert!(!table.contains("com.acme"));
    }
}
