//! Command-line interface for callmap.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;
use walkdir::WalkDir;

use crate::analysis;
use crate::graph::{self, CallGraph, ClassNode};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Static-analysis call graph engine.
///
/// Callmap normalizes source syntax trees into a language-neutral IR,
/// assembles a call graph over it, and reports which call chains reach
/// each REST endpoint and how many distinct callers each one has.
#[derive(Parser)]
#[command(name = "callmap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build IR for a source tree and write it as JSON
    Scan(ScanArgs),
    /// Assemble the API call graph from scan outputs
    Api(ApiArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,

    /// Output file for the merged IR
    #[arg(short, long, default_value = "ir.json")]
    pub output: PathBuf,

    /// Also write a dependency adjacency file derived from the IR
    #[arg(long)]
    pub deps_out: Option<PathBuf>,

    /// Print builder diagnostics (unsupported shapes) to stderr
    #[arg(long)]
    pub verbose: bool,
}

/// Arguments for the api command.
#[derive(Parser)]
pub struct ApiArgs {
    /// API-entry descriptor file (REST scan output)
    #[arg(short, long)]
    pub apis: PathBuf,

    /// Dependency adjacency file
    #[arg(short, long)]
    pub dependence: PathBuf,

    /// Strip this substring from all labels (display only)
    #[arg(short, long, default_value = "")]
    pub remove: String,

    /// Print the per-entry caller count table
    #[arg(short, long)]
    pub count: bool,

    /// Output file for the graph description
    #[arg(short, long, default_value = "api.dot")]
    pub output: PathBuf,

    /// Rasterize the graph description with Graphviz (`dot -Tsvg`)
    #[arg(long)]
    pub svg: bool,
}

/// Collect source files to scan.
fn collect_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let extensions = analysis::registered_extensions();
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            if e.file_type().is_dir()
                && (name == "vendor" || name == "node_modules" || name == "testdata")
            {
                return false;
            }
            true
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

            if extensions.iter().any(|e| e == ext) {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                if name.ends_with("_test.go") {
                    continue;
                }
                files.push(path.to_path_buf());
            }
        }
    }

    Ok(files)
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    analysis::register_analyzers();

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let paths = if metadata.is_dir() {
        collect_files(&args.path)?
    } else {
        vec![args.path.clone()]
    };

    if paths.is_empty() {
        eprintln!("Warning: no files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let files = analysis::build_files(&paths);

    if args.verbose {
        report::write_diagnostics(&files);
    }
    report::write_scan_summary(&files);

    let ir: Vec<_> = files.iter().map(|(_, f)| f).collect();
    std::fs::write(&args.output, serde_json::to_string_pretty(&ir)?)?;
    println!("Wrote {}", args.output.display());

    if let Some(deps_out) = &args.deps_out {
        let nodes = ClassNode::from_code_files(files.iter().map(|(_, f)| f));
        std::fs::write(deps_out, serde_json::to_string_pretty(&nodes)?)?;
        println!("Wrote {}", deps_out.display());
    }

    Ok(EXIT_SUCCESS)
}

/// Run the api command.
pub fn run_api(args: &ApiArgs) -> anyhow::Result<i32> {
    let apis = match graph::load_descriptors(&args.apis) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Round-tripped, pretty-printed snapshot of the API scan for the
    // surrounding tooling.
    std::fs::write("apis.json", serde_json::to_string_pretty(&apis)?)?;

    // The dependency set is the one input the run cannot proceed without.
    let nodes = match graph::load_class_nodes(&args.dependence) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let call_graph = CallGraph::from_nodes(&nodes);
    let (dot, counts) = call_graph.analyze(&apis);

    if args.count {
        report::write_count_table(&counts, &args.remove);
    }

    let strip = if args.remove.is_empty() {
        None
    } else {
        Some(args.remove.as_str())
    };
    std::fs::write(&args.output, dot.render(strip))?;
    println!("Wrote {}", args.output.display());

    if args.svg {
        return rasterize(&args.output);
    }

    Ok(EXIT_SUCCESS)
}

/// Invoke Graphviz on an already-written graph description.
///
/// A rendering failure is fatal at this boundary, but the description
/// file itself is left intact.
fn rasterize(dot_path: &Path) -> anyhow::Result<i32> {
    let svg_path = dot_path.with_extension("svg");

    let output = ProcessCommand::new("dot")
        .arg("-Tsvg")
        .arg(dot_path)
        .arg("-o")
        .arg(&svg_path)
        .output();

    match output {
        Ok(out) if out.status.success() => {
            println!("Wrote {}", svg_path.display());
            Ok(EXIT_SUCCESS)
        }
        Ok(out) => {
            eprintln!(
                "Error: dot failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            );
            Ok(EXIT_ERROR)
        }
        Err(e) => {
            eprintln!("Error: cannot invoke dot: {}", e);
            Ok(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_filters() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.go"), "package main").unwrap();
        fs::write(temp.path().join("main_test.go"), "package main").unwrap();
        fs::write(temp.path().join("readme.md"), "docs").unwrap();

        let vendor = temp.path().join("vendor");
        fs::create_dir(&vendor).unwrap();
        fs::write(vendor.join("dep.go"), "package dep").unwrap();

        analysis::register_analyzers();
        let files = collect_files(temp.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.go"));
    }
}
