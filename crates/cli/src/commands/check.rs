//! Check command
//!
//! Loads every schema file under the given paths and runs the structural
//! checks. Warnings are printed but do not fail the check.

use crate::output;
use civic_core::Validatable;
use civic_forms::load_schema;
use clap::Args;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args)]
pub struct CheckArgs {
    /// Schema files or directories containing them
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Result of checking one schema file
#[derive(Debug)]
pub struct FileCheck {
    pub path: PathBuf,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl FileCheck {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Whether a path looks like a schema file
fn is_schema_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("toml")
    )
}

/// Expand directories into the schema files they contain, sorted
pub fn collect_schema_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file() && is_schema_file(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Check one schema file
pub fn check_file(path: &Path) -> FileCheck {
    match load_schema(path) {
        Ok(schema) => FileCheck {
            path: path.to_path_buf(),
            errors: schema.validation_errors(),
            warnings: schema.warnings(),
        },
        Err(e) => FileCheck {
            path: path.to_path_buf(),
            errors: vec![e.to_string()],
            warnings: Vec::new(),
        },
    }
}

/// Check every schema file under `paths`
pub fn run(paths: &[PathBuf]) -> Vec<FileCheck> {
    collect_schema_files(paths)
        .iter()
        .map(|path| check_file(path))
        .collect()
}

pub fn execute(args: CheckArgs) -> anyhow::Result<()> {
    let results = run(&args.paths);
    if results.is_empty() {
        anyhow::bail!("No schema files found");
    }

    for result in &results {
        let shown = result.path.display().to_string();
        if result.passed() {
            output::success(&shown);
        } else {
            output::error(&shown);
            for error in &result.errors {
                eprintln!("    {}", error);
            }
        }
        for warning in &result.warnings {
            output::warning(&format!("{}: {}", shown, warning));
        }
    }

    let failed = results.iter().filter(|r| !r.passed()).count();
    tracing::info!(files = results.len(), failed, "checked schema files");
    if failed > 0 {
        anyhow::bail!("{} of {} schema files failed", failed, results.len());
    }
    output::info(&format!("{} schema files checked", results.len()));
    Ok(())
}
