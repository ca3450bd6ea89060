//! `compdb check`: compares the database files with the project files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::filelist::{display_relative, list_files};
use crate::session::Project;
use crate::{CheckArgs, GlobalArgs};

/// The two sides of the comparison.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Files the databases know but the scan did not find. Advisory only:
    /// system headers and generated files legitimately end up here.
    pub db_only: BTreeSet<PathBuf>,
    /// Scanned files that no database knows, minus suppressions.
    pub project_only: BTreeSet<PathBuf>,
}

impl CheckReport {
    /// Whether every project file is covered.
    pub fn is_ok(&self) -> bool {
        self.project_only.is_empty()
    }
}

/// Compares the database files with the scanned project files.
pub fn compare(
    db_files: impl IntoIterator<Item = PathBuf>,
    project_files: impl IntoIterator<Item = PathBuf>,
    suppressions: &GlobSet,
) -> CheckReport {
    let db_files: BTreeSet<PathBuf> = db_files.into_iter().collect();
    let project_files: BTreeSet<PathBuf> = project_files.into_iter().collect();
    let db_only = db_files.difference(&project_files).cloned().collect();
    let project_only = project_files
        .difference(&db_files)
        .filter(|f| !suppressions.is_match(f))
        .cloned()
        .collect();
    CheckReport {
        db_only,
        project_only,
    }
}

/// Compiles suppression patterns. Each pattern matches the end of a path:
/// `foo/*.h` suppresses `/src/foo/a.h` and `/src/lib/foo/sub/b.h`.
pub fn build_suppressions<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(&format!("*/{}", pattern.as_ref()))?);
    }
    builder.build()
}

/// Reads suppression patterns: one per line, `#` starts a comment.
pub fn parse_suppressions(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim_end())
        .filter(|pattern| !pattern.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a suppression file.
pub fn read_suppressions_file(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(parse_suppressions(&text))
}

fn print_summary(files: &BTreeSet<PathBuf>, name: &str, cwd: &Path) {
    println!("Only in {name}:");
    for path in files {
        println!("  {}", display_relative(path, cwd).display());
    }
}

/// Runs `compdb check`.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut patterns = args.suppress.clone();
    for file in &args.suppressions {
        patterns.extend(read_suppressions_file(file)?);
    }
    let suppressions = build_suppressions(&patterns)?;

    let config = global.load_config()?;
    let project = Project::open(&config, true)?;
    let db_files: Vec<PathBuf> = project.all_files(true)?.collect();
    let project_files = list_files(&args.groups, &args.paths)?;
    tracing::debug!(
        "comparing {} database entries with {} project files",
        db_files.len(),
        project_files.len()
    );

    let report = compare(db_files, project_files, &suppressions);
    if !report.db_only.is_empty() {
        print_summary(&report.db_only, "compilation database(s)", &global.cwd);
    }
    if report.is_ok() {
        return Ok(0);
    }
    print_summary(&report.project_only, "project(s)", &global.cwd);
    eprintln!("error: some files are missing from the compilation database(s)");
    Ok(1)
}
