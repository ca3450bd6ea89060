//! Expansion of build directory glob patterns.

use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use walkdir::WalkDir;

use crate::error::{DbError, DbResult};

fn has_glob_meta(s: &str) -> bool {
    s.contains(['*', '?', '[', '{'])
}

/// Expands `pattern` to the directories it matches, sorted.
///
/// Only directories are returned; a trailing separator on the pattern is
/// accepted. A pattern without glob metacharacters matches itself if it is
/// a directory. Wildcards never cross a path separator, and a wildcard
/// component only matches hidden entries when it starts with a dot.
pub fn expand_directory_pattern(pattern: &str) -> DbResult<Vec<PathBuf>> {
    let trimmed = pattern.trim_end_matches(['/', std::path::MAIN_SEPARATOR]);
    let trimmed = if trimmed.is_empty() { pattern } else { trimmed };

    if !has_glob_meta(trimmed) {
        let path = PathBuf::from(trimmed);
        return Ok(if path.is_dir() { vec![path] } else { Vec::new() });
    }

    // Results keep the pattern's form, so a relative pattern starts empty.
    let mut candidates = vec![PathBuf::new()];
    for component in Path::new(trimmed).components() {
        let name = component.as_os_str().to_string_lossy();
        candidates = match component {
            Component::Normal(_) if has_glob_meta(&name) => {
                let matcher = component_matcher(&name, pattern)?;
                let hidden_ok = name.starts_with('.');
                let mut next = Vec::new();
                for dir in &candidates {
                    next.extend(matching_children(dir, &matcher, hidden_ok));
                }
                next
            }
            _ => candidates
                .into_iter()
                .map(|dir| dir.join(component.as_os_str()))
                .filter(|dir| on_disk(dir).is_dir())
                .collect(),
        };
        if candidates.is_empty() {
            break;
        }
    }
    candidates.sort();
    candidates.dedup();
    Ok(candidates)
}

fn component_matcher(component: &str, pattern: &str) -> DbResult<GlobMatcher> {
    GlobBuilder::new(component)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| DbError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// The directory to read for a result path; the empty path is `.`.
fn on_disk(path: &Path) -> &Path {
    if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    }
}

/// The subdirectories of `dir` whose name matches, joined onto `dir`.
fn matching_children(dir: &Path, matcher: &GlobMatcher, hidden_ok: bool) -> Vec<PathBuf> {
    WalkDir::new(on_disk(dir))
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| hidden_ok || !e.file_name().to_string_lossy().starts_with('.'))
        .filter(|e| e.path().is_dir() && matcher.is_match(e.file_name()))
        .map(|e| dir.join(e.file_name()))
        .collect()
}
