//! Lexical path manipulation.
//!
//! None of these functions resolve symlinks: `a/b/../c` becomes `a/c` even
//! if `a/b` is a link. This matches how build systems write paths into a
//! compilation database and keeps results stable whether or not the files
//! exist.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path.
///
/// Removes `.` components, folds `name/..` pairs, and drops `..` directly
/// under the root. Leading `..` components of a relative path are kept.
/// An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut prefix: Option<OsString> = None;
    let mut has_root = false;
    let mut parts: Vec<OsString> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => prefix = Some(p.as_os_str().to_os_string()),
            Component::RootDir => has_root = true,
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(last) if last != ".." => {
                    parts.pop();
                }
                _ if has_root => {}
                _ => parts.push(OsString::from("..")),
            },
            Component::Normal(name) => parts.push(name.to_os_string()),
        }
    }

    let mut out = PathBuf::new();
    if let Some(prefix) = prefix {
        out.push(prefix);
    }
    if has_root {
        out.push(Component::RootDir.as_os_str());
    }
    for part in parts {
        out.push(part);
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Joins `file` onto `directory` and normalizes the result.
///
/// An absolute `file` replaces `directory` entirely. This is the identity
/// key of a compile command.
pub fn join_normalized(directory: &Path, file: &Path) -> PathBuf {
    normalize(&directory.join(file))
}

/// Makes a path absolute against the process working directory, then
/// normalizes it.
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}

/// Same as [`absolute`], but prefers the logical working directory.
///
/// Shells track the directory the user `cd`-ed into in `$PWD`, which may go
/// through symlinks that [`std::env::current_dir`] has already resolved.
/// `$PWD` is only trusted when it names the same directory as `.`.
pub fn logical_abspath(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    if let Some(pwd) = std::env::var_os("PWD").map(PathBuf::from) {
        if pwd.is_absolute() && same_directory(&pwd, Path::new(".")) {
            return normalize(&pwd.join(path));
        }
    }
    absolute(path)
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Expresses `path` relative to `base`.
///
/// Both paths are made absolute first. Returns `.` when they are equal.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = absolute(path);
    let base = absolute(base);

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base_parts.len() {
        out.push("..");
    }
    for part in &path_parts[common..] {
        out.push(part.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Returns a path suitable for messages.
///
/// Paths at most one level above the working directory are shown relative,
/// anything further away stays absolute.
pub fn friendly_path(path: &Path) -> PathBuf {
    let full = absolute(path);
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => return full,
    };
    let rel = relative_to(&full, &cwd);
    if rel.starts_with(Path::new("..").join("..")) {
        full
    } else {
        rel
    }
}

/// Walks up from `start` looking for the nearest directory containing `name`.
pub fn locate_dominating_file(name: &str, start: &Path) -> Option<PathBuf> {
    let start = absolute(start);
    start
        .ancestors()
        .find(|dir| dir.join(name).exists())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_removes_cur_dir() {
        assert_eq!(normalize(Path::new("/tmp/./a.cpp")), PathBuf::from("/tmp/a.cpp"));
        assert_eq!(normalize(Path::new("./a/./b")), PathBuf::from("a/b"));
    }

    #[test]
    fn normalize_folds_parent_dir() {
        assert_eq!(
            normalize(Path::new("/tmp/build/../src/a.cpp")),
            PathBuf::from("/tmp/src/a.cpp")
        );
        assert_eq!(normalize(Path::new("a/b/../../c")), PathBuf::from("c"));
    }

    #[test]
    fn normalize_keeps_leading_parent_dir_of_relative_path() {
        assert_eq!(normalize(Path::new("../a/../../b")), PathBuf::from("../../b"));
    }

    #[test]
    fn normalize_drops_parent_dir_at_root() {
        assert_eq!(normalize(Path::new("/../../a")), PathBuf::from("/a"));
    }

    #[test]
    fn normalize_empty_is_cur_dir() {
        assert_eq!(normalize(Path::new("")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn normalize_is_idempotent() {
        for p in [
            "/tmp/./x/../y.cpp",
            "../../a/b/./c",
            "a//b/",
            "/",
            ".",
            "src/../include/foo.hpp",
        ] {
            let once = normalize(Path::new(p));
            assert_eq!(normalize(&once), once, "not idempotent for {p}");
        }
    }

    #[test]
    fn join_normalized_relative_file() {
        assert_eq!(
            join_normalized(Path::new("/build"), Path::new("../src/a.cpp")),
            PathBuf::from("/src/a.cpp")
        );
    }

    #[test]
    fn join_normalized_absolute_file_replaces_directory() {
        assert_eq!(
            join_normalized(Path::new("/build"), Path::new("/src/a.cpp")),
            PathBuf::from("/src/a.cpp")
        );
    }

    #[test]
    fn relative_to_sibling() {
        assert_eq!(
            relative_to(Path::new("/p/include/a.hpp"), Path::new("/p/build")),
            PathBuf::from("../include/a.hpp")
        );
    }

    #[test]
    fn relative_to_descendant() {
        assert_eq!(
            relative_to(Path::new("/p/include/a/a.hpp"), Path::new("/p")),
            PathBuf::from("include/a/a.hpp")
        );
    }

    #[test]
    fn relative_to_self_is_cur_dir() {
        assert_eq!(relative_to(Path::new("/p"), Path::new("/p/")), PathBuf::from("."));
    }

    #[test]
    fn absolute_keeps_absolute_paths() {
        assert_eq!(absolute(Path::new("/a/./b")), PathBuf::from("/a/b"));
        assert!(absolute(Path::new("a")).is_absolute());
    }

    #[test]
    fn locate_dominating_file_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".compdb"), "").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = locate_dominating_file(".compdb", &nested).unwrap();
        assert_eq!(found, normalize(dir.path()));
    }

    #[test]
    fn locate_dominating_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(locate_dominating_file("no-such-marker-file-xyz", dir.path()).is_none());
    }
}
