//! Source tree scanning for `scan-files` and `check`.

use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use walkdir::WalkDir;

use crate::{GlobalArgs, ScanArgs};

/// Extensions of C and C++ source files. Case matters: `.C` is C++.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "C", "cc", "c++", "C++", "cxx", "cpp"];

/// Extensions of C and C++ header files.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "H", "hh", "h++", "H++", "hxx", "hpp"];

/// A group of files selected by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FileGroup {
    /// C and C++ source files.
    Source,
    /// C and C++ header files.
    Header,
}

impl FileGroup {
    /// The extensions of this group, without the leading dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileGroup::Source => SOURCE_EXTENSIONS,
            FileGroup::Header => HEADER_EXTENSIONS,
        }
    }
}

/// Whether `path` has an extension of one of `groups`.
pub fn matches_groups(path: &Path, groups: &[FileGroup]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    groups.iter().any(|g| g.extensions().contains(&ext))
}

/// Lists the files of `groups` under `roots`, as sorted normalized
/// absolute paths. A root may also be a single file.
///
/// Symbolic links to directories are not followed.
pub fn list_files<P: AsRef<Path>>(groups: &[FileGroup], roots: &[P]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        let root = compdb_common::logical_abspath(root.as_ref());
        if root.is_dir() {
            walk_dir(&root, groups, &mut files)?;
        } else if root.is_file() && matches_groups(&root, groups) {
            files.push(root);
        } else if !root.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file or directory", root.display()),
            ));
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_dir(dir: &Path, groups: &[FileGroup], files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_dir() && matches_groups(entry.path(), groups) {
            files.push(entry.into_path());
        }
    }
    Ok(())
}

/// Shows `path` relative to `cwd` when it lies below it.
pub fn display_relative(path: &Path, cwd: &Path) -> PathBuf {
    match path.strip_prefix(cwd) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

/// Runs `compdb scan-files`.
pub fn run(args: &ScanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    for file in list_files(&args.groups, &args.paths)? {
        println!("{}", display_relative(&file, &global.cwd).display());
    }
    Ok(0)
}
