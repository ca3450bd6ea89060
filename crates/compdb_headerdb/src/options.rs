//! Compile option handling: what a command's arguments say about the
//! include search path, and which arguments can be reused for another file.

use std::path::{Path, PathBuf};

use compdb_db::CompileCommand;

/// Returns the arguments of `command` that are not tied to its main file.
///
/// Everything from a literal `--` on is dropped, as are `-c`, `-o <file>`,
/// `-o<file>` and the argument naming the main file itself.
pub fn sanitize_arguments(command: &CompileCommand) -> Vec<String> {
    let extension = command
        .file()
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let main_file = command.normalized_file();

    let mut kept = Vec::new();
    let mut args = command.arguments().iter();
    while let Some(arg) = args.next() {
        if arg == "--" {
            break;
        }
        if arg == "-c" {
            continue;
        }
        if arg == "-o" {
            args.next();
            continue;
        }
        if arg.starts_with("-o") {
            continue;
        }
        if arg.ends_with(&extension)
            && compdb_common::join_normalized(command.directory(), Path::new(arg)) == main_file
        {
            continue;
        }
        kept.push(arg.clone());
    }
    kept
}

/// The `-I` directories of `command`, in declaration order, joined with
/// the command's working directory.
pub fn include_dirs(command: &CompileCommand) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let sanitized = sanitize_arguments(command);
    let mut args = sanitized.iter();
    while let Some(arg) = args.next() {
        let dir = match arg.strip_prefix("-I") {
            Some("") => match args.next() {
                Some(next) => next.as_str(),
                None => break,
            },
            Some(dir) => dir,
            None => continue,
        };
        dirs.push(command.directory().join(dir));
    }
    dirs
}

/// The directory quoted includes of `includer` are looked up in first.
pub fn implicit_search_path(includer: &Path) -> Option<&Path> {
    includer.parent().filter(|dir| !dir.as_os_str().is_empty())
}
