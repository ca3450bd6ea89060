//! Synthesizing a compile command for a file from a reference command.

use std::path::{Path, PathBuf};

use compdb_db::CompileCommand;

use crate::options::sanitize_arguments;

/// Expresses `path` the way `other` is expressed.
///
/// If `other` is absolute the result is absolute (`path` joined onto
/// `directory`); if `other` is relative and `path` absolute, the result is
/// `path` relative to `directory`; otherwise `path` is returned unchanged.
pub fn mimic_path_relativity(path: &Path, other: &Path, directory: &Path) -> PathBuf {
    if other.is_absolute() {
        directory.join(path)
    } else if path.is_absolute() {
        compdb_common::relative_to(path, directory)
    } else {
        path.to_path_buf()
    }
}

/// Builds a compile command for `file` borrowing the options of `reference`.
///
/// The new command runs in the reference's directory, names `file` with the
/// same relativity as the reference's own file, and replaces the
/// reference's main file and output with `-c <file>`.
pub fn derive_compile_command(file: &Path, reference: &CompileCommand) -> CompileCommand {
    let file = mimic_path_relativity(file, reference.file(), reference.directory());
    let mut arguments = sanitize_arguments(reference);
    arguments.push("-c".to_string());
    arguments.push(file.to_string_lossy().into_owned());
    CompileCommand::new(reference.directory(), file, arguments)
}
