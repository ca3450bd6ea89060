//! The compile command model.

use std::path::{Path, PathBuf};

/// One compiler invocation: the working directory, the main file, and the
/// full argument vector including the compiler itself.
///
/// The identity of a command inside a database is its
/// [`normalized_file`](Self::normalized_file); full equality compares every
/// field and is mostly useful in tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompileCommand {
    directory: PathBuf,
    file: PathBuf,
    arguments: Vec<String>,
    output: Option<PathBuf>,
}

impl CompileCommand {
    /// Creates a compile command without an output file.
    pub fn new(
        directory: impl Into<PathBuf>,
        file: impl Into<PathBuf>,
        arguments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            directory: directory.into(),
            file: file.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            output: None,
        }
    }

    /// Sets the output file of the command.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// The working directory of the compilation.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The main file, as written by the producer (relative or absolute).
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The argument vector, starting with the compiler executable.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// The output file, if the producer recorded one.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// The lexically normalized join of `directory` and `file`.
    pub fn normalized_file(&self) -> PathBuf {
        compdb_common::join_normalized(&self.directory, &self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparable() {
        let a1 = CompileCommand::new("/", "a.c", ["cc"]);
        let a2 = CompileCommand::new("/", "a.c", ["cc"]);
        let b = CompileCommand::new("/", "b.c", ["cc"]);
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
    }

    #[test]
    fn output_participates_in_equality() {
        let a = CompileCommand::new("/", "a.c", ["cc"]);
        let a_out = CompileCommand::new("/", "a.c", ["cc"]).with_output("a.o");
        assert_ne!(a, a_out);
        assert_eq!(a_out.output(), Some(Path::new("a.o")));
    }

    #[test]
    fn normalized_file_joins_directory() {
        let cmd = CompileCommand::new("/tmp/build", "../src/./a.cpp", ["cc"]);
        assert_eq!(cmd.normalized_file(), PathBuf::from("/tmp/src/a.cpp"));
    }

    #[test]
    fn normalized_file_absolute_file() {
        let cmd = CompileCommand::new("/tmp/", "/tmp/a.cpp", ["cc"]);
        assert_eq!(cmd.normalized_file(), PathBuf::from("/tmp/a.cpp"));
    }

    #[test]
    fn normalized_file_is_stable() {
        let cmd = CompileCommand::new("/p/build/..", "include/../src/a.cpp", ["cc"]);
        let once = cmd.normalized_file();
        assert_eq!(compdb_common::normalize(&once), once);
    }
}
