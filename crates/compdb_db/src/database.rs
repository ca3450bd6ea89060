//! The database capability and its simple variants.

use std::path::{Path, PathBuf};

use crate::command::CompileCommand;
use crate::error::DbResult;

/// A lazily evaluated sequence of compile commands.
pub type CommandIter<'a> = Box<dyn Iterator<Item = CompileCommand> + 'a>;

/// A lazily evaluated sequence of normalized file paths.
pub type FileIter<'a> = Box<dyn Iterator<Item = PathBuf> + 'a>;

/// A source of compile commands.
///
/// Mirrors the query surface of a clang tooling compilation database:
/// point lookups by file, and bulk enumeration of files and commands.
/// Errors surface when the backing storage is first read.
pub trait Database {
    /// Returns the compile commands whose normalized file equals the
    /// normalized absolute form of `path`.
    fn compile_commands(&self, path: &Path) -> DbResult<CommandIter<'_>>;

    /// Returns the normalized path of every entry. A file with several
    /// commands appears several times unless [`all_files_unique`](Self::all_files_unique)
    /// says otherwise.
    fn all_files(&self) -> DbResult<FileIter<'_>>;

    /// Returns every compile command.
    fn all_compile_commands(&self) -> DbResult<CommandIter<'_>>;

    /// Whether [`all_files`](Self::all_files) never yields duplicates.
    fn all_files_unique(&self) -> bool {
        false
    }
}

/// A database held in memory as an ordered list of commands.
///
/// This is what complementers produce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryDatabase {
    compile_commands: Vec<CompileCommand>,
}

impl InMemoryDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a compile command.
    pub fn push(&mut self, compile_command: CompileCommand) {
        self.compile_commands.push(compile_command);
    }

    /// Returns the stored commands in insertion order.
    pub fn commands(&self) -> &[CompileCommand] {
        &self.compile_commands
    }

    /// Returns the number of stored commands.
    pub fn len(&self) -> usize {
        self.compile_commands.len()
    }

    /// Returns `true` if no command is stored.
    pub fn is_empty(&self) -> bool {
        self.compile_commands.is_empty()
    }
}

impl From<Vec<CompileCommand>> for InMemoryDatabase {
    fn from(compile_commands: Vec<CompileCommand>) -> Self {
        Self { compile_commands }
    }
}

impl Database for InMemoryDatabase {
    fn compile_commands(&self, path: &Path) -> DbResult<CommandIter<'_>> {
        let path = compdb_common::absolute(path);
        Ok(Box::new(
            self.compile_commands
                .iter()
                .filter(move |c| c.normalized_file() == path)
                .cloned(),
        ))
    }

    fn all_files(&self) -> DbResult<FileIter<'_>> {
        Ok(Box::new(
            self.compile_commands.iter().map(CompileCommand::normalized_file),
        ))
    }

    fn all_compile_commands(&self) -> DbResult<CommandIter<'_>> {
        Ok(Box::new(self.compile_commands.iter().cloned()))
    }
}

/// A valid but empty database.
///
/// Stands in when no build directory is configured at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDatabase;

impl Database for NullDatabase {
    fn compile_commands(&self, _path: &Path) -> DbResult<CommandIter<'_>> {
        Ok(Box::new(std::iter::empty()))
    }

    fn all_files(&self) -> DbResult<FileIter<'_>> {
        Ok(Box::new(std::iter::empty()))
    }

    fn all_compile_commands(&self) -> DbResult<CommandIter<'_>> {
        Ok(Box::new(std::iter::empty()))
    }

    fn all_files_unique(&self) -> bool {
        true
    }
}

/// The concatenation of several databases, queried in order.
#[derive(Default)]
pub struct AggregateDatabase {
    databases: Vec<Box<dyn Database>>,
}

impl AggregateDatabase {
    /// Creates an aggregate over the given databases.
    pub fn new(databases: Vec<Box<dyn Database>>) -> Self {
        Self { databases }
    }
}

impl Database for AggregateDatabase {
    fn compile_commands(&self, path: &Path) -> DbResult<CommandIter<'_>> {
        let iters = self
            .databases
            .iter()
            .map(|db| db.compile_commands(path))
            .collect::<DbResult<Vec<_>>>()?;
        Ok(Box::new(iters.into_iter().flatten()))
    }

    fn all_files(&self) -> DbResult<FileIter<'_>> {
        let iters = self
            .databases
            .iter()
            .map(|db| db.all_files())
            .collect::<DbResult<Vec<_>>>()?;
        Ok(Box::new(iters.into_iter().flatten()))
    }

    fn all_compile_commands(&self) -> DbResult<CommandIter<'_>> {
        let iters = self
            .databases
            .iter()
            .map(|db| db.all_compile_commands())
            .collect::<DbResult<Vec<_>>>()?;
        Ok(Box::new(iters.into_iter().flatten()))
    }
}
