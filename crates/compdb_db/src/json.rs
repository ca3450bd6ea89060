//! The JSON compilation database backend.
//!
//! Reads the `compile_commands.json` format documented by clang: an array
//! of records with `directory`, `file`, an optional `output`, and either an
//! `arguments` list or a shell-quoted `command` string.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

use crate::command::CompileCommand;
use crate::database::{CommandIter, Database, FileIter};
use crate::error::{DbError, DbResult};

/// File name a build directory must contain to be recognized.
pub const COMPILE_COMMANDS_JSON: &str = "compile_commands.json";

/// One raw record. Every field is optional here so that missing fields
/// can be reported with the record index.
#[derive(Debug, Deserialize)]
struct JsonEntry {
    directory: Option<String>,
    file: Option<String>,
    arguments: Option<Vec<String>>,
    command: Option<String>,
    output: Option<String>,
}

/// A compilation database backed by a JSON file.
///
/// The file is parsed on first access and the result kept for the lifetime
/// of the value; later queries never re-read the file.
#[derive(Debug)]
pub struct JsonDatabase {
    path: PathBuf,
    commands: OnceLock<Vec<CompileCommand>>,
}

impl JsonDatabase {
    /// Creates a database for the given JSON file without reading it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            commands: OnceLock::new(),
        }
    }

    /// Returns a database for `<directory>/compile_commands.json` if that
    /// file exists.
    pub fn probe_directory(directory: &Path) -> Option<Self> {
        let path = directory.join(COMPILE_COMMANDS_JSON);
        path.exists().then(|| Self::new(path))
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commands(&self) -> DbResult<&[CompileCommand]> {
        if let Some(commands) = self.commands.get() {
            return Ok(commands);
        }
        let parsed = load_compile_commands(&self.path)?;
        Ok(self.commands.get_or_init(|| parsed))
    }
}

impl Database for JsonDatabase {
    fn compile_commands(&self, path: &Path) -> DbResult<CommandIter<'_>> {
        let path = compdb_common::logical_abspath(path);
        Ok(Box::new(
            self.commands()?
                .iter()
                .filter(move |c| c.normalized_file() == path)
                .cloned(),
        ))
    }

    fn all_files(&self) -> DbResult<FileIter<'_>> {
        Ok(Box::new(
            self.commands()?.iter().map(CompileCommand::normalized_file),
        ))
    }

    fn all_compile_commands(&self) -> DbResult<CommandIter<'_>> {
        Ok(Box::new(self.commands()?.iter().cloned()))
    }
}

/// Reads and converts every record of a JSON compilation database.
pub fn load_compile_commands(path: &Path) -> DbResult<Vec<CompileCommand>> {
    let file = File::open(path).map_err(|source| DbError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: Vec<JsonEntry> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| DbError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            entry_to_compile_command(entry).map_err(|reason| DbError::MalformedEntry {
                path: path.to_path_buf(),
                index,
                reason,
            })
        })
        .collect()
}

fn entry_to_compile_command(entry: JsonEntry) -> Result<CompileCommand, String> {
    let directory = entry
        .directory
        .ok_or_else(|| "missing 'directory'".to_string())?;
    let file = entry.file.ok_or_else(|| "missing 'file'".to_string())?;
    let arguments = match (entry.arguments, entry.command) {
        (Some(arguments), _) => arguments,
        (None, Some(command)) => shlex::split(&command)
            .ok_or_else(|| format!("cannot split 'command' into words: {command}"))?,
        (None, None) => return Err("missing 'arguments' or 'command'".to_string()),
    };
    let command = CompileCommand::new(directory, file, arguments);
    Ok(match entry.output {
        Some(output) => command.with_output(output),
        None => command,
    })
}
