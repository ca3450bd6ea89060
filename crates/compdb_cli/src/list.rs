//! `compdb list`: dumps compile commands as a JSON compilation database.

use std::io::{self, Write};
use std::path::PathBuf;

use compdb_db::{write_compile_commands, CompileCommand, DbResult};
use compdb_headerdb::IncludedByDatabase;

use crate::session::Project;
use crate::{GlobalArgs, ListArgs};

/// Outcome of looking up a list of files.
#[derive(Debug, Default)]
pub struct Lookup {
    /// The commands found, in query order.
    pub commands: Vec<CompileCommand>,
    /// Files for which nothing was found.
    pub missing: Vec<PathBuf>,
}

/// Looks up each of `files`.
///
/// Files unknown to the project fall back to the included-by index, which
/// is built on first use and then reused for the remaining files.
pub fn lookup_files(project: &Project, files: &[PathBuf], unique: bool) -> DbResult<Lookup> {
    let mut lookup = Lookup::default();
    let mut included_by: Option<IncludedByDatabase<'_>> = None;
    for file in files {
        let mut found: Vec<CompileCommand> = project.compile_commands(file, unique)?.collect();
        if found.is_empty() {
            if included_by.is_none() {
                tracing::debug!("building the included-by index");
                included_by = Some(IncludedByDatabase::build(project.database())?);
            }
            if let Some(index) = &included_by {
                found.extend(compdb_db::Database::compile_commands(index, file)?);
            }
        }
        if found.is_empty() {
            lookup.missing.push(file.clone());
        }
        lookup.commands.extend(found);
    }
    Ok(lookup)
}

fn write_to_stdout<I>(commands: I) -> io::Result<()>
where
    I: IntoIterator<Item = CompileCommand>,
{
    let stdout = io::stdout();
    let mut out = write_compile_commands(io::BufWriter::new(stdout.lock()), commands)?;
    out.flush()
}

/// Runs `compdb list`.
pub fn run(args: &ListArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = global.load_config()?;
    let project = Project::open(&config, true)?;

    if args.files.is_empty() {
        write_to_stdout(project.all_compile_commands(args.unique)?)?;
        return Ok(0);
    }

    let lookup = lookup_files(&project, &args.files, args.unique)?;
    write_to_stdout(lookup.commands)?;
    for file in &lookup.missing {
        eprintln!(
            "warning: {}: no compile command found",
            compdb_common::friendly_path(file).display()
        );
    }
    Ok(if lookup.missing.is_empty() { 0 } else { 1 })
}
