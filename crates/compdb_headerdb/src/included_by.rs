//! The included-by index.
//!
//! Answers point queries for files without a compile command by walking
//! "who includes me" edges back to a file that has one, instead of running
//! the whole inference engine.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use compdb_db::{CommandIter, CompileCommand, Database, DbResult, FileIter};
use indexmap::IndexMap;

use crate::derive::derive_compile_command;
use crate::include::{resolve_search_path, scan_includes, Include};
use crate::options::include_dirs;
use crate::score::score;

/// Maps an included file to the files seen including it, in discovery order.
pub type IncludedByGraph = IndexMap<PathBuf, Vec<PathBuf>>;

/// Builds the included-by graph of everything reachable from a database.
///
/// Each file is scanned at most once over the whole build, the first time
/// it is reached. Includes are resolved with the search paths of the
/// compile command whose main file reached them.
pub struct IncludeGraphBuilder<'a> {
    known: &'a HashSet<PathBuf>,
    processed: HashSet<PathBuf>,
    graph: IncludedByGraph,
}

impl<'a> IncludeGraphBuilder<'a> {
    /// Creates a builder that records no edge towards a `known` file.
    pub fn new(known: &'a HashSet<PathBuf>) -> Self {
        Self {
            known,
            processed: HashSet::new(),
            graph: IncludedByGraph::new(),
        }
    }

    /// Walks the include tree of one compile command, depth first.
    pub fn add_compile_command(&mut self, command: &CompileCommand) {
        let main_file = command.normalized_file();
        if !self.processed.insert(main_file.clone()) {
            return;
        }
        let search_paths = include_dirs(command);

        let mut stack: Vec<(PathBuf, std::vec::IntoIter<Include>)> =
            vec![(main_file.clone(), scan_includes(&main_file).into_iter())];
        while let Some((includer, includes)) = stack.last_mut() {
            let Some(include) = includes.next() else {
                stack.pop();
                continue;
            };
            let Some(search_path) =
                resolve_search_path(&include, includer.as_path(), &search_paths)
            else {
                continue;
            };
            let includee = compdb_common::join_normalized(search_path, Path::new(&include.name));
            let includer = includer.clone();
            self.add_edge(&includee, &includer);
            if self.processed.insert(includee.clone()) {
                let includes = scan_includes(&includee).into_iter();
                stack.push((includee, includes));
            }
        }
    }

    fn add_edge(&mut self, includee: &Path, includer: &Path) {
        // Self includes are possible but carry no information.
        if includee == includer || self.known.contains(includee) {
            return;
        }
        let includers = self.graph.entry(includee.to_path_buf()).or_default();
        if !includers.iter().any(|p| p == includer) {
            includers.push(includer.to_path_buf());
        }
    }

    /// Returns the graph built so far.
    pub fn finish(self) -> IncludedByGraph {
        self.graph
    }
}

/// A database answering queries for files reached by includes.
///
/// Each answer is derived from the compile command of the closest, most
/// similar includer that has one in the underlying database.
pub struct IncludedByDatabase<'a> {
    graph: IncludedByGraph,
    database: &'a dyn Database,
    known: HashSet<PathBuf>,
}

impl<'a> IncludedByDatabase<'a> {
    /// Scans every compile command of `database` and indexes the result.
    pub fn build(database: &'a dyn Database) -> DbResult<Self> {
        let known: HashSet<PathBuf> = database.all_files()?.collect();
        let mut builder = IncludeGraphBuilder::new(&known);
        for command in database.all_compile_commands()? {
            builder.add_compile_command(&command);
        }
        let graph = builder.finish();
        tracing::debug!("included-by index: {} files", graph.len());
        Ok(Self {
            graph,
            database,
            known,
        })
    }

    /// The underlying graph.
    pub fn graph(&self) -> &IncludedByGraph {
        &self.graph
    }

    /// Finds the includer whose compile command `path` should borrow.
    ///
    /// Walks includers breadth first and stops at the first depth that
    /// contains a file of the database; among those, the most similar one
    /// wins, the first found on equal scores.
    pub fn best_includer(&self, path: &Path) -> Option<&Path> {
        let mut visited: HashSet<&Path> = HashSet::from([path]);
        let mut level: Vec<&Path> = vec![path];
        while !level.is_empty() {
            let mut best: Option<(i32, &Path)> = None;
            let mut next = Vec::new();
            for node in level {
                let Some(includers) = self.graph.get(node) else {
                    continue;
                };
                for includer in includers {
                    let includer = includer.as_path();
                    if !visited.insert(includer) {
                        continue;
                    }
                    next.push(includer);
                    if !self.known.contains(includer) {
                        continue;
                    }
                    let score = score(path, includer);
                    if best.map_or(true, |(best_score, _)| score > best_score) {
                        best = Some((score, includer));
                    }
                }
            }
            if let Some((_, includer)) = best {
                return Some(includer);
            }
            level = next;
        }
        None
    }
}

impl Database for IncludedByDatabase<'_> {
    fn compile_commands(&self, path: &Path) -> DbResult<CommandIter<'_>> {
        let path = compdb_common::logical_abspath(path);
        let Some(includer) = self.best_includer(&path) else {
            return Ok(Box::new(std::iter::empty()));
        };
        let reference = self.database.compile_commands(includer)?.next();
        Ok(Box::new(
            reference
                .map(|reference| derive_compile_command(&path, &reference))
                .into_iter(),
        ))
    }

    fn all_files(&self) -> DbResult<FileIter<'_>> {
        Ok(Box::new(self.graph.keys().cloned()))
    }

    fn all_compile_commands(&self) -> DbResult<CommandIter<'_>> {
        let mut commands = Vec::new();
        for file in self.graph.keys() {
            commands.extend(self.compile_commands(file)?);
        }
        Ok(Box::new(commands.into_iter()))
    }

    fn all_files_unique(&self) -> bool {
        true
    }
}
