//! The header inference engine.
//!
//! Every file reached by an `#include` from a known compile command, and not
//! itself known, receives a compile command borrowed from its most similar
//! includer. Headers found in one round are scanned in the next, until a
//! round finds nothing new.

use std::collections::HashSet;
use std::path::PathBuf;

use compdb_db::{CompileCommand, Complementer, DbResult, InMemoryDatabase, Layer};
use indexmap::map::Entry;
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::derive::derive_compile_command;
use crate::include::{resolve_include, scan_includes};
use crate::options::include_dirs;
use crate::score::score;

/// A compile command to scan, tagged with its build directory index.
struct Source {
    directory_index: usize,
    command: CompileCommand,
}

/// The best includer found so far for one header.
struct Candidate {
    score: i32,
    directory_index: usize,
    command: CompileCommand,
}

/// Resolves every include of a command's main file that exists on disk.
fn included_files(command: &CompileCommand) -> Vec<PathBuf> {
    let main_file = command.normalized_file();
    let search_paths = include_dirs(command);
    scan_includes(&main_file)
        .iter()
        .filter_map(|include| resolve_include(include, &main_file, &search_paths))
        .collect()
}

/// Runs one round: scans `frontier` and picks an includer for every
/// header not in `known`.
///
/// Scanning runs in parallel; merging follows frontier order, so the first
/// includer to reach a given score keeps the header.
fn infer_round(frontier: &[Source], known: &HashSet<PathBuf>) -> IndexMap<PathBuf, Candidate> {
    let scanned: Vec<Vec<PathBuf>> = frontier
        .par_iter()
        .map(|source| included_files(&source.command))
        .collect();

    let mut update: IndexMap<PathBuf, Candidate> = IndexMap::new();
    for (source, headers) in frontier.iter().zip(scanned) {
        let includer = source.command.normalized_file();
        for header in headers {
            if known.contains(&header) {
                continue;
            }
            let score = score(&includer, &header);
            match update.entry(header) {
                Entry::Occupied(mut entry) => {
                    if score > entry.get().score {
                        let command = derive_compile_command(entry.key(), &source.command);
                        *entry.get_mut() = Candidate {
                            score,
                            directory_index: source.directory_index,
                            command,
                        };
                    }
                }
                Entry::Vacant(entry) => {
                    let command = derive_compile_command(entry.key(), &source.command);
                    entry.insert(Candidate {
                        score,
                        directory_index: source.directory_index,
                        command,
                    });
                }
            }
        }
    }
    update
}

/// Computes one database of inferred header commands per build directory.
///
/// `layers[0]` fixes the number of build directories. Files of every layer
/// are considered known and are never given a new command.
pub fn infer_headers(layers: &[Layer]) -> DbResult<Vec<InMemoryDatabase>> {
    let directory_count = layers.first().map_or(0, Vec::len);
    let mut inferred = vec![InMemoryDatabase::new(); directory_count];

    let mut known = HashSet::new();
    let mut frontier = Vec::new();
    for layer in layers {
        for (directory_index, database) in layer.iter().enumerate() {
            known.extend(database.all_files()?);
            frontier.extend(database.all_compile_commands()?.map(|command| Source {
                directory_index,
                command,
            }));
        }
    }

    let mut round = 0;
    while !frontier.is_empty() {
        round += 1;
        let update = infer_round(&frontier, &known);
        tracing::debug!(
            "header inference round {round}: {} files scanned, {} headers found",
            frontier.len(),
            update.len()
        );
        if update.is_empty() {
            break;
        }

        frontier = Vec::with_capacity(update.len());
        for (header, candidate) in update {
            known.insert(header);
            inferred[candidate.directory_index].push(candidate.command.clone());
            frontier.push(Source {
                directory_index: candidate.directory_index,
                command: candidate.command,
            });
        }
        // Next round visits build directories in order.
        frontier.sort_by_key(|source| source.directory_index);
    }
    Ok(inferred)
}

/// The `headerdb` complementer: compile commands for headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDb;

impl HeaderDb {
    /// The name under which this complementer is usually registered.
    pub const NAME: &'static str = "headerdb";
}

impl Complementer for HeaderDb {
    fn complement(&self, layers: &[Layer]) -> DbResult<Vec<InMemoryDatabase>> {
        infer_headers(layers)
    }
}
