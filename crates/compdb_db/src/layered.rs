//! The layered compilation database.
//!
//! For every build directory the database holds a base database, found by
//! probing the directory, and one database per configured complementer.
//! Layers are queried in order: the base first, then each complementer in
//! configuration order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cache;
use crate::complementer::{Complementer, Layer, NamedComplementer, UpdateEvent};
use crate::database::{CommandIter, Database, FileIter, InMemoryDatabase};
use crate::error::{DbError, DbResult};
use crate::pattern::expand_directory_pattern;
use crate::registry::BackendRegistry;

/// The databases found for one build directory, base first.
struct ProbedDirectory {
    directory: PathBuf,
    databases: Vec<Box<dyn Database>>,
}

/// A stack of database layers over one or more build directories.
///
/// Complementers must be added before build directories. Adding build
/// directories is all-or-nothing: if any directory fails to probe, none of
/// the directories of that call are added.
pub struct CompilationDatabase {
    registry: BackendRegistry,
    complementers: Vec<NamedComplementer>,
    /// `layers[0]` is the base layer; `layers[i][j]` belongs to `directories[j]`.
    layers: Vec<Layer>,
    directories: Vec<PathBuf>,
    raise_on_missing_cache: bool,
}

impl CompilationDatabase {
    /// Creates an empty database that probes directories with `registry`.
    ///
    /// Strict cache mode is on: adding a directory fails when a
    /// complementer cache file is missing.
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            registry,
            complementers: Vec::new(),
            layers: vec![Vec::new()],
            directories: Vec::new(),
            raise_on_missing_cache: true,
        }
    }

    /// Chooses whether a missing complementer cache file is an error.
    ///
    /// When off, a missing cache is replaced by an empty layer until the
    /// next [`update_complements`](Self::update_complements).
    pub fn set_raise_on_missing_cache(&mut self, raise: bool) {
        self.raise_on_missing_cache = raise;
    }

    /// Registers a complementer, validating its name before any I/O.
    pub fn add_complementer(
        &mut self,
        name: &str,
        complementer: Box<dyn Complementer>,
    ) -> DbResult<()> {
        let complementer = NamedComplementer::new(name, complementer)?;
        let layer: Layer = self
            .directories
            .iter()
            .map(|_| Box::new(InMemoryDatabase::new()) as Box<dyn Database>)
            .collect();
        self.complementers.push(complementer);
        self.layers.push(layer);
        Ok(())
    }

    /// The build directories, in the order they were added.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// The names of the registered complementers, in layer order.
    pub fn complementer_names(&self) -> Vec<&str> {
        self.complementers.iter().map(NamedComplementer::name).collect()
    }

    /// The layers, base first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn probe_dir(&self, directory: &Path) -> DbResult<ProbedDirectory> {
        let mut databases = vec![self.registry.probe_directory(directory)?];
        for complementer in &self.complementers {
            let cache_path = complementer.cache_path(directory);
            match cache::load_layer(&cache_path) {
                Some(db) => databases.push(Box::new(db)),
                None if self.raise_on_missing_cache => {
                    return Err(DbError::ComplementerCacheMissing {
                        complementer: complementer.name().to_string(),
                        directory: directory.to_path_buf(),
                    })
                }
                None => databases.push(Box::new(InMemoryDatabase::new())),
            }
        }
        Ok(ProbedDirectory {
            directory: directory.to_path_buf(),
            databases,
        })
    }

    fn probe_pattern(&self, pattern: &str) -> DbResult<Vec<ProbedDirectory>> {
        let mut probed = Vec::new();
        for directory in expand_directory_pattern(pattern)? {
            match self.probe_dir(&directory) {
                Ok(p) => probed.push(p),
                Err(e @ DbError::ProbeNotFound { .. }) => {
                    tracing::debug!("{pattern}: skipping {}: {e}", directory.display())
                }
                Err(e) => return Err(e),
            }
        }
        if probed.is_empty() {
            return Err(DbError::NoDatabaseMatched {
                pattern: pattern.to_string(),
            });
        }
        Ok(probed)
    }

    fn commit(&mut self, probed: Vec<ProbedDirectory>) {
        for p in probed {
            for (layer, db) in self.layers.iter_mut().zip(p.databases) {
                layer.push(db);
            }
            self.directories.push(p.directory);
        }
    }

    /// Adds one build directory.
    pub fn add_directory(&mut self, directory: impl AsRef<Path>) -> DbResult<()> {
        let probed = self.probe_dir(directory.as_ref())?;
        self.commit(vec![probed]);
        Ok(())
    }

    /// Adds several build directories; either all are added or none.
    pub fn add_directories<P: AsRef<Path>>(&mut self, directories: &[P]) -> DbResult<()> {
        let probed = directories
            .iter()
            .map(|d| self.probe_dir(d.as_ref()))
            .collect::<DbResult<Vec<_>>>()?;
        self.commit(probed);
        Ok(())
    }

    /// Adds every directory matched by a glob pattern.
    ///
    /// Directories that do not hold a database are skipped; the pattern
    /// fails only if none of its directories could be added. Other errors,
    /// such as a missing complementer cache, fail the pattern at once.
    pub fn add_directory_pattern(&mut self, pattern: &str) -> DbResult<()> {
        let probed = self.probe_pattern(pattern)?;
        self.commit(probed);
        Ok(())
    }

    /// Adds the directories of several patterns; either all patterns
    /// succeed or nothing is added.
    pub fn add_directory_patterns<S: AsRef<str>>(&mut self, patterns: &[S]) -> DbResult<()> {
        let mut probed = Vec::new();
        for pattern in patterns {
            probed.extend(self.probe_pattern(pattern.as_ref())?);
        }
        self.commit(probed);
        Ok(())
    }

    /// Recomputes every complementer layer from the base layer forward.
    ///
    /// Complementers run in registration order, each seeing the layers of
    /// the previous ones. Each new layer is written to its cache files and
    /// then read back from them, so later layers and queries see exactly
    /// what was serialized. On error the previous complementer layers are
    /// kept, though cache files already written stay on disk.
    pub fn update_complements(
        &mut self,
        mut on_event: impl FnMut(UpdateEvent<'_>),
    ) -> DbResult<()> {
        let previous = self.layers.split_off(1);
        if let Err(e) = self.recompute_layers(&mut on_event) {
            self.layers.truncate(1);
            self.layers.extend(previous);
            return Err(e);
        }
        Ok(())
    }

    fn recompute_layers(&mut self, on_event: &mut impl FnMut(UpdateEvent<'_>)) -> DbResult<()> {
        for complementer in &self.complementers {
            on_event(UpdateEvent::Begin {
                complementer: complementer.name(),
            });
            let layer = complementer.complement(&self.layers)?;
            if layer.len() != self.directories.len() {
                return Err(DbError::LayerCountMismatch {
                    complementer: complementer.name().to_string(),
                    expected: self.directories.len(),
                    actual: layer.len(),
                });
            }
            let mut cached: Layer = Vec::with_capacity(layer.len());
            for (db, directory) in layer.iter().zip(&self.directories) {
                let cache_path = complementer.cache_path(directory);
                on_event(UpdateEvent::Saving { file: &cache_path });
                cache::save_layer(&cache_path, db)?;
                cached.push(Box::new(crate::json::JsonDatabase::new(cache_path)));
            }
            self.layers.push(cached);
            on_event(UpdateEvent::End {
                complementer: complementer.name(),
            });
        }
        Ok(())
    }

    /// Returns the compile commands of the first layer that knows `path`.
    ///
    /// Complementer layers never contain a file known to an earlier layer,
    /// so stopping at the first non-empty layer loses nothing. With
    /// `unique`, at most one command is returned.
    pub fn compile_commands_with(&self, path: &Path, unique: bool) -> DbResult<CommandIter<'_>> {
        for layer in &self.layers {
            let iters = layer
                .iter()
                .map(|db| db.compile_commands(path))
                .collect::<DbResult<Vec<_>>>()?;
            let mut commands = iters.into_iter().flatten().peekable();
            if commands.peek().is_some() {
                return Ok(if unique {
                    Box::new(commands.take(1))
                } else {
                    Box::new(commands)
                });
            }
        }
        Ok(Box::new(std::iter::empty()))
    }

    /// Returns the compile commands of every layer, base first.
    ///
    /// With `unique`, only the first command of each normalized file is
    /// kept, so base entries win over complementer entries.
    pub fn all_compile_commands_with(&self, unique: bool) -> DbResult<CommandIter<'_>> {
        let mut iters = Vec::new();
        for layer in &self.layers {
            for db in layer {
                iters.push(db.all_compile_commands()?);
            }
        }
        let commands = iters.into_iter().flatten();
        if unique {
            let mut seen = HashSet::new();
            Ok(Box::new(
                commands.filter(move |c| seen.insert(c.normalized_file())),
            ))
        } else {
            Ok(Box::new(commands))
        }
    }
}

impl CompilationDatabase {
    /// Returns the files of every layer, base first.
    ///
    /// With `unique`, each file is yielded once. A single database that
    /// already reports unique files is passed through as is.
    pub fn all_files_with(&self, unique: bool) -> DbResult<FileIter<'_>> {
        let databases: Vec<&dyn Database> = self
            .layers
            .iter()
            .flatten()
            .map(|db| &**db)
            .collect();
        let needs_dedupe = unique && !(databases.len() == 1 && databases[0].all_files_unique());
        let iters = databases
            .iter()
            .map(|db| db.all_files())
            .collect::<DbResult<Vec<_>>>()?;
        let files = iters.into_iter().flatten();
        if needs_dedupe {
            let mut seen = HashSet::new();
            Ok(Box::new(files.filter(move |f| seen.insert(f.clone()))))
        } else {
            Ok(Box::new(files))
        }
    }
}

impl Database for CompilationDatabase {
    fn compile_commands(&self, path: &Path) -> DbResult<CommandIter<'_>> {
        self.compile_commands_with(path, false)
    }

    fn all_files(&self) -> DbResult<FileIter<'_>> {
        self.all_files_with(false)
    }

    fn all_compile_commands(&self) -> DbResult<CommandIter<'_>> {
        self.all_compile_commands_with(false)
    }
}
