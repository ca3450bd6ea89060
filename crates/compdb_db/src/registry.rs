//! Backend registration and directory probing.

use std::path::Path;

use crate::database::Database;
use crate::error::{DbError, DbResult};
use crate::json::JsonDatabase;

/// A kind of compilation database that can be recognized in a build
/// directory.
pub trait Backend {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns a database if `directory` holds one this backend understands.
    fn probe_directory(&self, directory: &Path) -> Option<Box<dyn Database>>;
}

/// Recognizes build directories containing `compile_commands.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl Backend for JsonBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn probe_directory(&self, directory: &Path) -> Option<Box<dyn Database>> {
        JsonDatabase::probe_directory(directory).map(|db| Box::new(db) as Box<dyn Database>)
    }
}

/// An ordered list of backends, tried in registration order.
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn Backend>>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in backend.
    pub fn with_builtin_backends() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JsonBackend));
        registry
    }

    /// Appends a backend. A backend whose name is already registered is ignored.
    pub fn register(&mut self, backend: Box<dyn Backend>) {
        if self.backends.iter().all(|b| b.name() != backend.name()) {
            self.backends.push(backend);
        }
    }

    /// Returns the names of the registered backends, in probing order.
    pub fn names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Probes `directory` with each backend; the first that recognizes it wins.
    pub fn probe_directory(&self, directory: &Path) -> DbResult<Box<dyn Database>> {
        for backend in &self.backends {
            if let Some(db) = backend.probe_directory(directory) {
                tracing::debug!(
                    "{}: found {} compilation database",
                    directory.display(),
                    backend.name()
                );
                return Ok(db);
            }
        }
        Err(DbError::ProbeNotFound {
            directory: directory.to_path_buf(),
        })
    }
}
