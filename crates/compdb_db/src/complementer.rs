//! The complementer protocol.
//!
//! A complementer derives compile commands for files the build system did
//! not record. It receives every layer computed so far (the base databases
//! first) and returns one new database per build directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::database::{Database, InMemoryDatabase};
use crate::error::{DbError, DbResult};

/// One database per build directory, in build directory order.
pub type Layer = Vec<Box<dyn Database>>;

/// Computes a complementary layer from the layers below it.
pub trait Complementer {
    /// Returns one database per build directory.
    ///
    /// `layers[0]` is the base layer. A file present in any of `layers`
    /// must not appear in the result.
    fn complement(&self, layers: &[Layer]) -> DbResult<Vec<InMemoryDatabase>>;
}

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$").expect("complementer name regex is valid")
});

/// Returns `true` if `name` is a valid complementer name.
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// A complementer registered under a validated name.
pub struct NamedComplementer {
    name: String,
    complementer: Box<dyn Complementer>,
}

impl NamedComplementer {
    /// Validates `name` and wraps the complementer.
    pub fn new(name: &str, complementer: Box<dyn Complementer>) -> DbResult<Self> {
        if !is_valid_name(name) {
            return Err(DbError::ComplementerNameInvalid {
                name: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            complementer,
        })
    }

    /// The complementer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cache file name, `<name>.json`.
    pub fn cache_filename(&self) -> String {
        format!("{}.json", self.name)
    }

    /// The cache file inside a build directory.
    pub fn cache_path(&self, directory: &Path) -> PathBuf {
        directory.join(self.cache_filename())
    }

    /// Runs the wrapped complementer.
    pub fn complement(&self, layers: &[Layer]) -> DbResult<Vec<InMemoryDatabase>> {
        self.complementer.complement(layers)
    }
}

/// Progress reported while complements are being recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateEvent<'a> {
    /// A complementer starts computing its layer.
    Begin {
        /// Name of the complementer.
        complementer: &'a str,
    },
    /// A cache file is being written.
    Saving {
        /// The cache file.
        file: &'a Path,
    },
    /// A complementer layer is complete.
    End {
        /// Name of the complementer.
        complementer: &'a str,
    },
}
