//! Shared foundational helpers used across the compdb crates.
//!
//! Compilation databases identify files by the lexically normalized join of
//! an entry's `directory` and `file`. This crate provides that normalization
//! along with the other path manipulations the database and header
//! inference crates need, all purely lexical so that symlinked build trees
//! keep the paths the build system wrote.

#![warn(missing_docs)]

pub mod path;

pub use path::{
    absolute, friendly_path, join_normalized, locate_dominating_file, logical_abspath, normalize,
    relative_to,
};
