//! Compilation databases.
//!
//! This crate provides the compile command model, the [`Database`] trait
//! and its JSON, in-memory, null and aggregate implementations, directory
//! probing through a [`BackendRegistry`], and the layered
//! [`CompilationDatabase`] that stacks complementer layers, cached as
//! `<build-directory>/<name>.json`, on top of the build system's own
//! databases.

#![warn(missing_docs)]

pub mod cache;
pub mod command;
pub mod complementer;
pub mod database;
pub mod error;
pub mod json;
pub mod layered;
pub mod pattern;
pub mod registry;
pub mod serialize;

pub use command::CompileCommand;
pub use complementer::{is_valid_name, Complementer, Layer, NamedComplementer, UpdateEvent};
pub use database::{
    AggregateDatabase, CommandIter, Database, FileIter, InMemoryDatabase, NullDatabase,
};
pub use error::{DbError, DbResult};
pub use json::{load_compile_commands, JsonDatabase, COMPILE_COMMANDS_JSON};
pub use layered::CompilationDatabase;
pub use pattern::expand_directory_pattern;
pub use registry::{Backend, BackendRegistry, JsonBackend};
pub use serialize::{arguments_to_command, write_compile_commands, JsonSerializer};
