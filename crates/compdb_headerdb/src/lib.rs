//! Compile commands for files the build system did not record.
//!
//! Build systems only list translation units in their compilation database,
//! yet tools want compile options for headers too. This crate follows
//! `#include` directives from the known files and gives each reached header
//! the options of its most similar includer, either for a whole database at
//! once ([`HeaderDb`], a complementer layer) or one file at a time
//! ([`IncludedByDatabase`]).

#![warn(missing_docs)]

pub mod derive;
pub mod engine;
pub mod include;
pub mod included_by;
pub mod options;
pub mod score;

pub use derive::{derive_compile_command, mimic_path_relativity};
pub use engine::{infer_headers, HeaderDb};
pub use include::{parse_includes, resolve_include, scan_includes, Delimiter, Include};
pub use included_by::{IncludeGraphBuilder, IncludedByDatabase, IncludedByGraph};
pub use options::{implicit_search_path, include_dirs, sanitize_arguments};
pub use score::{score, subword_split};
