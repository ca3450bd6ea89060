//! Error types for compilation database operations.

use std::path::PathBuf;

/// The result type of fallible database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur while probing, reading, layering, or caching
/// compilation databases.
///
/// Unreadable source files met during include scanning are not represented
/// here: they are logged and contribute no includes.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// No registered backend recognizes the directory.
    #[error("{}: no compilation database found", directory.display())]
    ProbeNotFound {
        /// The probed directory.
        directory: PathBuf,
    },

    /// A directory pattern expanded to no directory holding a database.
    #[error("{pattern}: no compilation databases found")]
    NoDatabaseMatched {
        /// The pattern as given by the user.
        pattern: String,
    },

    /// A directory pattern is not a valid glob.
    #[error("invalid directory pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as given by the user.
        pattern: String,
        /// Description of the syntax problem.
        reason: String,
    },

    /// A complementer cache file is absent and strict cache mode is on.
    #[error("could not find '{complementer}' complementer in '{}', run 'compdb update'", directory.display())]
    ComplementerCacheMissing {
        /// Name of the complementer.
        complementer: String,
        /// Build directory expected to hold the cache file.
        directory: PathBuf,
    },

    /// A complementer was registered under a name outside `[a-z][a-z0-9]*(_[a-z0-9]+)*`.
    #[error("invalid complementer name: '{name}'")]
    ComplementerNameInvalid {
        /// The rejected name.
        name: String,
    },

    /// A complementer returned a layer that does not have one database
    /// per build directory.
    #[error("complementer '{complementer}' returned {actual} database(s) for {expected} build directories")]
    LayerCountMismatch {
        /// Name of the complementer.
        complementer: String,
        /// Number of build directories.
        expected: usize,
        /// Number of databases returned.
        actual: usize,
    },

    /// A record of a JSON compilation database lacks a required field or
    /// its `command` string cannot be split into words.
    #[error("malformed entry #{index} in {}: {reason}", path.display())]
    MalformedEntry {
        /// The database file.
        path: PathBuf,
        /// Zero-based index of the record.
        index: usize,
        /// Description of the problem.
        reason: String,
    },

    /// A JSON compilation database is not a valid JSON array of objects.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        /// The database file.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// An I/O error occurred while reading or writing a database file.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_not_found_display() {
        let err = DbError::ProbeNotFound {
            directory: PathBuf::from("/tmp/build"),
        };
        assert_eq!(err.to_string(), "/tmp/build: no compilation database found");
    }

    #[test]
    fn no_database_matched_display() {
        let err = DbError::NoDatabaseMatched {
            pattern: "build-*".to_string(),
        };
        assert_eq!(err.to_string(), "build-*: no compilation databases found");
    }

    #[test]
    fn cache_missing_display() {
        let err = DbError::ComplementerCacheMissing {
            complementer: "headerdb".to_string(),
            directory: PathBuf::from("/tmp/build"),
        };
        assert_eq!(
            err.to_string(),
            "could not find 'headerdb' complementer in '/tmp/build', run 'compdb update'"
        );
    }

    #[test]
    fn name_invalid_display() {
        let err = DbError::ComplementerNameInvalid {
            name: "Header-DB".to_string(),
        };
        assert_eq!(err.to_string(), "invalid complementer name: 'Header-DB'");
    }

    #[test]
    fn malformed_entry_display() {
        let err = DbError::MalformedEntry {
            path: PathBuf::from("compile_commands.json"),
            index: 3,
            reason: "missing 'file'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("#3"));
        assert!(msg.contains("missing 'file'"));
    }

    #[test]
    fn io_error_display() {
        let err = DbError::Io {
            path: PathBuf::from("/tmp/build/headerdb.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("headerdb.json"));
    }
}
