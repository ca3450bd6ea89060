//! Error types for configuration loading and overrides.

use std::path::PathBuf;

/// Errors that can occur when loading configuration files or applying
/// command-line overrides.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML or has values of the wrong type.
    #[error("failed to parse {}: {reason}", path.display())]
    Parse {
        /// The configuration file.
        path: PathBuf,
        /// The parser message.
        reason: String,
    },

    /// A key is not of the form `<section>.<variable>`.
    #[error("invalid key '{key}', should be of the form <section>.<variable>")]
    InvalidKey {
        /// The key as given.
        key: String,
    },

    /// A well-formed key that names no known variable.
    #[error("unknown configuration key '{key}'")]
    UnknownKey {
        /// The key as given.
        key: String,
    },
}

/// Shorthand for results of configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_key() {
        let err = ConfigError::InvalidKey {
            key: "build_dir".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid key 'build_dir', should be of the form <section>.<variable>"
        );
    }

    #[test]
    fn display_unknown_key() {
        let err = ConfigError::UnknownKey {
            key: "compdb.colour".to_string(),
        };
        assert_eq!(err.to_string(), "unknown configuration key 'compdb.colour'");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::Parse {
            path: PathBuf::from("/p/.compdb"),
            reason: "expected '=' at line 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse /p/.compdb: expected '=' at line 3"
        );
    }

    #[test]
    fn display_io_error() {
        let err = ConfigError::Io {
            path: PathBuf::from("/p/.compdb"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("failed to read /p/.compdb:"));
    }
}
