//! Configuration file locations and loading.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::types::ConfigFile;

/// Name of the project-local configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".compdb";

/// Returns the path of the user configuration file,
/// `<config_dir>/compdb/config.toml`, whether or not it exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("compdb").join("config.toml"))
}

/// Finds the project-local configuration file, walking up from `start`.
pub fn local_config_path(start: &Path) -> Option<PathBuf> {
    compdb_common::locate_dominating_file(LOCAL_CONFIG_FILE, start)
        .map(|dir| dir.join(LOCAL_CONFIG_FILE))
}

/// Reads and parses a configuration file.
pub fn load_config_file(path: &Path) -> ConfigResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content, path)
}

/// Parses configuration text; `path` is only used in error messages.
pub fn load_config_from_str(content: &str, path: &Path) -> ConfigResult<ConfigFile> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
