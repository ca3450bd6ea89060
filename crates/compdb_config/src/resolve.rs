//! Merging configuration layers into the effective configuration.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::loader::{load_config_file, local_config_path, user_config_path};
use crate::overrides::{check_key, overrides_to_file, Override};
use crate::types::{CompdbSection, ConfigFile};

/// One source of configuration values.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// The values this layer sets.
    pub file: ConfigFile,
    /// Directory relative build directory patterns are resolved against.
    pub base_dir: PathBuf,
    /// The file the layer was read from; `None` for command-line overrides.
    pub origin: Option<PathBuf>,
}

impl ConfigLayer {
    /// Reads a configuration file as a layer based at its directory.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let path = compdb_common::absolute(path);
        let file = load_config_file(&path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self {
            file,
            base_dir,
            origin: Some(path),
        })
    }

    /// Turns command-line overrides into a layer based at `cwd`.
    pub fn from_overrides(overrides: &[Override], cwd: &Path) -> ConfigResult<Self> {
        Ok(Self {
            file: overrides_to_file(overrides)?,
            base_dir: cwd.to_path_buf(),
            origin: None,
        })
    }
}

/// The effective configuration.
///
/// Layers are applied in order; a variable set by a later layer replaces
/// the earlier value entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    build_dirs: Vec<String>,
    complementers: Vec<String>,
    files: Vec<PathBuf>,
}

impl Config {
    /// Loads the user file, the local file found from `cwd`, then the
    /// overrides.
    pub fn load(overrides: &[Override], cwd: &Path) -> ConfigResult<Self> {
        let mut layers = Vec::new();
        if let Some(user) = user_config_path().filter(|p| p.is_file()) {
            layers.push(ConfigLayer::from_path(&user)?);
        }
        if let Some(local) = local_config_path(cwd) {
            layers.push(ConfigLayer::from_path(&local)?);
        }
        if !overrides.is_empty() {
            layers.push(ConfigLayer::from_overrides(overrides, cwd)?);
        }
        Ok(Self::from_layers(&layers))
    }

    /// Merges `layers`, lowest priority first.
    pub fn from_layers(layers: &[ConfigLayer]) -> Self {
        let mut config = Self::default();
        for layer in layers {
            tracing::debug!(
                "applying configuration from {}",
                layer
                    .origin
                    .as_deref()
                    .map_or_else(|| "command line".to_string(), |p| p.display().to_string())
            );
            if let Some(patterns) = &layer.file.compdb.build_dir {
                config.build_dirs = patterns
                    .iter()
                    .map(|pattern| resolve_pattern(pattern, &layer.base_dir))
                    .collect();
            }
            if let Some(names) = &layer.file.compdb.complementers {
                config.complementers = names.clone();
            }
            if let Some(origin) = &layer.origin {
                config.files.push(origin.clone());
            }
        }
        config
    }

    /// Build directory glob patterns, absolute.
    pub fn build_dirs(&self) -> &[String] {
        &self.build_dirs
    }

    /// Complementer names, in layer order.
    pub fn complementers(&self) -> &[String] {
        &self.complementers
    }

    /// The configuration files that were read, lowest priority first.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Returns the value of `key` as text; lists are comma separated.
    pub fn get(&self, key: &str) -> ConfigResult<String> {
        check_key(key)?;
        match key {
            "compdb.build_dir" => Ok(self.build_dirs.join(",")),
            "compdb.complementers" => Ok(self.complementers.join(",")),
            _ => Err(ConfigError::UnknownKey {
                key: key.to_string(),
            }),
        }
    }

    /// The effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let file = ConfigFile {
            compdb: CompdbSection {
                build_dir: Some(self.build_dirs.clone()),
                complementers: Some(self.complementers.clone()),
            },
        };
        toml::to_string(&file)
    }
}

/// Anchors a relative pattern at `base_dir`.
fn resolve_pattern(pattern: &str, base_dir: &Path) -> String {
    compdb_common::normalize(&base_dir.join(pattern))
        .to_string_lossy()
        .into_owned()
}
