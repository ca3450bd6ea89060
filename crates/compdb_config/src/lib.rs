//! Layered `compdb` configuration.
//!
//! Values come from the user configuration file, then the nearest `.compdb`
//! file above the working directory, then `-c section.key=value` overrides
//! given on the command line. Each layer replaces the variables it sets.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod overrides;
pub mod resolve;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    load_config_file, load_config_from_str, local_config_path, user_config_path,
    LOCAL_CONFIG_FILE,
};
pub use overrides::{check_key, parse_override, split_key, Override};
pub use resolve::{Config, ConfigLayer};
pub use types::{CompdbSection, ConfigFile, KNOWN_KEYS};
