//! Configuration types deserialized from TOML.

use serde::{Deserialize, Serialize};

/// Every key a configuration may set, as `<section>.<variable>`.
pub const KNOWN_KEYS: &[&str] = &["compdb.build_dir", "compdb.complementers"];

/// The contents of one configuration file.
///
/// Every variable is optional so that a file only overrides what it sets.
/// Unknown sections and variables are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigFile {
    /// The `[compdb]` section.
    #[serde(default)]
    pub compdb: CompdbSection,
}

/// The `[compdb]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompdbSection {
    /// Build directory glob patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<Vec<String>>,
    /// Complementer names, in layer order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complementers: Option<Vec<String>>,
}
