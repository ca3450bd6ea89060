//! Command-line overrides: `-c <section>.<variable>[=<value>]`.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{ConfigFile, KNOWN_KEYS};

/// One command-line override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    /// The key, `<section>.<variable>`.
    pub key: String,
    /// The raw value; `yes` when none was given.
    pub value: String,
}

/// Splits a key into section and variable.
pub fn split_key(key: &str) -> ConfigResult<(&str, &str)> {
    match key.split_once('.') {
        Some((section, variable)) if !section.is_empty() && !variable.is_empty() => {
            Ok((section, variable))
        }
        _ => Err(ConfigError::InvalidKey {
            key: key.to_string(),
        }),
    }
}

/// Checks that `key` is well formed and names a known variable.
pub fn check_key(key: &str) -> ConfigResult<()> {
    split_key(key)?;
    if KNOWN_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(ConfigError::UnknownKey {
            key: key.to_string(),
        })
    }
}

/// Parses `NAME[=VALUE]`. A missing value means `yes`.
pub fn parse_override(arg: &str) -> ConfigResult<Override> {
    let (key, value) = arg.split_once('=').unwrap_or((arg, "yes"));
    check_key(key)?;
    Ok(Override {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Splits a comma-separated list, dropping empty items.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the configuration layer made of the overrides, later ones
/// replacing earlier ones.
pub fn overrides_to_file(overrides: &[Override]) -> ConfigResult<ConfigFile> {
    let mut file = ConfigFile::default();
    for o in overrides {
        match o.key.as_str() {
            "compdb.build_dir" => file.compdb.build_dir = Some(split_list(&o.value)),
            "compdb.complementers" => file.compdb.complementers = Some(split_list(&o.value)),
            _ => {
                return Err(ConfigError::UnknownKey { key: o.key.clone() });
            }
        }
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_value() {
        let o = parse_override("compdb.build_dir=build,out/*").unwrap();
        assert_eq!(o.key, "compdb.build_dir");
        assert_eq!(o.value, "build,out/*");
    }

    #[test]
    fn bare_key_means_yes() {
        let o = parse_override("compdb.complementers").unwrap();
        assert_eq!(o.value, "yes");
    }

    #[test]
    fn value_may_contain_equals() {
        let o = parse_override("compdb.build_dir=a=b").unwrap();
        assert_eq!(o.value, "a=b");
    }

    #[test]
    fn malformed_keys() {
        for key in ["build_dir=x", ".build_dir=x", "compdb.=x", "=x"] {
            assert!(
                matches!(parse_override(key), Err(ConfigError::InvalidKey { .. })),
                "{key} should be invalid"
            );
        }
    }

    #[test]
    fn unknown_keys() {
        for key in ["compdb.colour=1", "other.build_dir=x"] {
            assert!(
                matches!(parse_override(key), Err(ConfigError::UnknownKey { .. })),
                "{key} should be unknown"
            );
        }
    }

    #[test]
    fn lists_are_comma_separated() {
        let overrides = [
            parse_override("compdb.build_dir=first").unwrap(),
            parse_override("compdb.build_dir= build , out/* ,").unwrap(),
            parse_override("compdb.complementers=").unwrap(),
        ];
        let file = overrides_to_file(&overrides).unwrap();
        assert_eq!(
            file.compdb.build_dir,
            Some(vec!["build".to_string(), "out/*".to_string()])
        );
        assert_eq!(file.compdb.complementers, Some(Vec::new()));
    }
}
