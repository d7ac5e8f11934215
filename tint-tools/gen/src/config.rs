//! Generator Configuration
//!
//! Options read from an optional `tint.toml` next to the themes. Command-line
//! flags override whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::target::TargetKind;
use crate::GenerateError;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "tint.toml";

/// Configuration for the Tint generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format used when `--target` is not given.
    pub default_target: TargetKind,

    /// Directory for generated files. Output goes to stdout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Treat a missing or incomplete `ansi` block as an error.
    pub strict_ansi: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_target: TargetKind::Json,
            out_dir: None,
            strict_ansi: true,
        }
    }
}

impl Config {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        let content = fs::read_to_string(path).map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| GenerateError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `tint.toml` from `dir` if it exists, otherwise the defaults.
    pub fn discover(dir: &Path) -> Result<Self, GenerateError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, GenerateError> {
        toml::to_string_pretty(self).map_err(GenerateError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("default_target = \"flat\"").unwrap();
        assert_eq!(config.default_target, TargetKind::Flat);
        assert!(config.strict_ansi);
        assert_eq!(config.out_dir, None);
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = Config::default().to_toml().unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        assert!(toml::from_str::<Config>("default_target = \"yaml\"").is_err());
    }
}
