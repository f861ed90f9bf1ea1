//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can live in
//! a config file:
//!
//! ```toml
//! # omssa.toml
//! [index]
//! alignment = "lenient"
//!
//! [modifications]
//! base = "/usr/share/omssa/mods.xml"
//! user = "usermods.xml"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use omssa::index::IndexConfig;

/// Root configuration structure for omssa.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Index building settings.
    #[serde(default)]
    pub index: IndexConfig,

    /// Modification files to load.
    #[serde(default)]
    pub modifications: ModificationsConfig,
}

/// Modification file locations.
#[derive(Debug, Default, Deserialize)]
pub struct ModificationsConfig {
    /// Base modification file (mods.xml).
    pub base: Option<PathBuf>,

    /// User modification file (usermods.xml).
    pub user: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omssa::index::AlignmentPolicy;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [index]
            alignment = "lenient"

            [modifications]
            base = "mods.xml"
            user = "usermods.xml"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.index.alignment, AlignmentPolicy::Lenient);
        assert_eq!(config.modifications.base, Some(PathBuf::from("mods.xml")));
        assert_eq!(config.modifications.user, Some(PathBuf::from("usermods.xml")));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [modifications]
            user = "usermods.xml"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.index.alignment, AlignmentPolicy::Strict);
        assert_eq!(config.modifications.base, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.index, IndexConfig::default());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(Config::from_str("[index]\nalignment = \"sloppy\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("omssa.toml");
        std::fs::write(&path, "[index]\nalignment = \"lenient\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.index.alignment, AlignmentPolicy::Lenient);
        assert!(Config::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
