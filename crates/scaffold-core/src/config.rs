//! User configuration
//!
//! Optional defaults read from `~/.config/create-mern-pro/config.json`.
//! Every field is optional; a missing file means built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::Paths;

/// User-level defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Preferred package manager (npm, yarn, pnpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,

    /// Templates root to use instead of the bundled one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,

    /// Default answer for "Initialize a git repository?"
    #[serde(default = "default_true")]
    pub init_git: bool,

    /// Default answer for "Install dependencies after creation?"
    #[serde(default = "default_true")]
    pub install_deps: bool,

    /// Author written into generated files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Git on, install on, nothing else set
impl Default for Config {
    fn default() -> Self {
        Self {
            package_manager: None,
            templates_dir: None,
            init_git: true,
            install_deps: true,
            author: None,
        }
    }
}

impl Config {

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Paths::new().config_file())
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded user config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = Config::load_from(&dir.path().join("config.json"))?;
        assert_eq!(config, Config::default());
        assert!(config.init_git);
        assert!(config.install_deps);
        Ok(())
    }

    #[test]
    fn test_default_matches_empty_file() -> Result<()> {
        let from_json: Config = serde_json::from_str("{}")?;
        assert_eq!(from_json, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "package_manager": "pnpm" }"#)?;

        let config = Config::load_from(&path)?;
        assert_eq!(config.package_manager.as_deref(), Some("pnpm"));
        assert!(config.init_git);
        assert!(config.templates_dir.is_none());
        Ok(())
    }

    #[test]
    fn test_written_file_reloads() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            install_deps: false,
            author: Some("Ada".to_string()),
            ..Config::default()
        };
        std::fs::create_dir_all(path.parent().unwrap())?;
        std::fs::write(&path, serde_json::to_string_pretty(&config)?)?;

        assert_eq!(Config::load_from(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
