//! CLI configuration
//!
//! Settings live in a TOML file under the platform config directory. Command
//! line flags take precedence over anything set here.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use kindred_core::limits;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "KINDRED_CONFIG";

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kindred")
}

/// Location of the config file
pub fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kindred")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pedigree_generations: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descendancy_generations: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ahnentafel_generations: Option<i32>,
}

impl Config {
    /// Load the config file, falling back to defaults when it is absent or unreadable
    pub fn load() -> Self {
        let path = config_file_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config")
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Every settings key, one per field
    pub fn keys() -> &'static [&'static str] {
        &[
            "data_dir",
            "format",
            "pedigree_generations",
            "descendancy_generations",
            "ahnentafel_generations",
        ]
    }

    /// A config holding what kindred uses when nothing is set
    pub fn defaults() -> Self {
        Self {
            data_dir: Some(default_data_dir()),
            format: Some(OutputFormat::default().to_string()),
            pedigree_generations: Some(limits::DEFAULT_PEDIGREE_GENERATIONS as i32),
            descendancy_generations: Some(limits::DEFAULT_DESCENDANCY_GENERATIONS as i32),
            ahnentafel_generations: Some(limits::DEFAULT_AHNENTAFEL_GENERATIONS as i32),
        }
    }

    /// Whether the file sets `key`, as opposed to leaving it at its default
    pub fn is_set(&self, key: &str) -> bool {
        match key {
            "data_dir" => self.data_dir.is_some(),
            "format" => self.format.is_some(),
            "pedigree_generations" => self.pedigree_generations.is_some(),
            "descendancy_generations" => self.descendancy_generations.is_some(),
            "ahnentafel_generations" => self.ahnentafel_generations.is_some(),
            _ => false,
        }
    }

    /// The value in effect for `key`, defaults included
    pub fn get(&self, key: &str) -> Option<String> {
        let defaults = Self::defaults();
        let generations = |own: Option<i32>, default: Option<i32>| {
            own.or(default).map(|g| g.to_string())
        };
        match key {
            "data_dir" => self
                .data_dir
                .as_ref()
                .or(defaults.data_dir.as_ref())
                .map(|p| p.display().to_string()),
            "format" => self.format.clone().or(defaults.format),
            "pedigree_generations" => {
                generations(self.pedigree_generations, defaults.pedigree_generations)
            }
            "descendancy_generations" => {
                generations(self.descendancy_generations, defaults.descendancy_generations)
            }
            "ahnentafel_generations" => {
                generations(self.ahnentafel_generations, defaults.ahnentafel_generations)
            }
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "format" => {
                let format: OutputFormat = value.parse()?;
                self.format = Some(format.to_string());
            }
            "pedigree_generations" => {
                self.pedigree_generations = Some(parse_generations(key, value)?)
            }
            "descendancy_generations" => {
                self.descendancy_generations = Some(parse_generations(key, value)?)
            }
            "ahnentafel_generations" => {
                self.ahnentafel_generations = Some(parse_generations(key, value)?)
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Drop `key` from the file so its default applies again
    pub fn unset(&mut self, key: &str) -> anyhow::Result<()> {
        match key {
            "data_dir" => self.data_dir = None,
            "format" => self.format = None,
            "pedigree_generations" => self.pedigree_generations = None,
            "descendancy_generations" => self.descendancy_generations = None,
            "ahnentafel_generations" => self.ahnentafel_generations = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

pub fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown config key: {}. Available keys: {}",
        key,
        Config::keys().join(", ")
    )
}

/// Stored generation counts must be usable as-is: 1 up to the query cap
fn parse_generations(key: &str, value: &str) -> anyhow::Result<i32> {
    let generations: i32 = value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number, got '{}'", key, value))?;
    let max = limits::MAX_TREE_GENERATIONS as i32;
    if !(1..=max).contains(&generations) {
        anyhow::bail!("{} must be between 1 and {}, got {}", key, max, generations);
    }
    Ok(generations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        assert_eq!(config.get("format").as_deref(), Some("table"));
        assert_eq!(config.get("pedigree_generations").as_deref(), Some("5"));
        assert!(!config.is_set("pedigree_generations"));

        config.set("format", "JSON").unwrap();
        config.set("pedigree_generations", "7").unwrap();
        assert_eq!(config.get("format").as_deref(), Some("json"));
        assert_eq!(config.pedigree_generations, Some(7));

        assert!(config.set("format", "xml").is_err());
        assert!(config.set("descendancy_generations", "many").is_err());
        assert!(config.set("colour", "red").is_err());
        assert!(config.get("colour").is_none());

        config.unset("pedigree_generations").unwrap();
        assert!(config.pedigree_generations.is_none());
        assert!(config.unset("colour").is_err());
    }

    #[test]
    fn test_generations_must_be_in_range() {
        let mut config = Config::default();
        config.set("ahnentafel_generations", "10").unwrap();
        assert_eq!(config.get("ahnentafel_generations").as_deref(), Some("10"));
        assert!(config.is_set("ahnentafel_generations"));

        for bad in ["0", "-2", "11"] {
            let err = config.set("pedigree_generations", bad).unwrap_err();
            assert!(err.to_string().contains("between 1 and 10"), "{}", err);
        }
        assert!(config.pedigree_generations.is_none());
        assert_eq!(config.get("descendancy_generations").as_deref(), Some("4"));
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/tree")),
            descendancy_generations: Some(3),
            ..Config::default()
        };
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.descendancy_generations, Some(3));
        assert!(loaded.format.is_none());
    }
}
