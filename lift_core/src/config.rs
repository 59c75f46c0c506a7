//! Configuration file support for Lift.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lift/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Unit shown in suggestion messages
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Lbs => write!(f, "lbs"),
            WeightUnit::Kg => write!(f, "kg"),
        }
    }
}

/// Progression engine parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Whole days that must pass after an accepted progression
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: i64,

    /// Drop zero-weight, zero-rep sets before evaluating a session
    #[serde(default)]
    pub skip_placeholder_sets: bool,

    #[serde(default)]
    pub weight_unit: WeightUnit,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            cooldown_days: default_cooldown_days(),
            skip_placeholder_sets: false,
            weight_unit: WeightUnit::default(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("lift")
}

fn default_cooldown_days() -> i64 {
    7
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the progression engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.progression.cooldown_days < 0 {
            return Err(Error::Config(format!(
                "cooldown_days must not be negative, got {}",
                self.progression.cooldown_days
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("lift").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.progression.cooldown_days, 7);
        assert!(!config.progression.skip_placeholder_sets);
        assert_eq!(config.progression.weight_unit, WeightUnit::Lbs);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[progression]
weight_unit = "kg"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.progression.weight_unit, WeightUnit::Kg);
        assert_eq!(config.progression.cooldown_days, 7); // default
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("lift").join("config.toml");

        let mut config = Config::default();
        config.progression.cooldown_days = 10;
        config.progression.skip_placeholder_sets = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.progression.cooldown_days, 10);
        assert!(loaded.progression.skip_placeholder_sets);
    }

    #[test]
    fn test_negative_cooldown_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[progression]\ncooldown_days = -1\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
