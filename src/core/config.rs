use crate::core::cache::DEFAULT_CAPACITY;
use crate::core::currency::DEFAULT_CURRENCY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_prices() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Destination currency used when none is given on the command line
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Quote table shaped `coin id -> currency -> price`
    #[serde(default = "default_prices")]
    pub prices: Value,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            cache: CacheConfig::default(),
            prices: default_prices(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "coinfx", "coinfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
