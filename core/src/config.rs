//! Discovery configuration.
//!
//! Stores configuration in JSON format at `~/.scport/config.json`.
//! Everything has a sensible default, so most installs never create the file.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{Error, Result};

/// Settings for a discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Case-insensitive substrings of the client's executable path.
    /// The first process-table row containing any of them wins.
    #[serde(default = "default_matchers")]
    pub matchers: Vec<String>,

    /// Per-port HTTP probe timeout in seconds.
    #[serde(default = "default_probe_timeout_secs", rename = "probeTimeoutSecs")]
    pub probe_timeout_secs: u64,
}

fn default_matchers() -> Vec<String> {
    vec![
        // Windows install; untested against a live client.
        "StarCraft.exe".to_string(),
        // macOS bundle path.
        "StarCraft.app/Contents/MacOS/StarCraft".to_string(),
    ]
}

fn default_probe_timeout_secs() -> u64 {
    10
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            matchers: default_matchers(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

impl DiscoveryConfig {
    /// Probe timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Reads and writes [`DiscoveryConfig`] at its default location.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.scport/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        let config_path = home.join(".scport").join("config.json");
        Ok(Self { config_path })
    }

    /// Create a config store with a custom path (for testing).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Load configuration from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub async fn load(&self) -> Result<DiscoveryConfig> {
        if !self.config_path.exists() {
            return Ok(DiscoveryConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk, creating the directory if needed.
    pub async fn save(&self, config: &DiscoveryConfig) -> Result<()> {
        if let Some(dir) = self.config_path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).await.map_err(|e| {
                    Error::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
