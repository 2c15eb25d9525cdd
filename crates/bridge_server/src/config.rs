//! Configuration management for the bridge server.
//!
//! The configuration is a TOML file with four sections:
//!
//! - `[host]` - game loop speed, reported platform version and worlds
//! - `[provider]` - which native faction plugin the host installs
//! - `[bridge]` - the options passed to `connect`
//! - `[logging]` - level and output format

use factions_bridge::BridgeOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

fn default_tick_interval() -> u64 {
    50 // 20 ticks per second
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub host: HostSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub bridge: BridgeOptions,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSettings {
    /// Length of one scheduler tick in milliseconds
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Reported in discovery diagnostics
    pub platform_version: String,
    /// Worlds created at startup
    pub worlds: Vec<String>,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            platform_version: format!("bridge_server {}", env!("CARGO_PKG_VERSION")),
            worlds: vec!["world".to_string()],
        }
    }
}

/// The native faction plugin to install into the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderInstall {
    #[default]
    FactionsUuid,
    Saber,
    Massive,
    Medieval,
    None,
}

impl FromStr for ProviderInstall {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "factions_uuid" | "factionsuuid" => Ok(Self::FactionsUuid),
            "saber" => Ok(Self::Saber),
            "massive" => Ok(Self::Massive),
            "medieval" => Ok(Self::Medieval),
            "none" => Ok(Self::None),
            other => Err(format!("unknown provider plugin: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub install: ProviderInstall,
    /// Saber builds before the field rename (`points`/`strikes`)
    #[serde(default)]
    pub saber_legacy_fields: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, a default configuration file is written at
    /// `path` and the defaults are returned.
    pub async fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.host.tick_interval_ms == 0 {
            return Err("Tick interval must be greater than zero".to_string());
        }

        if self.host.worlds.is_empty() {
            return Err("At least one world must be configured".to_string());
        }
        if let Some(blank) = self.host.worlds.iter().find(|w| w.trim().is_empty()) {
            return Err(format!("Invalid world name: {blank:?}"));
        }

        if self.bridge.poll_interval_ticks == 0 {
            return Err("Poll interval must be at least one tick".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};
    use tokio::fs;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.host.tick_interval_ms, 50);
        assert_eq!(config.host.worlds, vec!["world".to_string()]);
        assert_eq!(config.provider.install, ProviderInstall::FactionsUuid);
        assert!(!config.provider.saber_legacy_fields);
        assert_eq!(config.bridge, BridgeOptions::default());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bridge.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        // The written defaults load back unchanged
        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded, config);
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[host]
tick_interval_ms = 25
platform_version = "Paper 1.20.4"
worlds = ["world", "world_nether"]

[provider]
install = "saber"
saber_legacy_fields = true

[bridge]
require_provider = true
poll_interval_ticks = 40

[logging]
level = "debug"
json_format = true
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), toml_content).await.unwrap();

        let config = AppConfig::load_from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.host.tick_interval_ms, 25);
        assert_eq!(config.host.platform_version, "Paper 1.20.4");
        assert_eq!(config.host.worlds.len(), 2);
        assert_eq!(config.provider.install, ProviderInstall::Saber);
        assert!(config.provider.saber_legacy_fields);
        assert!(config.bridge.require_provider);
        assert_eq!(config.bridge.poll_interval_ticks, 40);
        // Unset bridge options keep their defaults
        assert!(config.bridge.console_output);
        assert_eq!(config.bridge.create_event_delay_ticks, 1);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[tokio::test]
    async fn test_missing_sections_use_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[provider]\ninstall = \"medieval\"\n")
            .await
            .unwrap();

        let config = AppConfig::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.provider.install, ProviderInstall::Medieval);
        assert_eq!(config.host, HostSettings::default());
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[provider]\ninstall = \"towny\"\n")
            .await
            .unwrap();

        assert!(AppConfig::load_from_file(temp_file.path()).await.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.host.tick_interval_ms = 0;
        assert!(config.validate().unwrap_err().contains("Tick interval"));

        let mut config = AppConfig::default();
        config.host.worlds.clear();
        assert!(config.validate().unwrap_err().contains("world"));

        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().unwrap_err().contains("Invalid log level"));

        let mut config = AppConfig::default();
        config.bridge.poll_interval_ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_names() {
        let parse = |name: &str| name.parse::<ProviderInstall>();
        assert_eq!(parse("factions_uuid"), Ok(ProviderInstall::FactionsUuid));
        assert_eq!(parse("Massive"), Ok(ProviderInstall::Massive));
        assert_eq!(parse("none"), Ok(ProviderInstall::None));
        assert!("towny".parse::<ProviderInstall>().is_err());
    }
}
