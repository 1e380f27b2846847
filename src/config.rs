use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{AUTO_REFRESH_SECS, CACHE_EXPIRY_SECS, REQUEST_TIMEOUT_SECS};

const APP_DIR: &str = "burnmail";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Mailbox service endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeVariant,
    /// Date column format in the message list (chrono strftime)
    #[serde(default = "default_list_date_format")]
    pub list_date_format: String,
    /// Date header format in the detail view
    #[serde(default = "default_detail_date_format")]
    pub detail_date_format: String,
    /// Whether auto-refresh starts enabled
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default(),
            list_date_format: default_list_date_format(),
            detail_date_format: default_detail_date_format(),
            auto_refresh: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    /// Pink and cyan on the terminal's own background
    #[default]
    Burn,
    /// Catppuccin Mocha palette (needs true color)
    Modern,
    #[serde(rename = "high-contrast")]
    HighContrast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_expiry_secs")]
    pub expiry_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expiry_secs: default_cache_expiry_secs(),
        }
    }
}

impl CacheConfig {
    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_secs)
    }
}

fn default_base_url() -> String {
    "https://api.mail.tm".to_string()
}

fn default_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_list_date_format() -> String {
    "%d/%m %H:%M".to_string()
}

fn default_detail_date_format() -> String {
    "%d/%m/%Y %H:%M:%S".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    AUTO_REFRESH_SECS
}

fn default_cache_expiry_secs() -> u64 {
    CACHE_EXPIRY_SECS
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join(APP_DIR);
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn cache_dir() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .context("Could not find cache directory")?
            .join(APP_DIR);
        Ok(dir)
    }

    /// Location of the message list snapshot
    pub fn cache_path() -> Result<PathBuf> {
        Ok(Self::cache_dir()?.join("inbox.json"))
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        fs::create_dir_all(Self::cache_dir()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "https://api.mail.tm");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.refresh.interval_secs, 10);
        assert_eq!(config.cache.expiry_secs, 300);
        assert!(config.cache.enabled);
        assert!(config.ui.auto_refresh);
        assert_eq!(config.ui.theme, ThemeVariant::Burn);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
            [api]
            base_url = "http://localhost:8080"

            [ui]
            theme = "high-contrast"
            auto_refresh = false

            [refresh]
            interval_secs = 30

            [cache]
            enabled = false
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ui.theme, ThemeVariant::HighContrast);
        assert!(!config.ui.auto_refresh);
        assert_eq!(config.ui.list_date_format, "%d/%m %H:%M");
        assert_eq!(config.refresh.interval(), Duration::from_secs(30));
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.expiry(), Duration::from_secs(300));
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let toml = r#"
            [api]
            timeout_secs = 0

            [refresh]
            interval_secs = 0
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.timeout(), Duration::from_secs(1));
        assert_eq!(config.refresh.interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut config = Config::default();
        config.ui.theme = ThemeVariant::Modern;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.ui.theme, ThemeVariant::Modern);
    }
}
