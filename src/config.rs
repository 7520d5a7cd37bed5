//! Bot configuration — deserialization and validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DnsUtilsError, Result};

fn default_prefix() -> String {
    "!".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("dnsutils-store.json")
}

/// Top-level configuration, parsed from TOML. Every field is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Chat lines must start with this to be treated as commands.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// JSON file backing the plugin's key-value store. Relative paths are
    /// resolved against the config file's directory by `load`.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Administrators named as recipients of admin notices.
    #[serde(default)]
    pub admins: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            store_path: default_store_path(),
            admins: Vec::new(),
        }
    }
}

impl BotConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: BotConfig =
            toml::from_str(content).map_err(|e| DnsUtilsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    ///
    /// A relative `store_path` is taken relative to the config file's
    /// directory, not the working directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DnsUtilsError::ConfigRead(path.to_path_buf(), e.to_string()))?;
        let mut config: BotConfig = toml::from_str(&content)
            .map_err(|e| DnsUtilsError::ConfigRead(path.to_path_buf(), e.to_string()))?;
        config.validate()?;
        if config.store_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.store_path = dir.join(&config.store_path);
            }
        }
        Ok(config)
    }

    /// Fail fast on settings that would make the bot unreachable.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(DnsUtilsError::InvalidConfig(
                "prefix must not be empty".to_string(),
            ));
        }
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(DnsUtilsError::InvalidConfig(format!(
                "prefix must not contain whitespace, got '{}'",
                self.prefix
            )));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(DnsUtilsError::InvalidConfig(
                "store_path must not be empty".to_string(),
            ));
        }
        if let Some(admin) = self.admins.iter().find(|a| a.trim().is_empty()) {
            return Err(DnsUtilsError::InvalidConfig(format!(
                "admin names must not be blank, got '{}'",
                admin
            )));
        }
        Ok(())
    }
}
