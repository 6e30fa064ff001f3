//! Configurator configuration.

use crate::error::ConfiguratorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use turbo_commerce::Currency;
use turbo_data::FetchClient;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Malformed product data fails fast.
    Development,
    /// Malformed product data degrades to the default variant.
    #[default]
    Production,
}

/// Configurator configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfiguratorConfig {
    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// Currency prices are reported in.
    #[serde(default)]
    pub currency: Currency,

    /// Backend API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Variant resolution configuration.
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

impl ConfiguratorConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfiguratorError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfiguratorError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfiguratorError> {
        toml::from_str(content).map_err(|e| ConfiguratorError::Config(e.to_string()))
    }

    /// Parse a JSON document.
    pub fn from_json(content: &str) -> Result<Self, ConfiguratorError> {
        serde_json::from_str(content).map_err(|e| ConfiguratorError::Config(e.to_string()))
    }

    /// Build an HTTP client for the configured backend.
    pub fn fetch_client(&self) -> Result<FetchClient, ConfiguratorError> {
        Ok(FetchClient::with_timeout(self.api.timeout())?.with_base_url(&self.api.base_url))
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the endpoint paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Variant resolution configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Delay between the last qualifying selection change and the lookup.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl ResolutionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}
