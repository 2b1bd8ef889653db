//! Configuration schema for Rackstock.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root config for the Rackstock application.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RackstockConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl RackstockConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> RackstockConfigBuilder {
        RackstockConfigBuilder::new()
    }
}

/// Builder for assembling a `RackstockConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct RackstockConfigBuilder {
    config: RackstockConfig,
}

impl RackstockConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: RackstockConfig::default(),
        }
    }

    /// Replace the local storage configuration.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Replace the AI gateway configuration.
    pub fn gateway(mut self, gateway: GatewayConfig) -> Self {
        self.config.gateway = gateway;
        self
    }

    /// Replace the chat configuration.
    pub fn chat(mut self, chat: ChatConfig) -> Self {
        self.config.chat = chat;
        self
    }

    /// Finalize and return the built `RackstockConfig`.
    pub fn build(self) -> RackstockConfig {
        self.config
    }
}

/// Where the inventory list is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory holding the key-value files.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    ".rackstock".to_string()
}

/// Generative AI service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    /// Base URL of the generative language API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model used for both image analysis and chat.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay applied before returning mock analysis data after a failure.
    #[serde(default = "default_fallback_delay_ms")]
    pub fallback_delay_ms: u64,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            fallback_delay_ms: default_fallback_delay_ms(),
        }
    }
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_fallback_delay_ms() -> u64 {
    1500
}

/// Chat screen settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChatConfig {
    /// Replaces the built-in assistant greeting when set.
    #[serde(default)]
    pub greeting: Option<String>,
}
