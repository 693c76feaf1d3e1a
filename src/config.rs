//! Configuration management for Chatdesk
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ChatdeskError, Result};
use crate::storage::DEFAULT_CONVERSATIONS_KEY;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Provider types accepted by [`Config::validate`]
pub const VALID_PROVIDERS: [&str; 1] = ["demo"];

/// Main configuration structure for Chatdesk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where conversations and accounts are stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// Conversation behaviour
    #[serde(default)]
    pub chat: ChatConfig,

    /// Response provider selection and settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the embedded database
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Record key holding the conversation list
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_path() -> PathBuf {
    ProjectDirs::from("com", "chatdesk", "chatdesk")
        .map(|dirs| dirs.data_dir().join("store"))
        .unwrap_or_else(|| PathBuf::from(".chatdesk/store"))
}

fn default_storage_key() -> String {
    DEFAULT_CONVERSATIONS_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            key: default_storage_key(),
        }
    }
}

/// Chat behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Longest title, in characters, before it is cut and suffixed
    #[serde(default = "default_title_max_length")]
    pub title_max_length: usize,

    /// Suffix appended to a cut title
    #[serde(default = "default_title_ellipsis")]
    pub title_ellipsis: String,

    /// Title of a conversation with no messages yet
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,

    /// Deadline for one provider reply; 0 waits forever
    #[serde(default = "default_response_timeout")]
    pub response_timeout_seconds: u64,
}

fn default_title_max_length() -> usize {
    30
}

fn default_title_ellipsis() -> String {
    "...".to_string()
}

fn default_placeholder_title() -> String {
    "New Chat".to_string()
}

fn default_response_timeout() -> u64 {
    60
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title_max_length: default_title_max_length(),
            title_ellipsis: default_title_ellipsis(),
            placeholder_title: default_placeholder_title(),
            response_timeout_seconds: default_response_timeout(),
        }
    }
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Demo provider configuration
    #[serde(default)]
    pub demo: DemoConfig,
}

fn default_provider_type() -> String {
    "demo".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            demo: DemoConfig::default(),
        }
    }
}

/// Canned-reply provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Shortest simulated thinking time
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Longest simulated thinking time
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_min_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    2000
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged. Environment variables override the file, CLI flags override
    /// both.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line
    ///
    /// # Errors
    ///
    /// Returns `ChatdeskError::Config` if the file exists but cannot be read
    /// or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            storage: StorageConfig::default(),
            chat: ChatConfig::default(),
            provider: ProviderConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatdeskError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatdeskError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(path) = std::env::var("CHATDESK_STORAGE_PATH") {
            self.storage.path = PathBuf::from(path);
        }

        if let Ok(key) = std::env::var("CHATDESK_STORAGE_KEY") {
            self.storage.key = key;
        }

        if let Ok(max_length) = std::env::var("CHATDESK_TITLE_MAX_LENGTH") {
            if let Ok(value) = max_length.parse() {
                self.chat.title_max_length = value;
            } else {
                tracing::warn!("Invalid CHATDESK_TITLE_MAX_LENGTH: {}", max_length);
            }
        }

        if let Ok(timeout) = std::env::var("CHATDESK_RESPONSE_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.chat.response_timeout_seconds = value;
            } else {
                tracing::warn!("Invalid CHATDESK_RESPONSE_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(provider_type) = std::env::var("CHATDESK_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(min_delay) = std::env::var("CHATDESK_DEMO_MIN_DELAY_MS") {
            if let Ok(value) = min_delay.parse() {
                self.provider.demo.min_delay_ms = value;
            } else {
                tracing::warn!("Invalid CHATDESK_DEMO_MIN_DELAY_MS: {}", min_delay);
            }
        }

        if let Ok(max_delay) = std::env::var("CHATDESK_DEMO_MAX_DELAY_MS") {
            if let Ok(value) = max_delay.parse() {
                self.provider.demo.max_delay_ms = value;
            } else {
                tracing::warn!("Invalid CHATDESK_DEMO_MAX_DELAY_MS: {}", max_delay);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(path) = &cli.storage_path {
            tracing::debug!("Using storage path override: {}", path.display());
            self.storage.path = path.clone();
        }

        if let Some(provider) = &cli.provider {
            tracing::debug!("Using provider override: {}", provider);
            self.provider.provider_type = provider.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ChatdeskError::Config` if any check fails
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(ChatdeskError::Config("storage.key cannot be empty".to_string()).into());
        }

        if self.chat.title_max_length == 0 {
            return Err(ChatdeskError::Config(
                "chat.title_max_length must be greater than 0".to_string(),
            )
            .into());
        }

        if !VALID_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(ChatdeskError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                VALID_PROVIDERS.join(", ")
            ))
            .into());
        }

        if self.provider.demo.min_delay_ms > self.provider.demo.max_delay_ms {
            return Err(ChatdeskError::Config(
                "provider.demo.min_delay_ms must not exceed max_delay_ms".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use serial_test::serial;

    const ENV_VARS: [&str; 7] = [
        "CHATDESK_STORAGE_PATH",
        "CHATDESK_STORAGE_KEY",
        "CHATDESK_TITLE_MAX_LENGTH",
        "CHATDESK_RESPONSE_TIMEOUT_SECONDS",
        "CHATDESK_PROVIDER",
        "CHATDESK_DEMO_MIN_DELAY_MS",
        "CHATDESK_DEMO_MAX_DELAY_MS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_type, "demo");
        assert_eq!(config.storage.key, "ai-chatbot-conversations");
        assert_eq!(config.chat.title_max_length, 30);
        assert_eq!(config.chat.title_ellipsis, "...");
        assert_eq!(config.chat.placeholder_title, "New Chat");
        assert_eq!(config.chat.response_timeout_seconds, 60);
        assert_eq!(config.provider.demo.min_delay_ms, 1000);
        assert_eq!(config.provider.demo.max_delay_ms, 2000);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_title_length() {
        let mut config = Config::default();
        config.chat.title_max_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_provider() {
        let mut config = Config::default();
        config.provider.provider_type = "openai".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid provider type"));
    }

    #[test]
    fn test_config_validation_inverted_delays() {
        let mut config = Config::default();
        config.provider.demo.min_delay_ms = 500;
        config.provider.demo.max_delay_ms = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_valid() {
        let mut config = Config::default();
        config.chat.response_timeout_seconds = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
storage:
  path: /tmp/chatdesk-test
  key: my-chats
chat:
  title_max_length: 12
  title_ellipsis: "…"
provider:
  type: demo
  demo:
    min_delay_ms: 0
    max_delay_ms: 10
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/tmp/chatdesk-test"));
        assert_eq!(config.storage.key, "my-chats");
        assert_eq!(config.chat.title_max_length, 12);
        assert_eq!(config.chat.title_ellipsis, "…");
        assert_eq!(config.chat.placeholder_title, "New Chat");
        assert_eq!(config.provider.demo.max_delay_ms, 10);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.provider.provider_type, "demo");
        assert_eq!(config.chat.response_timeout_seconds, 60);
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        clear_env();
        let config = Config::load("/nonexistent/chatdesk.yaml", &Cli::default()).unwrap();
        assert_eq!(config.provider.provider_type, "demo");
    }

    #[test]
    #[serial]
    fn test_load_invalid_file_is_error() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "chat: [not, a, map").unwrap();
        let result = Config::load(path.to_str().unwrap(), &Cli::default());
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("CHATDESK_STORAGE_KEY", "env-key");
        std::env::set_var("CHATDESK_TITLE_MAX_LENGTH", "15");
        std::env::set_var("CHATDESK_DEMO_MAX_DELAY_MS", "5");
        std::env::set_var("CHATDESK_DEMO_MIN_DELAY_MS", "1");

        let config = Config::load("/nonexistent/chatdesk.yaml", &Cli::default()).unwrap();
        clear_env();

        assert_eq!(config.storage.key, "env-key");
        assert_eq!(config.chat.title_max_length, 15);
        assert_eq!(config.provider.demo.min_delay_ms, 1);
        assert_eq!(config.provider.demo.max_delay_ms, 5);
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_is_ignored() {
        clear_env();
        std::env::set_var("CHATDESK_RESPONSE_TIMEOUT_SECONDS", "soon");

        let config = Config::load("/nonexistent/chatdesk.yaml", &Cli::default()).unwrap();
        clear_env();

        assert_eq!(config.chat.response_timeout_seconds, 60);
    }

    #[test]
    #[serial]
    fn test_cli_overrides_env() {
        clear_env();
        std::env::set_var("CHATDESK_STORAGE_PATH", "/from/env");
        let cli = Cli {
            storage_path: Some(PathBuf::from("/from/cli")),
            provider: Some("demo".to_string()),
            ..Cli::default()
        };

        let config = Config::load("/nonexistent/chatdesk.yaml", &cli).unwrap();
        clear_env();

        assert_eq!(config.storage.path, PathBuf::from("/from/cli"));
    }
}
