//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section and
//! field has a default so a missing or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reply delay used by the template responder, in milliseconds.
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1500;

/// Log level used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

/// Which key-value store backs the buddy collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Overrides the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub reply_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.chat.reply_delay_ms, 1500);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage.backend, StorageBackend::File);
    }

    #[test]
    fn test_partial_document() {
        let config: AppConfig = toml::from_str(
            r#"
[storage]
backend = "memory"

[chat]
reply_delay_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.chat.reply_delay_ms, 0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(PathBuf::from("/tmp/buddies"));
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
