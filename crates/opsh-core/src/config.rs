use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::Result;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_MAX_TRANSLATION_ATTEMPTS: u32 = 3;

/// How the user authenticated with the translation provider.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuthMethod {
    ApiKey,
}

/// Contents of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Unset until first-run setup completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<AuthMethod>,
    pub model: String,
    pub command_timeout_secs: u64,
    pub retry_backoff_ms: u64,
    pub max_translation_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_method: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            max_translation_attempts: DEFAULT_MAX_TRANSLATION_ATTEMPTS,
        }
    }
}

impl AppConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs.max(1))
    }

    pub fn retry_backoff_unit(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// True once first-run setup has recorded an auth method.
    pub fn is_configured(&self) -> bool {
        self.auth_method.is_some()
    }

    /// Human-readable auth method for `!version`.
    pub fn auth_label(&self) -> String {
        self.auth_method
            .map(|m| m.to_string())
            .unwrap_or_else(|| "not configured".to_string())
    }
}

/// Contents of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl SecretConfig {
    /// Returns the Gemini key if one is set and non-empty.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .map(|g| g.api_key.trim())
            .filter(|key| !key.is_empty())
    }

    /// Returns a copy with the Gemini key replaced, keeping any model override.
    pub fn with_gemini_api_key(&self, api_key: impl Into<String>) -> Self {
        let model_name = self.gemini.as_ref().and_then(|g| g.model_name.clone());
        Self {
            gemini: Some(GeminiConfig {
                api_key: api_key.into(),
                model_name,
            }),
        }
    }
}

/// Load/save access to `config.toml`.
pub trait ConfigService: Send + Sync {
    /// Loads the configuration; a missing file yields defaults.
    fn load_config(&self) -> Result<AppConfig>;

    fn save_config(&self, config: &AppConfig) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.command_timeout(), Duration::from_secs(60));
        assert_eq!(config.max_translation_attempts, 3);
        assert!(!config.is_configured());
        assert_eq!(config.auth_label(), "not configured");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("auth_method = \"api_key\"\ncommand_timeout_secs = 5\n").unwrap();
        assert_eq!(config.auth_method, Some(AuthMethod::ApiKey));
        assert_eq!(config.command_timeout_secs, 5);
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.auth_label(), "api_key");
    }

    #[test]
    fn test_gemini_api_key_ignores_blank() {
        let blank = SecretConfig::default().with_gemini_api_key("   ");
        assert_eq!(blank.gemini_api_key(), None);

        let set = SecretConfig::default().with_gemini_api_key("abc123");
        assert_eq!(set.gemini_api_key(), Some("abc123"));
    }

    #[test]
    fn test_with_gemini_api_key_keeps_model() {
        let secrets = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "old".into(),
                model_name: Some("gemini-pro".into()),
            }),
        };
        let updated = secrets.with_gemini_api_key("new");
        let gemini = updated.gemini.unwrap();
        assert_eq!(gemini.api_key, "new");
        assert_eq!(gemini.model_name.as_deref(), Some("gemini-pro"));
    }
}
