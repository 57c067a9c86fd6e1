//! Secret management service trait.
//!
//! Defines the interface for loading and storing the translation provider's
//! API key.

use crate::config::SecretConfig;
use crate::error::Result;

/// Environment variable consulted when `secret.json` holds no Gemini key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Service for managing secret configuration.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secret files have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration. A missing file yields an empty config.
    fn load_secrets(&self) -> Result<SecretConfig>;

    /// Persists the secret configuration.
    fn save_secrets(&self, secrets: &SecretConfig) -> Result<()>;

    /// Resolves the Gemini API key.
    ///
    /// Priority: `secret.json`, then the `GEMINI_API_KEY` environment variable.
    fn gemini_api_key(&self) -> Option<String> {
        if let Ok(secrets) = self.load_secrets() {
            if let Some(key) = secrets.gemini_api_key() {
                return Some(key.to_string());
            }
        }
        std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}
