//! Secret service implementation backed by `secret.json`.

use anyhow::Result;
use opsh_core::config::SecretConfig;
use opsh_core::error::Result as OpshResult;
use opsh_core::secret::SecretService;
use opsh_core::OpshError;

use crate::storage::{SecretStorage, SecretStorageError};

/// Service for managing secret configuration.
///
/// The file is read on every call so a key saved by `!auth` takes effect
/// for the next translation without rebuilding the translator.
///
/// # Example
///
/// ```ignore
/// use opsh_infrastructure::SecretServiceImpl;
/// use opsh_core::secret::SecretService;
///
/// let service = SecretServiceImpl::new()?;
/// let key = service.gemini_api_key();
/// ```
pub struct SecretServiceImpl {
    storage: SecretStorage,
}

impl SecretServiceImpl {
    /// Creates a service for the default `secret.json` location.
    pub fn new() -> Result<Self> {
        let storage = SecretStorage::new()
            .map_err(|e| anyhow::anyhow!("Failed to resolve secret path: {}", e))?;
        Ok(Self { storage })
    }

    pub fn with_storage(storage: SecretStorage) -> Self {
        Self { storage }
    }
}

impl SecretService for SecretServiceImpl {
    fn load_secrets(&self) -> OpshResult<SecretConfig> {
        match self.storage.load() {
            Ok(config) => Ok(config),
            Err(SecretStorageError::NotFound(_)) => Ok(SecretConfig::default()),
            Err(SecretStorageError::ParseError(e)) => Err(OpshError::Serialization {
                format: "JSON".to_string(),
                message: e.to_string(),
            }),
            Err(e) => Err(OpshError::io(e.to_string())),
        }
    }

    fn save_secrets(&self, secrets: &SecretConfig) -> OpshResult<()> {
        self.storage.save(secrets).map_err(|e| {
            tracing::warn!("Failed to save secret file {}: {}", self.storage.path().display(), e);
            OpshError::io(e.to_string())
        })
    }
}
