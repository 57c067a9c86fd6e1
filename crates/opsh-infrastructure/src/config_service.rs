//! Configuration service implementation.
//!
//! Loads `config.toml` from the config directory (`~/.config/opsh/config.toml`).

use anyhow::Result;
use opsh_core::config::{AppConfig, ConfigService};
use opsh_core::error::Result as OpshResult;
use opsh_core::OpshError;

use crate::paths::OpshPaths;
use crate::storage::{ConfigStorage, ConfigStorageError};

/// Configuration service backed by [`ConfigStorage`].
pub struct ConfigServiceImpl {
    storage: ConfigStorage,
}

impl ConfigServiceImpl {
    /// Creates a service for the default `config.toml` location.
    pub fn new() -> Result<Self> {
        let path = OpshPaths::config_file()
            .map_err(|e| anyhow::anyhow!("Failed to resolve config path: {}", e))?;
        Ok(Self {
            storage: ConfigStorage::new(path),
        })
    }

    pub fn with_storage(storage: ConfigStorage) -> Self {
        Self { storage }
    }
}

fn to_opsh_error(err: ConfigStorageError) -> OpshError {
    match err {
        ConfigStorageError::IoError(e) => e.into(),
        ConfigStorageError::TomlParseError(e) => e.into(),
        ConfigStorageError::TomlSerError(e) => e.into(),
    }
}

impl ConfigService for ConfigServiceImpl {
    fn load_config(&self) -> OpshResult<AppConfig> {
        let loaded = self.storage.load().map_err(to_opsh_error)?;
        if loaded.is_none() {
            tracing::debug!("No config at {}, using defaults", self.storage.path().display());
        }
        Ok(loaded.unwrap_or_default())
    }

    fn save_config(&self, config: &AppConfig) -> OpshResult<()> {
        self.storage.save(config).map_err(to_opsh_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsh_core::config::AuthMethod;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigServiceImpl::with_storage(ConfigStorage::new(temp_dir.path().join("config.toml")));
        assert_eq!(service.load_config().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_round_trip_auth_method() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigServiceImpl::with_storage(ConfigStorage::new(temp_dir.path().join("config.toml")));

        let mut config = service.load_config().unwrap();
        config.auth_method = Some(AuthMethod::ApiKey);
        service.save_config(&config).unwrap();

        assert!(service.load_config().unwrap().is_configured());
    }

    #[test]
    fn test_parse_error_maps_to_serialization() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        let service = ConfigServiceImpl::with_storage(ConfigStorage::new(path));
        assert!(service.load_config().unwrap_err().is_serialization());
    }
}
