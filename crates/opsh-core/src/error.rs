//! Error types for opsh.

use thiserror::Error;

use crate::directory::DirectoryChangeError;

/// Failure of the external translation capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// Provider returned HTTP 429 or a quota error.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// No API key is configured.
    #[error("No API key configured")]
    AuthMissing,

    /// The configured API key was rejected.
    #[error("API key rejected: {0}")]
    AuthInvalid(String),

    /// Transport or server-side failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered but the text is not a usable command.
    #[error("Unusable response: {0}")]
    Malformed(String),
}

impl TranslationError {
    /// Only rate limiting is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Check if the user must reconfigure credentials
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthMissing | Self::AuthInvalid(_))
    }
}

/// A shared error type for the entire opsh workspace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpshError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Security/authentication error
    #[error("Security error: {0}")]
    Security(String),

    /// Command execution error
    #[error("Execution error: {0}")]
    Execution(String),

    /// Directory change target invalid
    #[error("{0}")]
    Path(#[from] DirectoryChangeError),

    /// Translation capability failure
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OpshError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::Security(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// Returns the translation failure, if this is one.
    pub fn as_translation(&self) -> Option<&TranslationError> {
        match self {
            Self::Translation(err) => Some(err),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for OpshError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for OpshError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for OpshError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for OpshError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for OpshError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, OpshError>`.
pub type Result<T> = std::result::Result<T, OpshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_error_predicates() {
        assert!(TranslationError::RateLimited("429".into()).is_retryable());
        assert!(!TranslationError::Network("reset".into()).is_retryable());
        assert!(!TranslationError::AuthMissing.is_retryable());
        assert!(TranslationError::AuthMissing.is_auth());
        assert!(TranslationError::AuthInvalid("bad key".into()).is_auth());
        assert!(!TranslationError::Malformed("empty".into()).is_auth());
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: OpshError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is_io());
        assert!(err.to_string().contains("NotFound"));
    }

    #[test]
    fn test_translation_conversion() {
        let err: OpshError = TranslationError::AuthMissing.into();
        assert_eq!(err.as_translation(), Some(&TranslationError::AuthMissing));
        assert_eq!(err.to_string(), "No API key configured");
    }

    #[test]
    fn test_path_conversion() {
        let err: OpshError = DirectoryChangeError::NotFound { path: "/x".into() }.into();
        assert!(err.is_path());
        assert_eq!(err.to_string(), "cd: /x: No such file or directory");
    }
}
