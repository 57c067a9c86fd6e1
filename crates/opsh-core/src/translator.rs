//! Translation capability contract.

use async_trait::async_trait;

use crate::error::TranslationError;

/// The remote capability that turns a prompt into a shell command.
///
/// Implementations make exactly one attempt per call; retrying is the
/// caller's decision.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, prompt: &str) -> Result<String, TranslationError>;
}
