//! Translator adapter: prompt in, single command out.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use opsh_core::config::AppConfig;
use opsh_core::context::ContextBuffer;
use opsh_core::translator::Translator;
use opsh_core::{PlatformProfile, TranslationError};

use crate::prompt::build_prompt;

/// Bounded retry with linear backoff, applied to rate-limited calls only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.max_translation_attempts, config.retry_backoff_unit())
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Resolves natural-language requests into shell commands.
///
/// Does not touch the context buffer; the session records the command after
/// it runs.
#[derive(Clone)]
pub struct CommandResolver {
    translator: Arc<dyn Translator>,
    retry: RetryPolicy,
}

impl CommandResolver {
    pub fn new(translator: Arc<dyn Translator>, retry: RetryPolicy) -> Self {
        Self { translator, retry }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Builds the prompt, calls the translator and returns the cleaned command.
    pub async fn resolve(
        &self,
        user_text: &str,
        cwd: &Path,
        profile: &PlatformProfile,
        context: &ContextBuffer,
    ) -> Result<String, TranslationError> {
        let prompt = build_prompt(user_text, cwd, profile, context);
        let raw = self.translate_with_retry(&prompt).await?;
        let command = clean_command(&raw)?;
        tracing::info!(request = %user_text, command = %command, "Resolved command");
        Ok(command)
    }

    async fn translate_with_retry(&self, prompt: &str) -> Result<String, TranslationError> {
        let mut attempt = 1;
        loop {
            match self.translator.translate(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::warn!(attempt, ?delay, "Translation rate limited, retrying: {}", err);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::warn!(attempt, "Translation failed: {}", err);
                    return Err(err);
                }
            }
        }
    }
}

/// Strips markdown fencing, inline backticks and surrounding whitespace.
///
/// Empty results are [`TranslationError::Malformed`].
pub fn clean_command(raw: &str) -> Result<String, TranslationError> {
    let mut text = raw.trim();

    if let Some(fenced) = text.strip_prefix("```") {
        // Drop the language tag line, e.g. ```bash
        text = match fenced.split_once('\n') {
            Some((_, body)) => body,
            None => fenced,
        };
        text = text.trim_end().strip_suffix("```").unwrap_or(text);
        text = text.trim();
    }

    if text.len() >= 2 && text.starts_with('`') && text.ends_with('`') {
        text = text.trim_matches('`').trim();
    }

    if text.is_empty() {
        return Err(TranslationError::Malformed(
            "translator returned an empty command".to_string(),
        ));
    }

    Ok(text.to_string())
}
