//! Interactive API key setup, used on first run and by `!auth`.

use std::sync::Arc;

use opsh_core::config::{AuthMethod, ConfigService};
use opsh_core::error::Result;
use opsh_core::secret::SecretService;

use crate::builtins::API_KEY_URL;
use crate::console::{Console, InputEvent, Prompt, Tone};

/// Callback that opens a URL in the user's browser.
pub type UrlOpener = Arc<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// A key was saved and the auth method recorded.
    Configured,
    /// The user entered no key; nothing changed.
    Skipped,
    /// The user interrupted or input ended; nothing changed.
    Abandoned,
}

/// Walks the user through obtaining and saving a Gemini API key.
pub struct AuthSetup {
    secrets: Arc<dyn SecretService>,
    config: Arc<dyn ConfigService>,
    opener: UrlOpener,
}

impl AuthSetup {
    pub fn new(
        secrets: Arc<dyn SecretService>,
        config: Arc<dyn ConfigService>,
        opener: UrlOpener,
    ) -> Self {
        Self {
            secrets,
            config,
            opener,
        }
    }

    /// True once first-run setup has completed.
    pub fn is_configured(&self) -> bool {
        self.config
            .load_config()
            .map(|config| config.is_configured())
            .unwrap_or(false)
    }

    pub fn has_api_key(&self) -> bool {
        self.secrets.gemini_api_key().is_some()
    }

    /// Auth method label for `!version`.
    pub fn auth_label(&self) -> String {
        self.config
            .load_config()
            .map(|config| config.auth_label())
            .unwrap_or_else(|_| "not configured".to_string())
    }

    pub fn run<C: Console + ?Sized>(&self, console: &mut C) -> Result<AuthOutcome> {
        console.blank_line();
        console.print(Tone::Heading, "🔐 OpenSH Setup");
        console.blank_line();
        console.print(Tone::Plain, "OpenSH uses Google's Gemini AI to understand your requests.");
        console.print(Tone::Plain, "You need a free API key from Google AI Studio.");
        console.blank_line();
        console.print(Tone::Accent, &format!("→ Get your key at: {API_KEY_URL}"));
        console.print(Tone::Muted, "  (Takes ~30 seconds - just click 'Create API Key')");
        console.blank_line();

        let answer = match console.read_line(Prompt::Question {
            text: "Open Google AI Studio in browser? [Y/n]:",
        }) {
            InputEvent::Line(answer) => answer,
            InputEvent::Interrupted | InputEvent::Eof => return Ok(AuthOutcome::Abandoned),
        };
        if !answer.trim().eq_ignore_ascii_case("n") {
            match (self.opener)(API_KEY_URL) {
                Ok(()) => console.print(
                    Tone::Muted,
                    "Browser opened. Copy your API key and paste it below.",
                ),
                Err(_) => console.print(
                    Tone::Warning,
                    &format!("Could not open a browser. Visit {API_KEY_URL}"),
                ),
            }
            console.blank_line();
        }

        let key = match console.read_line(Prompt::Question {
            text: "Paste your Gemini API key:",
        }) {
            InputEvent::Line(key) => key.trim().to_string(),
            InputEvent::Interrupted | InputEvent::Eof => return Ok(AuthOutcome::Abandoned),
        };
        if key.is_empty() {
            console.print(Tone::Plain, "No API key provided.");
            return Ok(AuthOutcome::Skipped);
        }

        self.save_key(&key)?;
        console.print(Tone::Success, "✓ API key saved!");
        console.blank_line();
        Ok(AuthOutcome::Configured)
    }

    fn save_key(&self, key: &str) -> Result<()> {
        // An unreadable secret file is replaced rather than blocking setup
        let secrets = self.secrets.load_secrets().unwrap_or_else(|e| {
            tracing::warn!("Replacing unreadable secret file: {}", e);
            Default::default()
        });
        self.secrets.save_secrets(&secrets.with_gemini_api_key(key))?;

        let mut config = self.config.load_config()?;
        config.auth_method = Some(AuthMethod::ApiKey);
        self.config.save_config(&config)?;

        tracing::info!("Saved Gemini API key");
        Ok(())
    }
}
