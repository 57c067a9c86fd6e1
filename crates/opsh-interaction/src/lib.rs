//! Natural-language to shell-command translation.
//!
//! [`GeminiApiAgent`] talks to the remote model; [`CommandResolver`] builds
//! the prompt, retries rate-limited calls and cleans up the returned text.

pub mod gemini_api_agent;
pub mod prompt;
pub mod resolver;

pub use gemini_api_agent::GeminiApiAgent;
pub use prompt::build_prompt;
pub use resolver::{CommandResolver, RetryPolicy, clean_command};
