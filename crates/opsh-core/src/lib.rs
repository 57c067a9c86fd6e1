//! Domain types for opsh: platform detection, input classification, the
//! bounded command context, and the service traits implemented by the
//! infrastructure, interaction and execution crates.

pub mod classifier;
pub mod config;
pub mod context;
pub mod dialect;
pub mod directory;
pub mod error;
pub mod exec;
pub mod platform;
pub mod secret;
pub mod session;
pub mod translator;

// Re-export common error types
pub use error::{OpshError, TranslationError};
pub use platform::{OsFamily, PlatformProfile, ShellDialect};
