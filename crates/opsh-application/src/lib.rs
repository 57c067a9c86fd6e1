//! Application layer for opsh.
//!
//! Drives the read, dispatch, translate, confirm and execute cycle on top of
//! the domain types in `opsh-core`. Terminal I/O is abstracted behind
//! [`Console`] so the loop can be exercised with scripted input.

pub mod auth_setup;
pub mod builtins;
pub mod console;
pub mod dispatch;
pub mod interrupt;
pub mod session_loop;

pub use auth_setup::{AuthOutcome, AuthSetup, UrlOpener};
pub use console::{Console, InputEvent, Prompt, Tone};
pub use dispatch::{Action, dispatch};
pub use interrupt::{CtrlC, InterruptSource, NeverInterrupt};
pub use session_loop::{SessionLoop, SessionServices};
