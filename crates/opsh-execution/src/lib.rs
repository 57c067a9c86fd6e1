//! Host-shell execution for opsh.
//!
//! [`ShellExecutor`] runs commands in a child shell under a deadline and
//! performs directory changes in-process. [`logging`] wires up the file log.

pub mod browser;
pub mod directory;
pub mod executor;
pub mod logging;

pub use browser::open_url;
pub use directory::change_directory;
pub use executor::ShellExecutor;
