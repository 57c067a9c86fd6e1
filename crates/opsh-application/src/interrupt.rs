//! Interrupt delivery while the loop is waiting on something other than input.

use async_trait::async_trait;

/// Resolves when the user asks to abandon the current step.
#[async_trait]
pub trait InterruptSource: Send + Sync {
    async fn wait(&self);
}

/// Ctrl-C from the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CtrlC;

#[async_trait]
impl InterruptSource for CtrlC {
    async fn wait(&self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::debug!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Never fires. Used for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInterrupt;

#[async_trait]
impl InterruptSource for NeverInterrupt {
    async fn wait(&self) {
        std::future::pending::<()>().await;
    }
}
