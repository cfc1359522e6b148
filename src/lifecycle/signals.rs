//! OS signal handling.

use crate::lifecycle::Shutdown;

/// Wait for ctrl-c, then trigger shutdown.
pub async fn shutdown_on_ctrl_c(shutdown: Shutdown) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        return;
    }
    tracing::info!("Ctrl-C received, shutting down");
    shutdown.trigger();
}
