use tokio::signal;
use tracing::{error, info};

/// Resolves once the process is asked to stop (Ctrl+C, or SIGTERM on unix).
///
/// If a signal handler cannot be installed the error is logged and that
/// source is ignored; the future then only completes through the other one.
pub async fn listen_for_shutdown() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!(service = "main", "Received Ctrl+C"),
            Err(e) => {
                error!(service = "main", "Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!(service = "main", "Received SIGTERM");
            }
            Err(e) => {
                error!(service = "main", "Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(service = "main", "Shutdown signal received, shutting down");
}
