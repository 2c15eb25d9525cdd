//! Signal handling for graceful shutdown.
//!
//! The server runs until the operator stops it. This module turns the
//! platform's termination signals into one awaitable future.

use tokio::signal;
use tracing::info;

/// Waits for the operator to stop the server.
///
/// Returns once SIGINT or SIGTERM (Ctrl+C on Windows) arrives, leaving the
/// caller to stop the tick loop and print final statistics.
///
/// # Platform Support
///
/// * **Unix platforms**: Handles SIGINT and SIGTERM signals
/// * **Windows**: Handles Ctrl+C signal
///
/// # Returns
///
/// `Ok(())` when a shutdown signal is received, or the I/O error raised
/// while installing the signal listeners.
///
/// # Example
///
/// ```rust,no_run
/// # async fn run() -> std::io::Result<()> {
/// // Start the tick loop...
///
/// signals::wait_for_shutdown().await?;
///
/// // Abort the tick loop and report...
/// # Ok(())
/// # }
/// ```
pub async fn wait_for_shutdown() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                info!("📡 Received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("📡 Received SIGTERM");
            }
        }
    }

    #[cfg(windows)]
    {
        signal::ctrl_c().await?;
        info!("📡 Received Ctrl+C");
    }

    Ok(())
}
