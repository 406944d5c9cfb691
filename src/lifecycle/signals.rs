//! OS signal handling.
//!
//! SIGINT, SIGTERM, SIGHUP and SIGQUIT all request a graceful shutdown on
//! unix; elsewhere only Ctrl-C is watched. A handler that cannot be
//! installed is logged and simply never fires.

use std::future::pending;

/// Wait for the first shutdown signal and return its name.
#[cfg(unix)]
pub async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::SignalKind;

    tokio::select! {
        _ = interrupt() => "SIGINT",
        _ = unix_signal(SignalKind::terminate(), "SIGTERM") => "SIGTERM",
        _ = unix_signal(SignalKind::hangup(), "SIGHUP") => "SIGHUP",
        _ = unix_signal(SignalKind::quit(), "SIGQUIT") => "SIGQUIT",
    }
}

/// Wait for the first shutdown signal and return its name.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> &'static str {
    interrupt().await;
    "CTRL-C"
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn unix_signal(kind: tokio::signal::unix::SignalKind, name: &'static str) {
    match tokio::signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!(signal = name, error = %e, "Failed to install signal handler");
            pending::<()>().await;
        }
    }
}
