//! Termination signals.
//!
//! Handlers are installed when [`shutdown_signal`] is called, not when the
//! returned future is first polled. A signal that arrives while the relay is
//! still starting up is held until the loop looks at it.

use std::future::Future;

use crate::error::Result;

/// Install SIGINT/SIGTERM handlers and return a future resolving on either.
#[cfg(unix)]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => tracing::info!("Received SIGINT"),
            _ = terminate.recv() => tracing::info!("Received SIGTERM"),
        }
    })
}

/// Install a ctrl-c handler and return a future resolving on it.
#[cfg(windows)]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        ctrl_c.recv().await;
        tracing::info!("Received ctrl-c");
    })
}
