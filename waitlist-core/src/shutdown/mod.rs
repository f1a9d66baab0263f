//! Graceful shutdown coordination
//!
//! Shutdown is a latched flag on a `watch` channel: once requested it stays
//! requested, so a component that subscribes late still sees it. The HTTP
//! server stops accepting connections when the flag flips; in-flight requests
//! are allowed to finish.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Shutdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    ShuttingDown,
}

/// Broadcasts shutdown to every subscriber
pub struct ShutdownCoordinator {
    shutdown_tx: watch::Sender<bool>,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self { shutdown_tx }
    }

    /// Initiate shutdown. Later calls are ignored.
    pub fn shutdown(&self) {
        if self.shutdown_tx.send_replace(true) {
            warn!("Shutdown already in progress");
            return;
        }
        info!("Initiating graceful shutdown");
    }

    pub fn state(&self) -> ShutdownState {
        if *self.shutdown_tx.borrow() {
            ShutdownState::ShuttingDown
        } else {
            ShutdownState::Running
        }
    }

    /// Future that resolves once shutdown has been requested, including
    /// requests made before this call
    pub fn signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown_tx.subscribe();
        async move {
            // Err only if the coordinator is dropped; treat that as shutdown too.
            let _ = rx.wait_for(|requested| *requested).await;
        }
    }
}

/// Install signal handlers for graceful shutdown
#[cfg(unix)]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        }
        coordinator.shutdown();
    });

    Ok(())
}

/// Install signal handlers for graceful shutdown (Windows)
#[cfg(windows)]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) -> std::io::Result<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C"),
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
        coordinator.shutdown();
    });

    Ok(())
}
