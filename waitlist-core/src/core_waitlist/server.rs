//! HTTP server for the waitlist API

use super::api::build_router;
use super::state::AppState;
use crate::config::{Config, StoreBackend, StoreConfig};
use crate::core_store::{MemoryStore, StoreError, UpstashStore, WaitlistStore};
use crate::shutdown::ShutdownCoordinator;
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Construct the store selected by configuration
pub fn store_from_config(config: &StoreConfig) -> Result<Arc<dyn WaitlistStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory waitlist store; signups are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Upstash => {
            let upstash = config.upstash().ok_or_else(|| {
                StoreError::Unavailable("Upstash URL and token are not configured".to_string())
            })?;
            info!("Using Upstash waitlist store at {}", upstash.url);
            Ok(Arc::new(UpstashStore::new(upstash)?))
        }
    }
}

/// Waitlist HTTP server
pub struct WaitlistServer {
    state: Arc<AppState>,
    addr: SocketAddr,
}

impl WaitlistServer {
    pub fn new(state: AppState, addr: SocketAddr) -> Self {
        Self {
            state: Arc::new(state),
            addr,
        }
    }

    /// Build the store and state described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = store_from_config(&config.store)?;
        let state = AppState::new(store, config.admin_key());
        Ok(Self::new(state, config.server.bind_address))
    }

    /// Bind the configured address and serve until shutdown
    pub async fn run(self, shutdown: Arc<ShutdownCoordinator>) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until shutdown
    pub async fn serve(self, listener: TcpListener, shutdown: Arc<ShutdownCoordinator>) -> Result<()> {
        let router = build_router(self.state);
        let signal = shutdown.signal();

        info!("Waitlist API listening on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(signal)
            .await?;

        info!("Waitlist API stopped");
        Ok(())
    }
}
