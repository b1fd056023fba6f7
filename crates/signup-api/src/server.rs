//! HTTP server.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use signup_config::Config;

use crate::error::InitError;
use crate::instance::build_router;

/// Serves a router built from its own config on the configured address.
///
/// Independent of the process-wide instance returned by [`crate::app`].
pub struct ApiServer {
    config: Config,
}

impl ApiServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }

    /// Build the router this server serves.
    pub fn router(&self) -> Result<Router, InitError> {
        build_router(&self.config)
    }

    /// Start the server and run until Ctrl-C.
    pub async fn run(&self) -> Result<(), InitError> {
        let app = self.router()?;

        let addr: SocketAddr = self
            .addr()
            .parse()
            .map_err(|e| InitError::Addr(format!("{}: {}", self.addr(), e)))?;
        let listener = TcpListener::bind(addr).await?;

        info!("Signup bridge listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Signup bridge stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
