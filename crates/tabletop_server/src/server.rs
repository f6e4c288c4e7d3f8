//! Core server implementation.
//!
//! [`TabletopServer`] owns the session registry, the background sweeper and
//! the shutdown channel, and serves the HTTP router until told to stop.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::http;
use crate::session::{SessionRegistry, SessionSweeper};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

pub struct TabletopServer {
    /// Server configuration settings
    config: ServerConfig,

    /// Every live board of this instance
    registry: Arc<SessionRegistry>,

    /// Channel for coordinating server shutdown
    shutdown_sender: broadcast::Sender<()>,
}

impl TabletopServer {
    /// Creates a new server with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration parameters for server behavior
    ///
    /// # Returns
    ///
    /// A new `TabletopServer` instance ready to be started.
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(SessionRegistry::from_config(&config));
        let (shutdown_sender, _) = broadcast::channel(1);
        Self {
            config,
            registry,
            shutdown_sender,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Gets a handle to the session registry.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Builds the HTTP router bound to this server's registry.
    pub fn router(&self) -> Router {
        http::router(self.registry())
    }

    /// Binds the listener and serves requests until shutdown is requested.
    ///
    /// # Startup Sequence
    ///
    /// 1. Bind the TCP listener
    /// 2. Spawn the idle-board sweeper
    /// 3. Serve the router until the shutdown channel fires
    /// 4. Stop the sweeper
    ///
    /// # Returns
    ///
    /// `Ok(())` if the server started and stopped cleanly, or a `ServerError`
    /// if binding or serving failed.
    pub async fn start(&self) -> Result<(), ServerError> {
        let variant = self.config.variant;
        info!(
            "🚀 Starting {} server ({}) on {}",
            variant.title(),
            variant,
            self.config.bind_address
        );

        let listener = TcpListener::bind(self.config.bind_address)
            .await
            .map_err(|e| ServerError::Network(format!("Bind failed: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Network(format!("Listener has no address: {e}")))?;
        info!("✅ Listening on {}", local_addr);

        let sweeper = SessionSweeper::spawn(self.registry(), self.config.sweep_interval);
        info!(
            "🕒 Sweeping boards idle for more than {:?} every {:?}",
            self.config.session_expiry, self.config.sweep_interval
        );

        let mut shutdown_receiver = self.shutdown_sender.subscribe();
        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_receiver.recv().await;
                info!("Shutdown signal received");
            })
            .await;

        info!("🧹 Performing server cleanup...");
        sweeper.stop().await;
        served.map_err(|e| ServerError::Internal(format!("Server error: {e}")))?;
        info!("Server stopped");
        Ok(())
    }

    /// Initiates server shutdown.
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        info!("🛑 Shutting down server...");
        let _ = self.shutdown_sender.send(());
        Ok(())
    }
}
