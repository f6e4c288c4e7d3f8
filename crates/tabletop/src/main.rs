//! Main application entry point for the tabletop server.
//!
//! Parses the command line, loads and validates the TOML configuration,
//! installs logging and serves one game variant until a termination signal
//! arrives.

mod cli;
mod config;
mod logging;
mod signals;

use anyhow::Context;
use cli::CliArgs;
use config::AppConfig;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tabletop_server::TabletopServer;
use tracing::{error, info, warn};

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Folds command-line overrides into the file configuration.
fn apply_overrides(config: &mut AppConfig, args: &CliArgs) {
    if let Some(bind_address) = &args.bind_address {
        config.server.bind_address = Some(bind_address.clone());
    }
    if let Some(variant) = args.variant {
        config.server.variant = variant;
    }
    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }
}

/// The running application: validated configuration plus the server it drives.
pub struct Application {
    config: AppConfig,
    server: Arc<TabletopServer>,
}

impl Application {
    /// Loads configuration, applies CLI overrides and sets up logging.
    pub async fn new(args: CliArgs) -> anyhow::Result<Self> {
        let mut config = AppConfig::load_from_file(&args.config_path)
            .await
            .with_context(|| format!("Failed to load {}", args.config_path.display()))?;
        apply_overrides(&mut config, &args);

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
        logging::setup_logging(&config.logging)?;

        info!("📂 Config: {}", args.config_path.display());
        Self::from_config(config)
    }

    /// Builds the application from an already validated configuration.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let server_config = config.to_server_config()?;
        let server = Arc::new(TabletopServer::new(server_config));
        Ok(Self { config, server })
    }

    /// Serves until SIGINT or SIGTERM.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(signals::wait_for_shutdown()).await
    }

    /// Serves until `shutdown` resolves or the server stops on its own.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = std::io::Result<()>>,
    {
        let variant = self.config.server.variant;
        info!("🌟 Starting {} server", variant.title());
        info!("📋 Configuration Summary:");
        info!("  🎲 Variant: {}", variant);
        info!("  ⏱️ Board expiry: {}s", self.config.sessions.expiry_secs);
        info!("  🧹 Sweep interval: {}s", self.config.sessions.sweep_interval_secs);
        info!("  ↩️ Undo depth: {}", self.config.sessions.history_depth);

        let mut server_task = {
            let server = Arc::clone(&self.server);
            tokio::spawn(async move { server.start().await })
        };

        tokio::select! {
            finished = &mut server_task => {
                // The server only returns on its own when it failed to start
                finished??;
                return Ok(());
            }
            signal = shutdown => {
                signal.context("Signal handling failed")?;
            }
        }

        info!("🛑 Shutdown signal received, initiating graceful shutdown...");
        self.server.shutdown().await?;

        match tokio::time::timeout(SHUTDOWN_GRACE, &mut server_task).await {
            Ok(finished) => finished??,
            Err(_) => {
                warn!("⏳ Server did not stop within {:?}, aborting", SHUTDOWN_GRACE);
                server_task.abort();
            }
        }

        info!("👋 Tabletop server shutdown complete");
        Ok(())
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let args = CliArgs::parse();

    let app = match Application::new(args).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("❌ Failed to start application: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run().await {
        error!("❌ Application error: {:?}", e);
        std::process::exit(1);
    }
}
