//! Periodic eviction of idle boards.

use super::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

/// Background task that sweeps the registry on a fixed period until stopped.
pub struct SessionSweeper {
    handle: JoinHandle<()>,
    shutdown_sender: broadcast::Sender<()>,
}

impl SessionSweeper {
    /// Spawns the sweep loop. The first sweep runs one `period` after start.
    pub fn spawn(registry: Arc<SessionRegistry>, period: Duration) -> Self {
        let (shutdown_sender, mut shutdown_receiver) = broadcast::channel(1);

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = registry.sweep().await;
                        if removed > 0 {
                            info!("🧹 Swept {} idle board(s)", removed);
                        } else {
                            debug!("Sweep found no idle boards");
                        }
                    }
                    _ = shutdown_receiver.recv() => {
                        debug!("Session sweeper stopping");
                        break;
                    }
                }
            }
        });

        Self {
            handle,
            shutdown_sender,
        }
    }

    /// Signals the loop to exit and waits for it.
    pub async fn stop(self) {
        let _ = self.shutdown_sender.send(());
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletop_rules::Variant;

    #[tokio::test]
    async fn test_sweeps_on_schedule_and_stops() {
        let registry = Arc::new(SessionRegistry::new(Variant::Line, 20, Duration::ZERO));
        drop(registry.resolve("sweep000", true).await.unwrap());

        let sweeper = SessionSweeper::spawn(Arc::clone(&registry), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(registry.is_empty().await);

        tokio::time::timeout(Duration::from_secs(1), sweeper.stop())
            .await
            .expect("sweeper did not stop");
    }
}
