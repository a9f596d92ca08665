//! Shutdown coordination for the service.

use std::time::Duration;

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that the HTTP server and any background
/// tasks subscribe to.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger shutdown, then wait up to `grace` for `task` to finish.
    ///
    /// Returns `false` if the deadline passed first.
    pub async fn drain<T>(&self, task: tokio::task::JoinHandle<T>, grace: Duration) -> bool {
        self.trigger();
        match tokio::time::timeout(grace, task).await {
            Ok(_) => true,
            Err(_) => {
                tracing::warn!(grace_secs = grace.as_secs(), "Shutdown grace period elapsed, forcing exit");
                false
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
