//! Periodic snapshot refresh.
//!
//! Re-generates the fleet snapshot on a fixed interval and publishes each
//! one whole through a watch channel, so consumers always observe either
//! the previous snapshot or the next one, never a partial update. The feed
//! is cancelable; after [`SnapshotFeed::stop`] no further updates fire.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::generator::Generator;
use crate::model::Snapshot;

/// Dashboard refresh cadence.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

pub struct SnapshotFeed {
    receiver: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl SnapshotFeed {
    /// Generates an initial snapshot immediately, then replaces it on every
    /// interval tick until stopped.
    pub fn start(interval: Duration) -> Self {
        let first = Generator::new().generate();
        info!(
            interval_secs = interval.as_secs_f64(),
            routes = first.routes.len(),
            alerts = first.alerts.len(),
            "Starting snapshot feed"
        );
        let (tx, receiver) = watch::channel(first);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial snapshot is
            // already published.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                // The thread-local RNG is not Send, so the generator lives
                // only between awaits.
                let snapshot = Generator::new().generate();
                debug!(
                    routes = snapshot.routes.len(),
                    alerts = snapshot.alerts.len(),
                    "Replacing fleet snapshot"
                );
                if tx.send(snapshot).is_err() {
                    // Every receiver is gone; nothing left to refresh for.
                    break;
                }
            }
        });

        Self { receiver, task }
    }

    /// A receiver that observes every published snapshot, starting from the
    /// current one.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.receiver.clone()
    }

    /// Cancels the refresh task. Consumers see the channel close after any
    /// in-flight snapshot.
    pub fn stop(self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_feed_has_an_initial_snapshot() {
        let feed = SnapshotFeed::start(Duration::from_secs(600));
        let rx = feed.subscribe();

        let snapshot = rx.borrow();
        assert!((5..=8).contains(&snapshot.routes.len()));
        assert!(!snapshot.alerts.is_empty());
        drop(snapshot);

        feed.stop();
    }

    #[tokio::test]
    async fn test_feed_replaces_snapshot_on_tick() {
        let feed = SnapshotFeed::start(Duration::from_millis(10));
        let mut rx = feed.subscribe();

        let first = rx.borrow().generated_at;
        rx.changed().await.unwrap();
        let second = rx.borrow().generated_at;
        assert!(second > first);

        feed.stop();
    }

    #[tokio::test]
    async fn test_feed_stops_delivering_after_cancel() {
        let feed = SnapshotFeed::start(Duration::from_millis(10));
        let mut rx = feed.subscribe();

        feed.stop();

        // Drain any tick that raced the cancellation; the channel must then
        // close instead of delivering further snapshots.
        while rx.changed().await.is_ok() {}
    }
}
