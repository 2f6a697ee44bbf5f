//! Trailing-edge debouncer for search input
//!
//! Values sent in quick succession collapse into the last one, delivered
//! once the sender has been quiet for the configured period. Closing the
//! sender flushes the pending value instead of dropping it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer<T> {
    rx: mpsc::UnboundedReceiver<T>,
    quiet: Duration,
}

impl<T> Debouncer<T> {
    pub fn channel(quiet: Duration) -> (mpsc::UnboundedSender<T>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx, quiet })
    }

    /// Wait for the next settled value; `None` once the sender is gone and
    /// nothing is pending
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;
        loop {
            match timeout(self.quiet, self.rx.recv()).await {
                Ok(Some(value)) => latest = value,
                Ok(None) | Err(_) => return Some(latest),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let (tx, mut debouncer) = Debouncer::channel(DEFAULT_SEARCH_DEBOUNCE);

        let typing = tokio::spawn(async move {
            for text in ["k", "ki", "kit", "kitc", "kitchen"] {
                tx.send(text.to_string()).unwrap();
                sleep(Duration::from_millis(50)).await;
            }
            sleep(Duration::from_secs(5)).await;
            drop(tx);
        });

        assert_eq!(debouncer.next().await.as_deref(), Some("kitchen"));
        assert_eq!(debouncer.next().await, None);
        typing.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_quiet_period() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_millis(300));
        let start = Instant::now();

        tx.send(1).unwrap();
        let value = debouncer.next().await;

        assert_eq!(value, Some(1));
        assert!(start.elapsed() >= Duration::from_millis(300));
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending_value() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_secs(60));

        tx.send("a").unwrap();
        tx.send("ab").unwrap();
        drop(tx);

        assert_eq!(debouncer.next().await, Some("ab"));
        assert_eq!(debouncer.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts() {
        let (tx, mut debouncer) = Debouncer::channel(Duration::from_millis(300));

        tx.send("first").unwrap();
        assert_eq!(debouncer.next().await, Some("first"));

        tx.send("second").unwrap();
        tx.send("third").unwrap();
        assert_eq!(debouncer.next().await, Some("third"));
    }
}
