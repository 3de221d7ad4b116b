//! Quiescence-window debouncing for free-text search input.
//!
//! Each [`Debouncer::push`] cancels the pending delivery and schedules a new
//! one. A value reaches the receiver only if nothing else was pushed for a
//! full window after it.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct Debouncer<T> {
    window: Duration,
    pending: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver settled values are delivered on.
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            window,
            pending: None,
            tx,
        };
        (debouncer, rx)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `value`, superseding any delivery still waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn push(&mut self, value: T) {
        self.cancel();
        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let tx = self.tx.clone();
        let window = self.window;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Debounced input superseded");
                }
                _ = tokio::time::sleep(window) => {
                    // The receiver may be gone during shutdown.
                    let _ = tx.send(value);
                }
            }
        });
    }

    /// Drop the pending delivery, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Instant};

    const WINDOW: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_collapses_to_last_value() {
        let (mut debouncer, mut rx) = Debouncer::new(WINDOW);
        let started = Instant::now();

        debouncer.push("h".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.push("ho".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.push("hot".to_string());

        let settled = rx.recv().await.unwrap();
        assert_eq!(settled, "hot");
        assert!(started.elapsed() >= Duration::from_millis(500));

        sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_input_delivers_each_value() {
        let (mut debouncer, mut rx) = Debouncer::new(WINDOW);

        debouncer.push(1);
        sleep(Duration::from_millis(400)).await;
        debouncer.push(2);
        sleep(Duration::from_millis(400)).await;

        assert_eq!(rx.try_recv().ok(), Some(1));
        assert_eq!(rx.try_recv().ok(), Some(2));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_before_window_elapses() {
        let (mut debouncer, mut rx) = Debouncer::new(WINDOW);
        debouncer.push("q");
        sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());
        sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().ok(), Some("q"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_suppress_delivery() {
        let (mut debouncer, mut rx) = Debouncer::new(WINDOW);
        debouncer.push(1);
        debouncer.cancel();
        sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());

        debouncer.push(2);
        drop(debouncer);
        // Channel closes once the cancelled task drops its sender.
        assert_eq!(rx.recv().await, None);
    }
}
