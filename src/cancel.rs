//! Scan-wide cancellation signal
//!
//! A scan timeout fires the token; crawl tasks, probers and the fetch client
//! check it at every suspension point and stop cooperatively.

use std::future::Future;
use tokio::sync::watch;

/// Cloneable cancellation token backed by a `watch` channel
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: std::sync::Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
        }
    }

    /// Signals every clone of this token
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the token has been cancelled
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as any token clone, so this only errors
        // if every clone was dropped, in which case nothing is waiting anyway.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Runs `fut` unless the token fires first, returning `None` on cancellation
    pub async fn run<F, T>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            out = fut => Some(out),
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
