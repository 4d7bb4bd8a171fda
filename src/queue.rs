//! Bounded parameter queue between crawl producers and prober workers
//!
//! Producers never wait: a full queue drops the name. Workers share one
//! receiver and block until a name arrives or every producer is gone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Creates a queue with room for `capacity` pending names
pub fn param_queue(capacity: usize) -> (ParamSender, ParamReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        ParamSender {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        },
        ParamReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer side; the queue closes once every clone is dropped
#[derive(Debug, Clone)]
pub struct ParamSender {
    tx: mpsc::Sender<String>,
    dropped: Arc<AtomicU64>,
}

impl ParamSender {
    /// Enqueues `name` without waiting; returns false if it was dropped
    pub fn offer(&self, name: &str) -> bool {
        match self.tx.try_send(name.to_string()) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Names discarded because the queue was full or closed
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer side, shared by every worker of one target
#[derive(Debug, Clone)]
pub struct ParamReceiver {
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl ParamReceiver {
    /// Waits for the next name; `None` once the queue is closed and drained
    pub async fn next(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }
}
