//! Shared crawl bookkeeping: visited URLs and the URL budget

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Visited set and URL counter shared by every crawl task of one target.
///
/// Only check-and-act operations are exposed, so two tasks can never both
/// win the same URL or push the counter past its cap.
#[derive(Debug)]
pub struct CrawlState {
    visited: Mutex<HashSet<String>>,
    claimed: AtomicUsize,
    max_urls: usize,
}

impl CrawlState {
    pub fn new(max_urls: usize) -> Self {
        Self {
            visited: Mutex::new(HashSet::new()),
            claimed: AtomicUsize::new(0),
            max_urls,
        }
    }

    /// Takes one slot from the URL budget; false once the cap is reached
    pub fn try_claim_slot(&self) -> bool {
        self.claimed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_urls).then_some(n + 1)
            })
            .is_ok()
    }

    /// Inserts `url` into the visited set; true only for the first caller
    pub fn mark_visited(&self, url: &str) -> bool {
        match self.visited.lock() {
            Ok(mut visited) => visited.insert(url.to_string()),
            Err(poisoned) => poisoned.into_inner().insert(url.to_string()),
        }
    }

    pub fn claimed(&self) -> usize {
        self.claimed.load(Ordering::Acquire)
    }

    pub fn visited_count(&self) -> usize {
        match self.visited.lock() {
            Ok(visited) => visited.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
