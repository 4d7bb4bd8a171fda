//! Scan engine: per-target lifecycle
//!
//! One scan runs the crawler and a fixed pool of prober workers side by side.
//! The crawler feeds parameter names into a bounded queue; workers pull from
//! it, skip names another worker already took, and probe the rest against
//! the target URL.

pub mod context;
pub mod markers;
pub mod reflection;

use crate::cancel::CancelToken;
use crate::crawler::Crawler;
use crate::error::Result;
use crate::http::{Fetch, HttpClient};
use crate::models::{Finding, ScanConfig, ScanOutcome, Target};
use crate::queue::param_queue;
use crate::report::ReportSink;
use markers::{MarkerSource, RandomMarkers};
use reflection::ReflectionProber;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Parameter names already handed to a prober for the current target
#[derive(Debug, Default)]
pub struct ProcessedParams {
    seen: Mutex<HashSet<String>>,
}

impl ProcessedParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` as taken; true only for the first caller
    pub async fn claim(&self, name: &str) -> bool {
        let mut seen = self.seen.lock().await;
        if seen.contains(name) {
            return false;
        }
        seen.insert(name.to_string())
    }

    pub async fn len(&self) -> usize {
        self.seen.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.seen.lock().await.is_empty()
    }
}

/// Runs reflected-parameter scans, one target at a time
pub struct ScanEngine {
    config: ScanConfig,
    fetcher: Arc<dyn Fetch>,
    markers: Arc<dyn MarkerSource>,
    reporter: Arc<dyn ReportSink>,
}

impl ScanEngine {
    /// Creates an engine backed by the HTTP client
    pub fn new(config: ScanConfig, reporter: Arc<dyn ReportSink>) -> Result<Self> {
        let client = HttpClient::from_config(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(client), reporter))
    }

    /// Creates an engine that fetches through `fetcher`
    pub fn with_fetcher(
        config: ScanConfig,
        fetcher: Arc<dyn Fetch>,
        reporter: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            config,
            fetcher,
            markers: Arc::new(RandomMarkers),
            reporter,
        }
    }

    /// Replaces the marker source
    pub fn with_markers(mut self, markers: Arc<dyn MarkerSource>) -> Self {
        self.markers = markers;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scans one target to completion or until the scan timeout fires
    pub async fn scan(&self, raw_target: &str) -> Result<ScanOutcome> {
        let target = Target::parse(raw_target)?;
        let started = Instant::now();
        info!("Scanning {} (scope: {})", target.url, target.host);

        let cancel = CancelToken::new();
        let (params_tx, params_rx) = param_queue(self.config.queue_capacity);

        let crawler = Crawler::new(
            Arc::clone(&self.fetcher),
            &target,
            &self.config,
            params_tx.clone(),
            cancel.clone(),
        );
        let (crawl_done_tx, crawl_done_rx) = oneshot::channel();
        let root = target.url.clone();
        let crawl_task = tokio::spawn(async move {
            crawler.run(&root).await;
            let _ = crawl_done_tx.send(());
        });

        let prober = Arc::new(ReflectionProber::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.markers),
            self.config.strict,
            cancel.clone(),
        ));
        let processed = Arc::new(ProcessedParams::new());
        let findings: Arc<Mutex<Vec<Finding>>> = Arc::new(Mutex::new(Vec::new()));

        let mut workers = JoinSet::new();
        for _ in 0..self.config.workers.max(1) {
            let rx = params_rx.clone();
            let prober = Arc::clone(&prober);
            let processed = Arc::clone(&processed);
            let findings = Arc::clone(&findings);
            let reporter = Arc::clone(&self.reporter);
            let cancel = cancel.clone();
            let base_url = target.url.clone();

            workers.spawn(async move {
                while let Some(Some(param)) = cancel.run(rx.next()).await {
                    if !processed.claim(&param).await {
                        continue;
                    }
                    debug!("Probing parameter '{param}'");
                    if let Some(finding) = prober.probe(&base_url, &param).await {
                        reporter.emit(&finding);
                        findings.lock().await.push(finding);
                    }
                }
            });
        }
        drop(params_rx);

        let timed_out = tokio::select! {
            _ = tokio::time::sleep(self.config.scan_timeout()) => true,
            _ = crawl_done_rx => false,
        };

        if timed_out {
            info!("Scan timeout reached for {}, cancelling outstanding work", target.url);
            cancel.cancel();
            crawl_task.abort();
            workers.abort_all();
        } else {
            let elapsed = started.elapsed();
            let min_duration = self.config.min_scan_duration();
            if elapsed < min_duration {
                tokio::time::sleep(min_duration - elapsed).await;
            }

            // Last sender: closing it lets workers drain the queue and exit
            drop(params_tx);
            while let Some(joined) = workers.join_next().await {
                if let Err(e) = joined {
                    debug!("Worker task failed: {e}");
                }
            }
        }

        let findings = findings.lock().await.clone();
        let outcome = ScanOutcome {
            target: target.url,
            params_probed: processed.len().await,
            findings,
            timed_out,
            elapsed: started.elapsed(),
        };
        info!(
            "Scan of {} finished in {:?}: {} parameters probed, {} reflected",
            outcome.target,
            outcome.elapsed,
            outcome.params_probed,
            outcome.findings.len()
        );
        Ok(outcome)
    }
}
