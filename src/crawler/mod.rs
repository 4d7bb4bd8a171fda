//! Web crawler for parameter discovery
//!
//! Recursive crawler: every page spawns one task per in-scope link and waits
//! for all of them before returning. Fan-out is bounded by a fetch semaphore,
//! a global URL budget and a depth cap. Query parameter names seen on any URL
//! are pushed into the parameter queue as they are found.

pub mod extractor;
pub mod state;

use crate::cancel::CancelToken;
use crate::http::Fetch;
use crate::models::{ScanConfig, Target};
use crate::queue::ParamSender;
use futures::future::BoxFuture;
use futures::FutureExt;
use state::CrawlState;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;
use url::Url;

/// Same-domain crawler bound to one target
pub struct Crawler {
    fetcher: Arc<dyn Fetch>,
    state: CrawlState,
    permits: Semaphore,
    params: ParamSender,
    target_host: String,
    max_depth: u32,
    probe_offsite_params: bool,
    cancel: CancelToken,
}

impl Crawler {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        target: &Target,
        config: &ScanConfig,
        params: ParamSender,
        cancel: CancelToken,
    ) -> Arc<Self> {
        Arc::new(Self {
            fetcher,
            state: CrawlState::new(config.max_urls),
            permits: Semaphore::new(config.max_in_flight.max(1)),
            params,
            target_host: target.host.clone(),
            max_depth: config.max_depth,
            probe_offsite_params: config.probe_offsite_params,
            cancel,
        })
    }

    /// Crawls from the target root and returns once every branch has settled
    pub async fn run(self: &Arc<Self>, start_url: &str) {
        match Url::parse(start_url) {
            Ok(url) => self.crawl(url, 0).await,
            Err(e) => debug!("Invalid start URL for crawler: {e}"),
        }
        debug!(
            "Crawler finished: {} URLs claimed, {} visited",
            self.state.claimed(),
            self.state.visited_count()
        );
    }

    /// Visits `url` and recursively every in-scope link found on it
    pub fn crawl(self: &Arc<Self>, url: Url, depth: u32) -> BoxFuture<'static, ()> {
        let this = Arc::clone(self);
        async move {
            if depth > this.max_depth || this.cancel.is_cancelled() {
                return;
            }
            if !this.state.try_claim_slot() {
                return;
            }

            let page_url = url.to_string();
            let links = {
                // The permit only covers the fetch, so parents waiting on
                // children never starve them of permits.
                let _permit = match this.cancel.run(this.permits.acquire()).await {
                    Some(Ok(permit)) => permit,
                    _ => return,
                };

                if !this.state.mark_visited(&page_url) {
                    return;
                }

                let body = match this.cancel.run(this.fetcher.fetch(&page_url)).await {
                    Some(Ok(body)) => body,
                    Some(Err(e)) => {
                        debug!("Crawler failed to fetch {page_url}: {e}");
                        return;
                    }
                    None => return,
                };

                this.emit_params(&url);
                extractor::extract_links(&body)
            };

            let mut children = JoinSet::new();
            for href in links {
                let Some(link) = extractor::resolve_link(&url, &href) else {
                    continue;
                };

                let in_scope = link
                    .host_str()
                    .is_some_and(|host| extractor::in_scope(host, &this.target_host));

                if in_scope || this.probe_offsite_params {
                    this.emit_params(&link);
                }
                if in_scope {
                    children.spawn(this.crawl(link, depth + 1));
                }
            }

            while let Some(joined) = children.join_next().await {
                if let Err(e) = joined {
                    debug!("Crawl task failed: {e}");
                }
            }
        }
        .boxed()
    }

    fn emit_params(&self, url: &Url) {
        for name in extractor::param_names(url) {
            if !self.params.offer(&name) {
                debug!("Parameter queue full, dropping '{name}'");
            }
        }
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }
}
