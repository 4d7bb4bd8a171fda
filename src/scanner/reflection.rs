//! Reflected parameter detection
//!
//! A parameter counts as reflected only when two independent random markers
//! each come back verbatim in their own response. A page that happens to
//! contain one marker (static text, a cache serving the previous answer)
//! fails the second request. Confirmed parameters are then probed once per
//! special character to see which ones survive unfiltered.

use crate::cancel::CancelToken;
use crate::http::Fetch;
use crate::models::{Finding, SPECIAL_CHARS};
use std::sync::Arc;
use tracing::debug;

use super::context::is_valid_reflection_context;
use super::markers::{char_marker, reflection_marker, MarkerSource};

/// URL sent for a probe: `<base>?<param>=<value>`
pub fn probe_url(base_url: &str, param: &str, value: &str) -> String {
    format!("{base_url}?{param}={value}")
}

/// Runs the reflection checks for one (base URL, parameter) pair
pub struct ReflectionProber {
    fetcher: Arc<dyn Fetch>,
    markers: Arc<dyn MarkerSource>,
    strict: bool,
    cancel: CancelToken,
}

impl ReflectionProber {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        markers: Arc<dyn MarkerSource>,
        strict: bool,
        cancel: CancelToken,
    ) -> Self {
        Self {
            fetcher,
            markers,
            strict,
            cancel,
        }
    }

    /// Returns a finding when `param` reflects and at least one special character survives
    pub async fn probe(&self, base_url: &str, param: &str) -> Option<Finding> {
        let first = reflection_marker(self.markers.as_ref());
        self.fetch_reflecting(base_url, param, &first).await?;

        let second = reflection_marker(self.markers.as_ref());
        let body = match self.fetch_reflecting(base_url, param, &second).await {
            Some(body) => body,
            None => {
                debug!("'{param}' echoed only the first marker, treating as coincidental");
                return None;
            }
        };

        if self.strict && !is_valid_reflection_context(&body, &second) {
            debug!("'{param}' reflects in a non-exploitable context, skipping");
            return None;
        }

        let unfiltered = self.check_unfiltered_chars(base_url, param).await;
        if unfiltered.is_empty() || self.cancel.is_cancelled() {
            debug!("'{param}' reflects but every probed character is filtered");
            return None;
        }

        Some(Finding::new(base_url, param, unfiltered))
    }

    /// Probes each special character separately and returns the ones echoed intact
    pub async fn check_unfiltered_chars(&self, base_url: &str, param: &str) -> Vec<char> {
        let mut unfiltered = Vec::new();

        for c in SPECIAL_CHARS.chars() {
            if self.cancel.is_cancelled() {
                break;
            }
            let marker = char_marker(self.markers.as_ref(), c);
            if self.fetch_reflecting(base_url, param, &marker).await.is_some() {
                unfiltered.push(c);
            }
        }

        unfiltered
    }

    /// Fetches the probe URL and returns the body only if `value` appears in it
    async fn fetch_reflecting(&self, base_url: &str, param: &str, value: &str) -> Option<String> {
        let url = probe_url(base_url, param, value);
        match self.cancel.run(self.fetcher.fetch(&url)).await? {
            Ok(body) if body.contains(value) => Some(body),
            Ok(_) => None,
            Err(e) => {
                debug!("Probe request failed for {url}: {e}");
                None
            }
        }
    }
}
