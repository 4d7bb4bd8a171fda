//! Core data models for recx

use crate::error::{RecxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Characters probed for survival through a reflection point, in report order
pub const SPECIAL_CHARS: &str = "'<>$|()`;{}";

/// One scan unit: a normalized target URL and the host used for scope checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: String,
    pub host: String,
}

impl Target {
    /// Normalizes a raw input line into a target, prefixing `https://` when no scheme is given
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RecxError::InvalidTarget(raw.to_string()));
        }

        let url = if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let parsed = Url::parse(&url).map_err(|_| RecxError::InvalidTarget(url.clone()))?;
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| RecxError::InvalidTarget(url.clone()))?
            .to_lowercase();

        Ok(Self { url, host })
    }
}

/// A parameter confirmed to reflect, with the special characters that came back intact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// URL the parameter was appended to
    pub base_url: String,
    /// Reflected parameter name
    pub param: String,
    /// Unfiltered characters, in `SPECIAL_CHARS` order
    pub unfiltered: Vec<char>,
}

impl Finding {
    pub fn new(base_url: impl Into<String>, param: impl Into<String>, unfiltered: Vec<char>) -> Self {
        Self {
            base_url: base_url.into(),
            param: param.into(),
            unfiltered,
        }
    }

    /// Unfiltered characters joined into a single string
    pub fn unfiltered_chars(&self) -> String {
        self.unfiltered.iter().collect()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}?{}=REFLECTED (unfiltered:{} )",
            self.base_url,
            self.param,
            self.unfiltered_chars()
        )
    }
}

/// Result of scanning a single target
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Normalized target URL
    pub target: String,
    /// Distinct parameters that went through the reflection prober
    pub params_probed: usize,
    /// Findings emitted during the scan
    pub findings: Vec<Finding>,
    /// Whether the global scan timeout cut the scan short
    pub timed_out: bool,
    /// Wall-clock scan duration
    pub elapsed: Duration,
}

/// Configuration for a scan session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Parameter-testing workers per target
    pub workers: usize,
    /// Maximum simultaneous crawl fetches
    pub max_in_flight: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Redirects followed before the last response is returned as-is
    pub max_redirects: usize,
    /// Maximum link-following hops from the target
    pub max_depth: u32,
    /// Maximum URLs claimed for crawling per target
    pub max_urls: usize,
    /// Parameter queue capacity
    pub queue_capacity: usize,
    /// Global per-target scan budget in seconds
    pub scan_timeout_secs: u64,
    /// Minimum scan duration in milliseconds
    pub min_scan_ms: u64,
    /// Response bodies are truncated to this many bytes
    pub max_body_bytes: usize,
    /// Reject reflections inside href/src attributes, scripts, meta tags and comments
    #[serde(default)]
    pub strict: bool,
    /// Queue parameters found on links to other hosts
    #[serde(default = "default_probe_offsite_params")]
    pub probe_offsite_params: bool,
    /// Emit findings as JSON Lines instead of text
    #[serde(default)]
    pub json_output: bool,
}

fn default_probe_offsite_params() -> bool {
    true
}

impl ScanConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }

    pub fn min_scan_duration(&self) -> Duration {
        Duration::from_millis(self.min_scan_ms)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 200,
            max_in_flight: 200,
            timeout_secs: 10,
            max_redirects: 3,
            max_depth: 5,
            max_urls: 10_000,
            queue_capacity: 50_000,
            scan_timeout_secs: 60,
            min_scan_ms: 5_000,
            max_body_bytes: 2 * 1024 * 1024,
            strict: false,
            probe_offsite_params: true,
            json_output: false,
        }
    }
}
