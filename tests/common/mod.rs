//! Common test utilities

#![allow(dead_code)]

use recx::models::ScanConfig;
use std::sync::Mutex;
use wiremock::{Request, Respond, ResponseTemplate};

/// Creates a ScanConfig tuned for fast tests against a local mock server
pub fn test_config() -> ScanConfig {
    ScanConfig {
        workers: 8,
        max_in_flight: 8,
        timeout_secs: 5,
        scan_timeout_secs: 30,
        min_scan_ms: 0,
        ..ScanConfig::default()
    }
}

/// Value of query parameter `name` in the request, if present
pub fn query_value(request: &Request, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

pub fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Content-Type", "text/html")
        .set_body_string(format!("<html><body>{body}</body></html>"))
}

/// Echoes one query parameter into the page, HTML-encoding the listed characters
pub struct EchoParam {
    pub param: &'static str,
    pub encoded: &'static [char],
}

impl EchoParam {
    pub fn raw(param: &'static str) -> Self {
        Self { param, encoded: &[] }
    }
}

impl Respond for EchoParam {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let value = query_value(request, self.param).unwrap_or_default();
        let mut echoed = String::new();
        for c in value.chars() {
            if self.encoded.contains(&c) {
                echoed.push_str(&format!("&#{};", c as u32));
            } else {
                echoed.push(c);
            }
        }
        html_page(&format!("<h1>Results for {echoed}</h1>"))
    }
}

/// Keeps echoing the first value it ever saw, like a cache serving stale content
pub struct StickyEcho {
    pub param: &'static str,
    pub first: Mutex<Option<String>>,
}

impl StickyEcho {
    pub fn new(param: &'static str) -> Self {
        Self {
            param,
            first: Mutex::new(None),
        }
    }
}

impl Respond for StickyEcho {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let value = query_value(request, self.param).unwrap_or_default();
        let mut first = self.first.lock().expect("lock");
        let echoed = first.get_or_insert(value).clone();
        html_page(&format!("<p>Last search: {echoed}</p>"))
    }
}
