//! recx - reflected parameter scanner
//!
//! Crawls a target's pages for URL query parameters, then checks which of
//! them are echoed back unsanitized and which special characters make it
//! through the echo unfiltered.

pub mod cancel;
pub mod config;
pub mod crawler;
pub mod error;
pub mod http;
pub mod models;
pub mod queue;
pub mod report;
pub mod scanner;
