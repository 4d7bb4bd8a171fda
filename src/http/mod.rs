//! HTTP client module for recx

pub mod client;
pub use client::{Fetch, HttpClient, USER_AGENTS};
