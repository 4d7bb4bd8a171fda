//! Configuration management for recx

use crate::error::{RecxError, Result};
use crate::models::ScanConfig;
use serde::Deserialize;
use std::path::Path;

/// File-based configuration structure
#[derive(Debug, Deserialize)]
struct FileConfig {
    scan: Option<ScanSection>,
    output: Option<OutputSection>,
}

#[derive(Debug, Deserialize)]
struct ScanSection {
    workers: Option<usize>,
    max_in_flight: Option<usize>,
    timeout_secs: Option<u64>,
    max_redirects: Option<usize>,
    max_depth: Option<u32>,
    max_urls: Option<usize>,
    queue_capacity: Option<usize>,
    scan_timeout_secs: Option<u64>,
    min_scan_ms: Option<u64>,
    max_body_bytes: Option<usize>,
    strict: Option<bool>,
    probe_offsite_params: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct OutputSection {
    json: Option<bool>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path).map_err(RecxError::IoError)?;
    let file_config: FileConfig = toml::from_str(&content)?;

    let mut config = ScanConfig::default();

    if let Some(scan) = file_config.scan {
        if let Some(workers) = scan.workers {
            config.workers = workers;
        }
        if let Some(in_flight) = scan.max_in_flight {
            config.max_in_flight = in_flight;
        }
        if let Some(timeout) = scan.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(redirects) = scan.max_redirects {
            config.max_redirects = redirects;
        }
        if let Some(depth) = scan.max_depth {
            config.max_depth = depth;
        }
        if let Some(max_urls) = scan.max_urls {
            config.max_urls = max_urls;
        }
        if let Some(capacity) = scan.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(scan_timeout) = scan.scan_timeout_secs {
            config.scan_timeout_secs = scan_timeout;
        }
        if let Some(min_scan) = scan.min_scan_ms {
            config.min_scan_ms = min_scan;
        }
        if let Some(body) = scan.max_body_bytes {
            config.max_body_bytes = body;
        }
        if let Some(strict) = scan.strict {
            config.strict = strict;
        }
        if let Some(offsite) = scan.probe_offsite_params {
            config.probe_offsite_params = offsite;
        }
    }

    if let Some(output) = file_config.output {
        if let Some(json) = output.json {
            config.json_output = json;
        }
    }

    validate(&config)?;
    Ok(config)
}

/// CLI overrides applied on top of file or default configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub workers: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub scan_timeout_secs: Option<u64>,
    pub max_depth: Option<u32>,
    pub strict: bool,
    pub json: bool,
}

/// Merges CLI arguments into an existing ScanConfig
pub fn merge_cli_args(config: &mut ScanConfig, overrides: CliOverrides) -> Result<()> {
    if let Some(w) = overrides.workers {
        config.workers = w;
    }
    if let Some(t) = overrides.timeout_secs {
        config.timeout_secs = t;
    }
    if let Some(t) = overrides.scan_timeout_secs {
        config.scan_timeout_secs = t;
    }
    if let Some(d) = overrides.max_depth {
        config.max_depth = d;
    }
    if overrides.strict {
        config.strict = true;
    }
    if overrides.json {
        config.json_output = true;
    }
    validate(config)
}

/// Rejects limits that would stall a scan
fn validate(config: &ScanConfig) -> Result<()> {
    if config.workers == 0 {
        return Err(RecxError::ConfigError("workers must be at least 1".to_string()));
    }
    if config.max_in_flight == 0 {
        return Err(RecxError::ConfigError(
            "max_in_flight must be at least 1".to_string(),
        ));
    }
    if config.queue_capacity == 0 {
        return Err(RecxError::ConfigError(
            "queue_capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}
