//! JSON Lines finding format, one JSON object per line

use crate::error::Result;
use crate::models::Finding;
use serde::Serialize;

#[derive(Serialize)]
struct FindingLine<'a> {
    url: &'a str,
    param: &'a str,
    unfiltered: String,
    probe: String,
}

/// Serializes a finding as a single JSON line (no trailing newline)
pub fn to_line(finding: &Finding) -> Result<String> {
    let line = FindingLine {
        url: &finding.base_url,
        param: &finding.param,
        unfiltered: finding.unfiltered_chars(),
        probe: format!("{}?{}=", finding.base_url, finding.param),
    };
    Ok(serde_json::to_string(&line)?)
}
