//! Finding output
//!
//! Findings are written as soon as they are confirmed, one per line, so the
//! tool can sit in a shell pipeline.

pub mod jsonl;

use crate::models::Finding;
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

/// Receives findings as workers confirm them
pub trait ReportSink: Send + Sync {
    fn emit(&self, finding: &Finding);
}

/// Line format written by [`LineReporter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<url>?<param>=REFLECTED (unfiltered:<chars> )`
    Text,
    /// One JSON object per line
    JsonLines,
}

/// Writes each finding as one line to an output stream
pub struct LineReporter<W: Write + Send> {
    out: Mutex<W>,
    format: OutputFormat,
}

impl LineReporter<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(std::io::stdout(), format)
    }
}

impl<W: Write + Send> LineReporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out: Mutex::new(out),
            format,
        }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> ReportSink for LineReporter<W> {
    fn emit(&self, finding: &Finding) {
        let line = match self.format {
            OutputFormat::Text => finding.to_string(),
            OutputFormat::JsonLines => match jsonl::to_line(finding) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Could not serialize finding for '{}': {e}", finding.param);
                    return;
                }
            },
        };

        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            warn!("Failed to write finding: {e}");
        }
    }
}

/// Discards findings; the scan outcome still carries them
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn emit(&self, _finding: &Finding) {}
}
