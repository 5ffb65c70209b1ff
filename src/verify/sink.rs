//! Destinations for verification reports.

use std::io::{self, Write};
use std::sync::Mutex;

/// Receives complete per-node reports.
///
/// Each call carries one whole multi-line report; implementations must keep
/// it contiguous with respect to other writers.
pub trait DiagnosticSink {
    fn flush_report(&self, report: &str);
}

/// Writes reports to standard error, holding the stderr lock per report.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn flush_report(&self, report: &str) {
        if let Err(error) = write_report(&mut std::io::stderr().lock(), report) {
            tracing::warn!(%error, "failed to write verification report");
        }
    }
}

/// Writes `report` in one call and flushes, so a locked writer emits it whole.
fn write_report(out: &mut impl Write, report: &str) -> io::Result<()> {
    out.write_all(report.as_bytes())?;
    out.flush()
}

/// Buffers reports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Mutex<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything flushed so far.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn flush_report(&self, report: &str) {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_str(report);
    }
}
