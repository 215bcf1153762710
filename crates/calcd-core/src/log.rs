//! Request log sinks
//!
//! The handler's output is written in batches: one batch per request. A sink
//! must never let two batches interleave.

use parking_lot::Mutex;
use std::io::Write;

/// Destination for per-request log lines
pub trait LogSink: Send + Sync {
    /// Write all `lines` as one uninterrupted batch
    fn write_lines(&self, lines: &[String]);
}

/// Writes batches to the process's standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_lines(&self, lines: &[String]) {
        // A closed stdout is not a request failure
        let _ = write_batch(&mut std::io::stdout().lock(), lines);
    }
}

/// Write `lines` newline-terminated to `out`, then flush
pub fn write_batch<W: Write>(out: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

/// Collects batches in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far, in write order
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl LogSink for MemorySink {
    fn write_lines(&self, lines: &[String]) {
        self.lines.lock().extend(lines.iter().cloned());
    }
}
