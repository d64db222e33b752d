//! Output sinks for emitted records.
//!
//! Every enabled call produces exactly one line on its sink. The stream
//! sinks lock stdout/stderr per line so concurrent handles never
//! interleave partial lines; `MemorySink` captures output for tests.

use crate::Result;
use std::io::Write;
use std::sync::Mutex;

/// Record sink trait: one serialized line per call
pub trait RecordSink: Send + Sync {
    /// Write one line; the sink appends the newline
    fn write_line(&self, line: &str) -> Result<()>;
}

/// Line sink over standard output
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl RecordSink for StdoutSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

/// Line sink over standard error
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrSink;

impl RecordSink for StderrSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let mut out = std::io::stderr().lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

/// In-memory sink capturing lines for assertions
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Drain captured lines
    pub fn take(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|mut lines| std::mem::take(&mut *lines))
            .unwrap_or_default()
    }
}

impl RecordSink for MemorySink {
    fn write_line(&self, line: &str) -> Result<()> {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();
        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_memory_sink_take_drains() {
        let sink = MemorySink::new();
        sink.write_line("only").unwrap();
        assert_eq!(sink.take(), vec!["only"]);
        assert!(sink.take().is_empty());
    }
}
