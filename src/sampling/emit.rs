//! Where the sampling core sends its log lines.

/// Severity of an emitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    Info,
    Warn,
    Error,
}

/// Line-oriented output used by the sampler and the summary report.
///
/// The core decides what a line says; the sink decides where it goes.
pub trait LineSink {
    fn info(&mut self, line: &str);
    fn warn(&mut self, line: &str);
    fn error(&mut self, line: &str);
}

/// Forwards every line to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LineSink for TracingSink {
    fn info(&mut self, line: &str) {
        tracing::info!("{}", line);
    }

    fn warn(&mut self, line: &str) {
        tracing::warn!("{}", line);
    }

    fn error(&mut self, line: &str) {
        tracing::error!("{}", line);
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub lines: Vec<(LineLevel, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines emitted at `level`, in order.
    pub fn at(&self, level: LineLevel) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.as_str())
            .collect()
    }
}

impl LineSink for MemorySink {
    fn info(&mut self, line: &str) {
        self.lines.push((LineLevel::Info, line.to_string()));
    }

    fn warn(&mut self, line: &str) {
        self.lines.push((LineLevel::Warn, line.to_string()));
    }

    fn error(&mut self, line: &str) {
        self.lines.push((LineLevel::Error, line.to_string()));
    }
}
