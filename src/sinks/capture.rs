//! In-memory capture sink

use super::template_property_names;
use crate::core::{LogEvent, OutputTemplate, Result, Sink, TextFormatter, TimestampFormat};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct CaptureState {
    entries: Vec<(LogEvent, String)>,
    flushes: usize,
    closed: bool,
}

/// Shared view of everything a [`CaptureSink`] has received
///
/// Cloning the handle is cheap; all clones see the same state, which stays
/// readable after the logger that owned the sink is gone.
#[derive(Debug, Clone, Default)]
pub struct CaptureHandle {
    state: Arc<Mutex<CaptureState>>,
}

impl CaptureHandle {
    /// Received events, in arrival order
    pub fn events(&self) -> Vec<LogEvent> {
        self.state.lock().entries.iter().map(|(e, _)| e.clone()).collect()
    }

    /// Rendered text of each received event, in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.state.lock().entries.iter().map(|(_, l)| l.clone()).collect()
    }

    /// All rendered text joined together, as a text sink would emit it
    pub fn output(&self) -> String {
        self.state.lock().entries.iter().map(|(_, l)| l.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flush_count(&self) -> usize {
        self.state.lock().flushes
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }
}

/// Sink that records events in memory
///
/// Intended for tests and for hosts that want to inspect what was logged.
///
/// # Example
///
/// ```
/// use rust_structured_logger::sinks::{CaptureSink, Sink};
/// use rust_structured_logger::{LogEvent, LogLevel};
///
/// let mut sink = CaptureSink::new().with_template("{Level:u3} {Message}").unwrap();
/// let handle = sink.handle();
///
/// sink.write(&LogEvent::literal(LogLevel::Warning, "careful")).unwrap();
/// assert_eq!(handle.lines(), vec!["WRN careful"]);
/// ```
pub struct CaptureSink {
    name: String,
    formatter: TextFormatter,
    handle: CaptureHandle,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            name: "capture".to_string(),
            formatter: TextFormatter::default(),
            handle: CaptureHandle::default(),
        }
    }

    /// Name reported in diagnostics, useful when several capture sinks
    /// are registered on one logger
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_template(mut self, template: &str) -> Result<Self> {
        self.formatter.set_template(OutputTemplate::parse(template)?);
        Ok(self)
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.formatter.set_timestamp_format(format);
        self
    }

    pub fn handle(&self) -> CaptureHandle {
        self.handle.clone()
    }
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for CaptureSink {
    fn write(&mut self, event: &LogEvent) -> Result<()> {
        let line = self.formatter.format(event);
        self.handle.state.lock().entries.push((event.clone(), line));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.handle.state.lock().flushes += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.handle.state.lock();
        state.flushes += 1;
        state.closed = true;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn template_properties(&self) -> Vec<String> {
        template_property_names(&self.formatter)
    }
}
