//! Main logger implementation

use super::{
    diagnostics::{panic_message, stderr_channel, FallbackChannel},
    enricher::{Enricher, EnricherChain},
    error::{LoggerError, Result},
    error_payload::ErrorPayload,
    log_event::LogEvent,
    log_level::{accepts, LogLevel},
    metrics::LoggerMetrics,
    property::{Properties, PropertyValue},
    sink::Sink,
};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

const BUILT_IN_PLACEHOLDERS: [&str; 6] = ["Timestamp", "Level", "Message", "NewLine", "Exception", "Properties"];

struct SinkSlot {
    name: String,
    sink: Mutex<Box<dyn Sink>>,
}

/// The logging pipeline: level filter, enricher chain, and sink fan-out
///
/// Configuration is fixed once built, so emitting threads read it without
/// locking. Each sink sits behind its own mutex: one sink never sees two
/// writes interleave, while different sinks are written concurrently.
///
/// # Example
///
/// ```
/// use rust_structured_logger::prelude::*;
///
/// let capture = CaptureSink::new();
/// let events = capture.handle();
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Information)
///     .enrich_with(ThreadIdEnricher::new())
///     .write_to(capture)
///     .build()
///     .unwrap();
///
/// logger.log(LogLevel::Information, "Hello {Name}", &["world".into()]).unwrap();
/// logger.log(LogLevel::Debug, "hidden", &[]).unwrap();
///
/// assert_eq!(events.len(), 1);
/// assert_eq!(events.events()[0].rendered_message(), "Hello world");
/// ```
pub struct Logger {
    min_level: LogLevel,
    enrichers: EnricherChain,
    sinks: Vec<SinkSlot>,
    /// Emitters hold the read side while an event is in flight; shutdown
    /// takes the write side, so it waits for them to finish.
    gate: RwLock<()>,
    closed: AtomicBool,
    metrics: LoggerMetrics,
    fallback: FallbackChannel,
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Whether an event at `level` would pass the level filter
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        accepts(level, self.min_level)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Emit an event rendered from `template` and positional `args`
    pub fn log(&self, level: LogLevel, template: &str, args: &[PropertyValue]) -> Result<()> {
        self.emit(level, || LogEvent::new(level, template, args, None, Properties::new()))
    }

    /// Emit an event with an attached error
    pub fn log_error<E>(
        &self,
        level: LogLevel,
        error: &E,
        template: &str,
        args: &[PropertyValue],
    ) -> Result<()>
    where
        E: std::error::Error + ?Sized,
    {
        self.emit(level, || {
            LogEvent::new(
                level,
                template,
                args,
                Some(ErrorPayload::from_error(error)),
                Properties::new(),
            )
        })
    }

    /// Emit an event carrying extra explicit properties
    pub fn log_with_properties(
        &self,
        level: LogLevel,
        template: &str,
        args: &[PropertyValue],
        properties: Properties,
    ) -> Result<()> {
        self.emit(level, || LogEvent::new(level, template, args, None, properties))
    }

    /// General form of every emission method
    pub fn log_event(
        &self,
        level: LogLevel,
        template: &str,
        args: &[PropertyValue],
        error: Option<ErrorPayload>,
        properties: Properties,
    ) -> Result<()> {
        self.emit(level, || LogEvent::new(level, template, args, error, properties))
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        let _ = self.log(LogLevel::Verbose, message, &[]);
    }

    #[inline]
    pub fn debug(&self, message: &str) {
        let _ = self.log(LogLevel::Debug, message, &[]);
    }

    #[inline]
    pub fn info(&self, message: &str) {
        let _ = self.log(LogLevel::Information, message, &[]);
    }

    #[inline]
    pub fn warn(&self, message: &str) {
        let _ = self.log(LogLevel::Warning, message, &[]);
    }

    #[inline]
    pub fn error(&self, message: &str) {
        let _ = self.log(LogLevel::Error, message, &[]);
    }

    #[inline]
    pub fn fatal(&self, message: &str) {
        let _ = self.log(LogLevel::Fatal, message, &[]);
    }

    fn emit<F>(&self, level: LogLevel, build: F) -> Result<()>
    where
        F: FnOnce() -> LogEvent,
    {
        if self.is_closed() {
            self.metrics.record_rejected();
            return Err(LoggerError::LoggerClosed);
        }
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return Ok(());
        }

        let _in_flight = self.gate.read();
        if self.is_closed() {
            self.metrics.record_rejected();
            return Err(LoggerError::LoggerClosed);
        }

        let mut event = build();
        for (name, message) in self.enrichers.enrich(&mut event) {
            (self.fallback)(&format!(
                "[LOGGER CRITICAL] Enricher '{}' panicked: {}. Remaining enrichers and sinks still run.",
                name, message
            ));
        }
        self.dispatch(&event);
        Ok(())
    }

    /// Hand the event to every sink in order with per-sink failure isolation
    fn dispatch(&self, event: &LogEvent) {
        let mut has_error = false;

        for (idx, slot) in self.sinks.iter().enumerate() {
            let mut sink = slot.sink.lock();
            let result = catch_unwind(AssertUnwindSafe(|| sink.write(event)));
            drop(sink);

            if self.check_sink_result(idx, &slot.name, "write", result).is_some() {
                has_error = true;
            }
        }

        if !has_error {
            self.metrics.record_logged();
        }
    }

    /// Report a failed or panicked sink call, returning the failure text
    fn check_sink_result(
        &self,
        idx: usize,
        name: &str,
        operation: &str,
        result: std::thread::Result<Result<()>>,
    ) -> Option<String> {
        match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => {
                self.metrics.record_sink_failure();
                let message = format!("{} failed: {}", operation, e);
                let failure = LoggerError::sink_write(name, message.as_str());
                (self.fallback)(&format!("[LOGGER ERROR] Sink #{}: {}", idx, failure));
                Some(message)
            }
            Err(panic_info) => {
                self.metrics.record_sink_failure();
                let message = format!(
                    "panicked during {}: {}",
                    operation,
                    panic_message(panic_info.as_ref())
                );
                (self.fallback)(&format!(
                    "[LOGGER CRITICAL] Sink #{} '{}' {}. Other sinks continue to function.",
                    idx, name, message
                ));
                Some(message)
            }
        }
    }

    /// Flush every sink
    ///
    /// Failures are reported to the fallback channel; the first one is also
    /// returned as `SinkWriteFailure`.
    pub fn flush(&self) -> Result<()> {
        let _in_flight = self.gate.read();
        if self.is_closed() {
            return Err(LoggerError::LoggerClosed);
        }
        self.for_each_sink("flush", |sink| sink.flush())
    }

    fn for_each_sink<F>(&self, operation: &str, mut op: F) -> Result<()>
    where
        F: FnMut(&mut Box<dyn Sink>) -> Result<()>,
    {
        let mut first_failure = None;
        for (idx, slot) in self.sinks.iter().enumerate() {
            let mut sink = slot.sink.lock();
            let result = catch_unwind(AssertUnwindSafe(|| op(&mut sink)));
            drop(sink);

            if let Some(message) = self.check_sink_result(idx, &slot.name, operation, result) {
                first_failure.get_or_insert_with(|| LoggerError::sink_write(slot.name.clone(), message));
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Close the logger: wait for in-flight events, then flush and close
    /// every sink in registration order.
    ///
    /// Afterwards emission and `flush` return `LoggerClosed`. Calling
    /// `shutdown` again does nothing.
    pub fn shutdown(&self) -> Result<()> {
        let _drained = self.gate.write();
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.for_each_sink("close", |sink| sink.close())
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn enricher_names(&self) -> Vec<&str> {
        self.enrichers.names()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            (self.fallback)(&format!("[LOGGER ERROR] Failed to close sinks during drop: {}", e));
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_structured_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .enrich_with(ThreadIdEnricher::new())
///     .write_to(
///         ConsoleSink::new()
///             .with_template("{Timestamp:%H:%M} [{Level}] ({ThreadId}) {Message}{NewLine}{Exception}")
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    enrichers: Vec<Box<dyn Enricher>>,
    sinks: Vec<Box<dyn Sink>>,
    declared_properties: Vec<String>,
    fallback: Option<FallbackChannel>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Information,
            enrichers: Vec::new(),
            sinks: Vec::new(),
            declared_properties: Vec::new(),
            fallback: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Register an enricher; enrichers run in registration order
    #[must_use = "builder methods return a new value"]
    pub fn enrich_with<E: Enricher + 'static>(mut self, enricher: E) -> Self {
        self.enrichers.push(Box::new(enricher));
        self
    }

    /// Register a sink; sinks receive events in registration order
    #[must_use = "builder methods return a new value"]
    pub fn write_to<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Allow sink templates to reference a property supplied per call
    ///
    /// Properties bound from message templates or passed explicitly are not
    /// known to any enricher, so templates that print them must declare them.
    #[must_use = "builder methods return a new value"]
    pub fn declare_property(mut self, name: impl Into<String>) -> Self {
        self.declared_properties.push(name.into());
        self
    }

    /// Set the channel that receives the logger's own failure reports
    ///
    /// Defaults to standard error.
    #[must_use = "builder methods return a new value"]
    pub fn fallback(mut self, channel: FallbackChannel) -> Self {
        self.fallback = Some(channel);
        self
    }

    /// Validate the configuration and build the logger
    ///
    /// Fails with `InvalidTemplate` when a sink's output template references
    /// a property that is neither built in, provided by an enricher, nor
    /// declared with [`LoggerBuilder::declare_property`].
    pub fn build(self) -> Result<Logger> {
        let enrichers = EnricherChain::new(self.enrichers);
        let mut known = enrichers.property_names();
        known.extend(self.declared_properties);

        for sink in &self.sinks {
            for name in sink.template_properties() {
                let is_known = BUILT_IN_PLACEHOLDERS.contains(&name.as_str()) || known.contains(&name);
                if !is_known {
                    return Err(LoggerError::invalid_template(
                        format!("{{{}}}", name),
                        format!(
                            "sink '{}' references a property that no enricher provides \
                             and that was not declared",
                            sink.name()
                        ),
                    ));
                }
            }
        }

        let sinks = self
            .sinks
            .into_iter()
            .map(|sink| SinkSlot {
                name: sink.name().to_string(),
                sink: Mutex::new(sink),
            })
            .collect();

        Ok(Logger {
            min_level: self.min_level,
            enrichers,
            sinks,
            gate: RwLock::new(()),
            closed: AtomicBool::new(false),
            metrics: LoggerMetrics::new(),
            fallback: self.fallback.unwrap_or_else(stderr_channel),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FnEnricher, PropertyEnricher, ThreadIdEnricher};
    use crate::sinks::CaptureSink;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    struct CountingEnricher {
        calls: Arc<AtomicUsize>,
    }

    impl Enricher for CountingEnricher {
        fn enrich(&self, _event: &mut LogEvent) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&mut self, _event: &LogEvent) -> Result<()> {
            Err(LoggerError::other("Simulated failure"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn write(&mut self, _event: &LogEvent) -> Result<()> {
            panic!("sink exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn collecting_fallback() -> (FallbackChannel, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        (Arc::new(move |line: &str| sink.lock().push(line.to_string())), lines)
    }

    #[test]
    fn test_builder_defaults() {
        let logger = LoggerBuilder::default().build().unwrap();
        assert_eq!(logger.min_level(), LogLevel::Information);
        assert!(logger.sink_names().is_empty());
        assert!(!logger.is_closed());
    }

    #[test]
    fn test_filtered_event_skips_enrichers_and_sinks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let capture = CaptureSink::new();
        let handle = capture.handle();
        let logger = Logger::builder()
            .min_level(LogLevel::Warning)
            .enrich_with(CountingEnricher { calls: Arc::clone(&calls) })
            .write_to(capture)
            .build()
            .unwrap();

        logger.log(LogLevel::Information, "dropped {X}", &[1.into()]).unwrap();
        logger.debug("dropped too");

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(handle.is_empty());
        assert_eq!(logger.metrics().filtered_count(), 2);

        logger.warn("kept");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn test_every_sink_gets_the_same_enriched_event() {
        let first = CaptureSink::new();
        let second = CaptureSink::new();
        let (h1, h2) = (first.handle(), second.handle());
        let logger = Logger::builder()
            .enrich_with(ThreadIdEnricher::new())
            .enrich_with(PropertyEnricher::new("App", "tests"))
            .write_to(first)
            .write_to(second)
            .build()
            .unwrap();

        logger.info("hello");

        let (a, b) = (h1.events(), h2.events());
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(a[0].properties(), b[0].properties());
        assert!(a[0].property("ThreadId").is_some());
        assert_eq!(a[0].property("App"), Some(&PropertyValue::from("tests")));
    }

    #[test]
    fn test_explicit_property_beats_enricher() {
        let capture = CaptureSink::new();
        let handle = capture.handle();
        let logger = Logger::builder()
            .enrich_with(PropertyEnricher::new("Tenant", "default"))
            .write_to(capture)
            .build()
            .unwrap();

        logger
            .log_with_properties(
                LogLevel::Information,
                "order placed",
                &[],
                Properties::new().with_property("Tenant", "acme"),
            )
            .unwrap();

        assert_eq!(
            handle.events()[0].property("Tenant"),
            Some(&PropertyValue::from("acme"))
        );
    }

    #[test]
    fn test_sink_failure_is_isolated() {
        let (fallback, reports) = collecting_fallback();
        let capture = CaptureSink::new();
        let handle = capture.handle();
        let logger = Logger::builder()
            .write_to(FailingSink)
            .write_to(PanickingSink)
            .write_to(capture)
            .fallback(fallback)
            .build()
            .unwrap();

        assert!(logger.log(LogLevel::Error, "still delivered", &[]).is_ok());

        assert_eq!(handle.len(), 1);
        assert_eq!(logger.metrics().sink_failures(), 2);
        assert_eq!(logger.metrics().total_logged(), 0);

        let reports = reports.lock();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].contains("Simulated failure"));
        assert!(reports[1].contains("sink exploded"));
    }

    #[test]
    fn test_enricher_panic_is_isolated() {
        let (fallback, reports) = collecting_fallback();
        let capture = CaptureSink::new();
        let handle = capture.handle();
        let logger = Logger::builder()
            .enrich_with(FnEnricher::new("boom", Vec::<String>::new(), |_: &mut LogEvent| {
                panic!("enricher exploded")
            }))
            .enrich_with(ThreadIdEnricher::new())
            .write_to(capture)
            .fallback(fallback)
            .build()
            .unwrap();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            logger.log(LogLevel::Information, "hello", &[])
        }));

        assert!(matches!(outcome, Ok(Ok(()))));
        assert_eq!(handle.len(), 1);
        assert!(handle.events()[0].property("ThreadId").is_some());

        let reports = reports.lock();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].starts_with("[LOGGER CRITICAL] Enricher 'boom'"));
        assert!(reports[0].contains("enricher exploded"));
    }

    #[test]
    fn test_shutdown_rejects_further_emission() {
        let capture = CaptureSink::new();
        let handle = capture.handle();
        let logger = Logger::builder().write_to(capture).build().unwrap();

        logger.info("before");
        logger.shutdown().unwrap();
        assert!(logger.is_closed());
        assert!(handle.is_closed());

        assert!(matches!(
            logger.log(LogLevel::Information, "after", &[]),
            Err(LoggerError::LoggerClosed)
        ));
        assert!(matches!(logger.flush(), Err(LoggerError::LoggerClosed)));
        assert!(logger.shutdown().is_ok());
        assert_eq!(handle.len(), 1);
        assert_eq!(logger.metrics().rejected_count(), 1);
    }

    #[test]
    fn test_build_rejects_unknown_template_property() {
        let sink = CaptureSink::new()
            .with_template("{Message} ({RequestId})")
            .unwrap();
        let result = Logger::builder().write_to(sink).build();
        assert!(matches!(result, Err(LoggerError::InvalidTemplate { .. })));
    }

    #[test]
    fn test_build_accepts_enriched_and_declared_properties() {
        let sink = CaptureSink::new()
            .with_template("({ThreadId}) {RequestId} {Message}")
            .unwrap();
        let logger = Logger::builder()
            .enrich_with(ThreadIdEnricher::new())
            .declare_property("RequestId")
            .write_to(sink)
            .build();
        assert!(logger.is_ok());
    }

    #[test]
    fn test_log_error_attaches_payload() {
        let capture = CaptureSink::new();
        let handle = capture.handle();
        let logger = Logger::builder().write_to(capture).build().unwrap();

        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        logger
            .log_error(LogLevel::Error, &err, "write failed for {Path}", &["/tmp/x".into()])
            .unwrap();

        let event = &handle.events()[0];
        assert_eq!(event.error().map(|e| e.message()), Some("disk on fire"));
        assert_eq!(event.rendered_message(), "write failed for /tmp/x");
    }

    #[test]
    fn test_flush_reports_failing_sink() {
        struct BadFlush;
        impl Sink for BadFlush {
            fn write(&mut self, _event: &LogEvent) -> Result<()> {
                Ok(())
            }
            fn flush(&mut self) -> Result<()> {
                Err(LoggerError::other("flush refused"))
            }
            fn name(&self) -> &str {
                "bad_flush"
            }
        }

        let (fallback, reports) = collecting_fallback();
        let logger = Logger::builder()
            .write_to(BadFlush)
            .fallback(fallback)
            .build()
            .unwrap();

        match logger.flush() {
            Err(LoggerError::SinkWriteFailure { sink, .. }) => assert_eq!(sink, "bad_flush"),
            other => panic!("unexpected flush result: {:?}", other),
        }
        assert!(reports.lock()[0].contains("flush refused"));
    }
}
