//! Asynchronous sink wrapper
//!
//! Moves a slow sink off the emitting threads. Events are cloned into a
//! bounded queue and written by a dedicated worker thread; the overflow
//! policy decides what happens when the queue is full.

use crate::core::{
    diagnostics::{panic_message, stderr_channel},
    FallbackChannel, LogEvent, LoggerError, OverflowCallback, OverflowPolicy, Result, Sink,
};
use crossbeam_channel::{bounded, SendTimeoutError, Sender, TrySendError};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

enum Command {
    Write(LogEvent),
    Flush(Sender<Result<()>>),
}

/// Settings for [`AsyncSink`]
#[derive(Clone)]
pub struct AsyncSinkConfig {
    capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    fallback: FallbackChannel,
}

impl AsyncSinkConfig {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
            fallback: stderr_channel(),
        }
    }

    /// Queue capacity; zero is raised to one
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Called with the running drop total whenever an event is dropped
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Where the worker reports failures of the wrapped sink
    #[must_use = "builder methods return a new value"]
    pub fn fallback(mut self, channel: FallbackChannel) -> Self {
        self.fallback = channel;
        self
    }
}

impl Default for AsyncSinkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink that hands events to a background worker
///
/// Failures of the wrapped sink happen on the worker, after `write` has
/// already returned, so they go to the configured fallback channel. `flush`
/// waits for everything queued before it; `close` drains the queue, closes
/// the wrapped sink, and joins the worker.
///
/// # Example
///
/// ```
/// use rust_structured_logger::prelude::*;
/// use rust_structured_logger::sinks::AsyncSinkConfig;
///
/// let capture = CaptureSink::new();
/// let events = capture.handle();
///
/// let sink = AsyncSink::with_config(capture, AsyncSinkConfig::new().capacity(64)).unwrap();
/// let logger = Logger::builder().write_to(sink).build().unwrap();
///
/// logger.info("queued");
/// logger.shutdown().unwrap();
/// assert_eq!(events.len(), 1);
/// ```
pub struct AsyncSink {
    name: String,
    template_properties: Vec<String>,
    sender: Option<Sender<Command>>,
    worker: Option<JoinHandle<Result<()>>>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    dropped: Arc<AtomicU64>,
}

impl AsyncSink {
    pub fn new<S: Sink + 'static>(inner: S) -> Result<Self> {
        Self::with_config(inner, AsyncSinkConfig::default())
    }

    pub fn with_config<S: Sink + 'static>(inner: S, config: AsyncSinkConfig) -> Result<Self> {
        let name = format!("async({})", inner.name());
        let template_properties = inner.template_properties();
        let (sender, receiver) = bounded::<Command>(config.capacity);
        let fallback = config.fallback;
        let mut inner: Box<dyn Sink> = Box::new(inner);

        let worker = thread::Builder::new()
            .name("async-sink".to_string())
            .spawn(move || {
                for command in receiver.iter() {
                    match command {
                        Command::Write(event) => {
                            if let Err(e) = guarded(&mut inner, |sink| sink.write(&event)) {
                                fallback(&format!("[LOGGER ERROR] Async sink worker: {}", e));
                            }
                        }
                        Command::Flush(reply) => {
                            let _ = reply.send(guarded(&mut inner, |sink| sink.flush()));
                        }
                    }
                }
                // Every sender is gone and the queue is drained
                guarded(&mut inner, |sink| sink.close())
            })
            .map_err(|e| LoggerError::config("AsyncSink", format!("failed to spawn worker: {}", e)))?;

        Ok(Self {
            name,
            template_properties,
            sender: Some(sender),
            worker: Some(worker),
            overflow_policy: config.overflow_policy,
            on_overflow: config.on_overflow,
            dropped: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Events dropped because the queue was full
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    fn record_drop(&self) {
        let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = self.on_overflow {
            callback(total);
        }
    }

    fn sender(&self) -> Result<&Sender<Command>> {
        self.sender.as_ref().ok_or(LoggerError::LoggerClosed)
    }
}

/// Run one call on the wrapped sink, turning a panic into an error
fn guarded<F>(sink: &mut Box<dyn Sink>, op: F) -> Result<()>
where
    F: FnOnce(&mut Box<dyn Sink>) -> Result<()>,
{
    let name = sink.name().to_string();
    match catch_unwind(AssertUnwindSafe(|| op(sink))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(LoggerError::sink_write(name, e.to_string())),
        Err(panic_info) => Err(LoggerError::sink_write(
            name,
            format!("panicked: {}", panic_message(panic_info.as_ref())),
        )),
    }
}

impl Sink for AsyncSink {
    fn write(&mut self, event: &LogEvent) -> Result<()> {
        let command = Command::Write(event.clone());
        let sender = self.sender()?;

        match self.overflow_policy {
            OverflowPolicy::Block => sender.send(command).map_err(|_| LoggerError::ChannelSendError),
            OverflowPolicy::BlockWithTimeout(timeout) => match sender.send_timeout(command, timeout) {
                Ok(()) => Ok(()),
                Err(SendTimeoutError::Timeout(_)) => {
                    self.record_drop();
                    Ok(())
                }
                Err(SendTimeoutError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
            },
            OverflowPolicy::DropNewest => match sender.try_send(command) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => {
                    self.record_drop();
                    Ok(())
                }
                Err(TrySendError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
            },
        }
    }

    fn flush(&mut self) -> Result<()> {
        let (reply_tx, reply_rx) = bounded(1);
        self.sender()?
            .send(Command::Flush(reply_tx))
            .map_err(|_| LoggerError::ChannelSendError)?;
        reply_rx.recv().map_err(|_| LoggerError::ChannelSendError)?
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the sender lets the worker finish the queue and exit
        drop(self.sender.take());

        match self.worker.take() {
            Some(handle) => match handle.join() {
                Ok(result) => result,
                Err(panic_info) => Err(LoggerError::sink_write(
                    self.name.clone(),
                    format!("worker panicked: {}", panic_message(panic_info.as_ref())),
                )),
            },
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn template_properties(&self) -> Vec<String> {
        self.template_properties.clone()
    }
}

impl Drop for AsyncSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] Failed to close async sink during drop: {}", e);
        }
    }
}
