//! # Rust Structured Logger
//!
//! A leveled, enrichable, sink-based structured-logging core that many
//! threads can emit through at once.
//!
//! ## Features
//!
//! - **Message templates**: `"User {Name} logged in"` renders the message and
//!   captures `Name` as a property
//! - **Enrichers**: attach ambient properties such as the thread id
//! - **Multiple Sinks**: console, file, in-memory capture, and an
//!   asynchronous wrapper for slow sinks
//! - **Thread Safe**: each sink writes one whole event at a time
//!
//! ## Example
//!
//! ```
//! use rust_structured_logger::prelude::*;
//!
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Information)
//!     .enrich_with(ThreadIdEnricher::new())
//!     .write_to(
//!         ConsoleSink::new()
//!             .with_template("{Timestamp:%H:%M} [{Level}] ({ThreadId}) {Message}{NewLine}{Exception}")
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! logger.log(LogLevel::Information, "Hello {Name}", &["Romeo".into()]).unwrap();
//! logger.shutdown().unwrap();
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Enricher, ErrorPayload, FallbackChannel, FnEnricher, LogEvent, LogLevel, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, OverflowCallback, OverflowPolicy,
        ProcessIdEnricher, Properties, PropertyEnricher, PropertyValue, Result, Sink,
        ThreadIdEnricher, ThreadNameEnricher, TimestampFormat,
    };
    pub use crate::sinks::{AsyncSink, CaptureHandle, CaptureSink, ConsoleSink};
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
}

pub use crate::core::{
    Enricher, ErrorPayload, FallbackChannel, FnEnricher, LogEvent, LogLevel, Logger, LoggerBuilder,
    LoggerError, LoggerMetrics, MessageTemplate, OutputTemplate, OverflowCallback, OverflowPolicy,
    ProcessIdEnricher, Properties, PropertyEnricher, PropertyValue, Result, Sink, TextFormatter,
    ThreadIdEnricher, ThreadNameEnricher, TimestampFormat,
};
pub use sinks::{AsyncSink, CaptureHandle, CaptureSink, ConsoleSink};
#[cfg(feature = "file")]
pub use sinks::FileSink;
