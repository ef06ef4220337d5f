//! Core logger types and traits

pub mod diagnostics;
pub mod enricher;
pub mod error;
pub mod error_payload;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod message_template;
pub mod metrics;
pub mod output_template;
pub mod overflow_policy;
pub mod property;
pub mod sink;
pub mod timestamp;

pub use diagnostics::{stderr_channel, FallbackChannel};
pub use enricher::{
    current_thread_id, Enricher, EnricherChain, FnEnricher, ProcessIdEnricher, PropertyEnricher,
    ThreadIdEnricher, ThreadNameEnricher,
};
pub use error::{LoggerError, Result};
pub use error_payload::ErrorPayload;
pub use log_event::LogEvent;
pub use log_level::{LogLevel, ALL_LEVELS};
pub use logger::{Logger, LoggerBuilder};
pub use message_template::MessageTemplate;
pub use metrics::LoggerMetrics;
pub use output_template::{OutputTemplate, TextFormatter, DEFAULT_OUTPUT_TEMPLATE};
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use property::{Properties, PropertyValue};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
