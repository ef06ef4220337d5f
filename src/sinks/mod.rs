//! Sink implementations

pub mod async_sink;
pub mod capture;
pub mod console;
#[cfg(feature = "file")]
pub mod file;

pub use async_sink::{AsyncSink, AsyncSinkConfig};
pub use capture::{CaptureHandle, CaptureSink};
pub use console::ConsoleSink;
#[cfg(feature = "file")]
pub use file::FileSink;

pub use crate::core::Sink;

fn template_property_names(formatter: &crate::core::TextFormatter) -> Vec<String> {
    formatter
        .template()
        .property_names()
        .into_iter()
        .map(str::to_string)
        .collect()
}
