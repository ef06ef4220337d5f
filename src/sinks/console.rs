//! Console sink implementation

use super::template_property_names;
use crate::core::{
    log_level::accepts, LogEvent, LogLevel, OutputTemplate, Result, Sink, TextFormatter,
    TimestampFormat,
};
use std::io::Write;

/// Writes rendered events to standard output
///
/// Each event is written with a single `write_all` on the locked stream, so
/// lines from concurrent loggers sharing the process stdout never interleave.
///
/// # Example
///
/// ```
/// use rust_structured_logger::{ConsoleSink, LogLevel};
///
/// let sink = ConsoleSink::new()
///     .with_template("{Timestamp:%H:%M} [{Level}] {Message}{NewLine}{Exception}")
///     .unwrap()
///     .with_colors(false)
///     .standard_error_from_level(LogLevel::Error);
/// ```
pub struct ConsoleSink {
    formatter: TextFormatter,
    use_colors: bool,
    stderr_from: Option<LogLevel>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            formatter: TextFormatter::default(),
            use_colors: cfg!(feature = "console"),
            stderr_from: None,
        }
    }

    /// Replace the output template
    ///
    /// Fails with `InvalidTemplate` on a malformed template.
    pub fn with_template(mut self, template: &str) -> Result<Self> {
        self.formatter.set_template(OutputTemplate::parse(template)?);
        Ok(self)
    }

    /// Set the timestamp format used by bare `{Timestamp}` placeholders
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_structured_logger::{ConsoleSink, TimestampFormat};
    ///
    /// let sink = ConsoleSink::new().with_timestamp_format(TimestampFormat::Iso8601Micros);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.formatter.set_timestamp_format(format);
        self
    }

    /// Enable or disable level colouring
    ///
    /// Has no effect unless the `console` feature is enabled.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Route events at or above `level` to standard error
    #[must_use]
    pub fn standard_error_from_level(mut self, level: LogLevel) -> Self {
        self.stderr_from = Some(level);
        self
    }

    fn render(&self, event: &LogEvent) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            use colored::Colorize;
            return self
                .formatter
                .format_painted(event, &|level, text| text.color(level.color_code()).to_string());
        }
        self.formatter.format(event)
    }

    fn goes_to_stderr(&self, level: LogLevel) -> bool {
        self.stderr_from.is_some_and(|min| accepts(level, min))
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, event: &LogEvent) -> Result<()> {
        let output = self.render(event);

        if self.goes_to_stderr(event.level()) {
            std::io::stderr().lock().write_all(output.as_bytes())?;
        } else {
            std::io::stdout().lock().write_all(output.as_bytes())?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn template_properties(&self) -> Vec<String> {
        template_property_names(&self.formatter)
    }
}
