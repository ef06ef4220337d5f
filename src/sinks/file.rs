//! File sink implementation

use super::template_property_names;
use crate::core::{LogEvent, LoggerError, OutputTemplate, Result, Sink, TextFormatter, TimestampFormat};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends rendered events to a file
///
/// Output is buffered; it reaches the file on `flush`, `close`, or drop.
pub struct FileSink {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    formatter: TextFormatter,
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directories
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path,
            formatter: TextFormatter::default(),
        })
    }

    /// Replace the output template
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_structured_logger::sinks::FileSink;
    ///
    /// let sink = FileSink::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_template("{Timestamp} {Level:u3} {Message} {Properties:j}{NewLine}")
    ///     .unwrap();
    /// ```
    pub fn with_template(mut self, template: &str) -> Result<Self> {
        self.formatter.set_template(OutputTemplate::parse(template)?);
        Ok(self)
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.formatter.set_timestamp_format(format);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&mut self, event: &LogEvent) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::sink_write("file", "file sink is closed"))?;

        let output = self.formatter.format(event);
        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn template_properties(&self) -> Vec<String> {
        template_property_names(&self.formatter)
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Buffered lines must reach the file even without an explicit close
        let _ = self.flush();
    }
}
