//! Sink trait for log output destinations

use super::{error::Result, log_event::LogEvent};

pub trait Sink: Send {
    fn write(&mut self, event: &LogEvent) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Release resources at logger shutdown. Defaults to a flush.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str;

    /// Event properties referenced by this sink's output template
    fn template_properties(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, event: &LogEvent) -> Result<()> {
        (**self).write(event)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn template_properties(&self) -> Vec<String> {
        (**self).template_properties()
    }
}
