//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Emission through the ambient logger before it was installed
    #[error("Logger not initialized")]
    NotInitialized,

    /// Ambient logger installed twice
    #[error("Logger already initialized")]
    AlreadyInitialized,

    /// Emission or flush after shutdown
    #[error("Logger closed")]
    LoggerClosed,

    /// A sink failed to write or flush
    #[error("Sink '{sink}' failed: {message}")]
    SinkWriteFailure { sink: String, message: String },

    /// Output template is malformed or references an unknown placeholder
    #[error("Invalid template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Channel send error
    #[error("Failed to send log event to async worker")]
    ChannelSendError,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a sink failure error
    pub fn sink_write(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkWriteFailure {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create an invalid template error
    pub fn invalid_template(template: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidTemplate {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
