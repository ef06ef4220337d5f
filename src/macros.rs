//! Logging macros that bind message-template arguments.
//!
//! Each trailing argument is converted with `PropertyValue::from` and bound
//! to the template holes in order. An error to attach goes first, after
//! `err:`. Arguments are only evaluated when the level is enabled.
//!
//! # Examples
//!
//! ```
//! use rust_structured_logger::prelude::*;
//! use rust_structured_logger::{error, info};
//!
//! let logger = Logger::builder().write_to(CaptureSink::new()).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With template arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {Port}", port);
//!
//! // With an attached error
//! let e = std::io::Error::new(std::io::ErrorKind::Other, "refused");
//! error!(logger, err: &e, "Connection to {Host} failed", "db01");
//! ```

/// Log at an explicit level, returning the emission result.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_structured_logger::log;
/// log!(logger, LogLevel::Information, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {Code}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, err: $err:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        match (&$logger, $level) {
            (logger, level) => {
                if logger.is_enabled(level) {
                    logger.log_error(
                        level,
                        $err,
                        $template,
                        &[$($crate::PropertyValue::from($arg)),*],
                    )
                } else {
                    // Arguments stay unevaluated; the call still counts as filtered.
                    logger.log(level, $template, &[])
                }
            }
        }
    };
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        match (&$logger, $level) {
            (logger, level) => {
                if logger.is_enabled(level) {
                    logger.log(level, $template, &[$($crate::PropertyValue::from($arg)),*])
                } else {
                    logger.log(level, $template, &[])
                }
            }
        }
    };
}

/// Log a verbose-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::builder().min_level(LogLevel::Verbose).build().unwrap();
/// use rust_structured_logger::verbose;
/// verbose!(logger, "Entering function: {Function}", "calculate");
/// ```
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        { let _ = $crate::log!($logger, $crate::LogLevel::Verbose, $($arg)+); }
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        { let _ = $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+); }
    };
}

/// Log an information-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_structured_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {Count} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        { let _ = $crate::log!($logger, $crate::LogLevel::Information, $($arg)+); }
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        { let _ = $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+); }
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_structured_logger::error;
/// let e = std::fmt::Error;
/// error!(logger, err: &e, "Rendering {Page} failed", "index");
/// error!(logger, "Failed to connect to database");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        { let _ = $crate::log!($logger, $crate::LogLevel::Error, $($arg)+); }
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        { let _ = $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+); }
    };
}
