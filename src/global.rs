//! Process-wide logger
//!
//! Install a configured [`Logger`] once with [`init`]; any code can then emit
//! through it. Every operation fails with `NotInitialized` until `init`
//! succeeds. The installed logger lives for the rest of the process and is
//! never dropped, so call [`close_and_flush`] before exit.
//!
//! ```no_run
//! use rust_structured_logger::prelude::*;
//! use rust_structured_logger::global;
//!
//! global::init(Logger::builder().write_to(ConsoleSink::new()).build()?)?;
//! global::log(LogLevel::Information, "started {Service}", &["billing".into()])?;
//! global::close_and_flush()?;
//! # Ok::<(), rust_structured_logger::LoggerError>(())
//! ```

use crate::core::{LogLevel, Logger, LoggerError, Properties, PropertyValue, Result};
use std::sync::OnceLock;

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide logger
///
/// Fails with `AlreadyInitialized` if one is installed; the rejected logger
/// is shut down.
pub fn init(logger: Logger) -> Result<()> {
    GLOBAL_LOGGER
        .set(logger)
        .map_err(|_rejected| LoggerError::AlreadyInitialized)
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// The installed logger
pub fn logger() -> Result<&'static Logger> {
    GLOBAL_LOGGER.get().ok_or(LoggerError::NotInitialized)
}

pub fn log(level: LogLevel, template: &str, args: &[PropertyValue]) -> Result<()> {
    logger()?.log(level, template, args)
}

pub fn log_error<E>(level: LogLevel, error: &E, template: &str, args: &[PropertyValue]) -> Result<()>
where
    E: std::error::Error + ?Sized,
{
    logger()?.log_error(level, error, template, args)
}

pub fn log_with_properties(
    level: LogLevel,
    template: &str,
    args: &[PropertyValue],
    properties: Properties,
) -> Result<()> {
    logger()?.log_with_properties(level, template, args, properties)
}

pub fn flush() -> Result<()> {
    logger()?.flush()
}

/// Drain in-flight events, then flush and close every sink
///
/// Later emissions fail with `LoggerClosed`.
pub fn close_and_flush() -> Result<()> {
    logger()?.shutdown()
}
