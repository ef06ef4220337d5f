//! Timestamp formatting utilities
//!
//! Provides standardized, configurable timestamp formats for log output.
//! Supports ISO 8601, RFC 3339, Unix timestamps, and custom strftime formats.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use rust_structured_logger::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now());
/// // Output: "2025-01-08T10:30:45.123Z"
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format, e.g. `%H:%M:%S`
    ///
    /// Build it with [`TimestampFormat::custom`] to have the pattern checked.
    Custom(String),
}

impl TimestampFormat {
    /// Create a validated custom strftime format
    pub fn custom(pattern: &str) -> Result<Self> {
        validate_strftime(pattern)?;
        Ok(TimestampFormat::Custom(pattern.to_string()))
    }

    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        let mut out = String::new();
        self.format_into(datetime, &mut out);
        out
    }

    /// Append the formatted timestamp to `out`
    ///
    /// An unchecked custom pattern that chrono rejects falls back to ISO 8601.
    pub fn format_into(&self, datetime: &DateTime<Utc>, out: &mut String) {
        let result = match self {
            TimestampFormat::Iso8601 => write!(out, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            TimestampFormat::Iso8601Micros => {
                write!(out, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ"))
            }
            TimestampFormat::Rfc3339 => write!(out, "{}", datetime.to_rfc3339()),
            TimestampFormat::Unix => write!(out, "{}", datetime.timestamp()),
            TimestampFormat::UnixMillis => write!(out, "{}", datetime.timestamp_millis()),
            TimestampFormat::Custom(pattern) => {
                let mark = out.len();
                let written = write!(out, "{}", datetime.format(pattern));
                if written.is_err() {
                    out.truncate(mark);
                }
                written
            }
        };
        if result.is_err() {
            TimestampFormat::Iso8601.format_into(datetime, out);
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = LoggerError;

    /// Parse a preset name (case-insensitive) or a strftime pattern
    ///
    /// Anything containing `%` is treated as a custom pattern.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.contains('%') {
            return TimestampFormat::custom(trimmed);
        }
        match trimmed.to_lowercase().replace(['-', '_'], "").as_str() {
            "iso8601" => Ok(TimestampFormat::Iso8601),
            "iso8601micros" => Ok(TimestampFormat::Iso8601Micros),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            "unix" => Ok(TimestampFormat::Unix),
            "unixmillis" => Ok(TimestampFormat::UnixMillis),
            _ => Err(LoggerError::config(
                "TimestampFormat",
                format!("unknown timestamp format '{}'", s),
            )),
        }
    }
}

/// Reject strftime patterns chrono cannot render
pub(crate) fn validate_strftime(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(LoggerError::invalid_template(
            pattern,
            "invalid strftime timestamp pattern",
        ));
    }
    Ok(())
}
