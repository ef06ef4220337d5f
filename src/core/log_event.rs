//! Log event structure

use super::error_payload::ErrorPayload;
use super::log_level::LogLevel;
use super::message_template::MessageTemplate;
use super::property::{Properties, PropertyValue};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One log occurrence
///
/// Fields are fixed at construction. Enrichers may add properties whose
/// keys are still absent; nothing can replace or remove a property.
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    timestamp: DateTime<Utc>,
    level: LogLevel,
    message_template: String,
    rendered_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorPayload>,
    properties: Properties,
}

impl LogEvent {
    /// Sanitize rendered messages to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one event can never masquerade as several lines of output.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Build an event from a message template and positional arguments
    ///
    /// Template-bound arguments come first, then `extra` fills in keys the
    /// template did not bind.
    pub fn new(
        level: LogLevel,
        template: &str,
        args: &[PropertyValue],
        error: Option<ErrorPayload>,
        extra: Properties,
    ) -> Self {
        let parsed = MessageTemplate::parse(template);
        let mut properties = parsed.bind(args);
        properties.merge_absent(&extra);
        let rendered = parsed.render(&properties);

        Self {
            timestamp: Utc::now(),
            level,
            message_template: template.to_string(),
            rendered_message: Self::sanitize_message(&rendered),
            error,
            properties,
        }
    }

    /// Event for a literal message with no arguments
    pub fn literal(level: LogLevel, message: &str) -> Self {
        Self::new(level, message, &[], None, Properties::new())
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn rendered_message(&self) -> &str {
        &self.rendered_message
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        self.error.as_ref()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Add a property unless the event already carries that key
    ///
    /// Returns `true` if the property was added.
    pub fn add_property_if_absent<K, V>(&mut self, key: K, value: V) -> bool
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        self.properties.add_if_absent(key, value)
    }
}
