//! Output templates for text sinks
//!
//! Built-in placeholders:
//! - `{Timestamp}` / `{Timestamp:<strftime>}`
//! - `{Level}`, `{Level:u3}`, `{Level:w3}`, `{Level:u}`, `{Level:w}`
//! - `{Message}`, `{NewLine}`, `{Exception}`
//! - `{Properties}` / `{Properties:j}`
//!
//! Any other name refers to an event property (`{ThreadId}`), optionally
//! rendered as JSON with `:j`.

use super::error::{LoggerError, Result};
use super::log_event::LogEvent;
use super::log_level::LogLevel;
use super::message_template::{tokenize, TemplateToken};
use super::timestamp::{validate_strftime, TimestampFormat};

pub const DEFAULT_OUTPUT_TEMPLATE: &str = "[{Timestamp} {Level:u3}] {Message}{NewLine}{Exception}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelStyle {
    Full,
    Upper3,
    Lower3,
    Upper,
    Lower,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Timestamp(Option<TimestampFormat>),
    Level(LevelStyle),
    Message,
    NewLine,
    Exception,
    Properties { json: bool },
    Property { name: String, json: bool },
}

/// A validated, parsed sink output template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl OutputTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let tokens = tokenize(template, true)
            .map_err(|message| LoggerError::invalid_template(template, message))?;

        let mut segments = Vec::with_capacity(tokens.len());
        for token in tokens {
            let segment = match token {
                TemplateToken::Text(text) => Segment::Text(text),
                TemplateToken::Hole { name, format } => {
                    Self::parse_hole(template, &name, format.as_deref())?
                }
            };
            segments.push(segment);
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    fn parse_hole(template: &str, name: &str, format: Option<&str>) -> Result<Segment> {
        let unsupported = || {
            LoggerError::invalid_template(
                template,
                format!(
                    "unsupported format '{}' for placeholder '{}'",
                    format.unwrap_or_default(),
                    name
                ),
            )
        };

        let segment = match (name, format) {
            ("Timestamp", None) => Segment::Timestamp(None),
            ("Timestamp", Some(pattern)) => {
                validate_strftime(pattern)
                    .map_err(|_| LoggerError::invalid_template(template, format!("invalid timestamp pattern '{}'", pattern)))?;
                Segment::Timestamp(Some(TimestampFormat::Custom(pattern.to_string())))
            }
            ("Level", None) => Segment::Level(LevelStyle::Full),
            ("Level", Some("u3")) => Segment::Level(LevelStyle::Upper3),
            ("Level", Some("w3")) => Segment::Level(LevelStyle::Lower3),
            ("Level", Some("u")) => Segment::Level(LevelStyle::Upper),
            ("Level", Some("w")) => Segment::Level(LevelStyle::Lower),
            ("Message", None) => Segment::Message,
            ("NewLine", None) => Segment::NewLine,
            ("Exception", None) => Segment::Exception,
            ("Properties", None) => Segment::Properties { json: false },
            ("Properties", Some("j")) => Segment::Properties { json: true },
            ("Level" | "Message" | "NewLine" | "Exception" | "Properties", Some(_)) => {
                return Err(unsupported())
            }
            (_, None) => Segment::Property {
                name: name.to_string(),
                json: false,
            },
            (_, Some("j")) => Segment::Property {
                name: name.to_string(),
                json: true,
            },
            (_, Some(_)) => return Err(unsupported()),
        };
        Ok(segment)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the event properties this template reads
    pub fn property_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Property { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Render `event` into `out`
    ///
    /// `paint_level` lets a console sink colour the level text.
    pub fn render_into(
        &self,
        event: &LogEvent,
        timestamp_format: &TimestampFormat,
        paint_level: Option<&dyn Fn(LogLevel, &str) -> String>,
        out: &mut String,
    ) {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Timestamp(None) => timestamp_format.format_into(event.timestamp(), out),
                Segment::Timestamp(Some(format)) => format.format_into(event.timestamp(), out),
                Segment::Level(style) => {
                    let text = render_level(event.level(), *style);
                    match paint_level {
                        Some(paint) => out.push_str(&paint(event.level(), &text)),
                        None => out.push_str(&text),
                    }
                }
                Segment::Message => out.push_str(event.rendered_message()),
                Segment::NewLine => out.push('\n'),
                Segment::Exception => {
                    if let Some(error) = event.error() {
                        out.push_str(&error.render_trace());
                        out.push('\n');
                    }
                }
                Segment::Properties { json: false } => out.push_str(&event.properties().format_fields()),
                Segment::Properties { json: true } => {
                    out.push_str(&event.properties().to_json_value().to_string())
                }
                Segment::Property { name, json } => {
                    if let Some(value) = event.property(name) {
                        if *json {
                            out.push_str(&value.to_json_value().to_string());
                        } else {
                            out.push_str(&value.to_string());
                        }
                    }
                }
            }
        }
    }
}

impl Default for OutputTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            segments: vec![
                Segment::Text("[".to_string()),
                Segment::Timestamp(None),
                Segment::Text(" ".to_string()),
                Segment::Level(LevelStyle::Upper3),
                Segment::Text("] ".to_string()),
                Segment::Message,
                Segment::NewLine,
                Segment::Exception,
            ],
        }
    }
}

fn render_level(level: LogLevel, style: LevelStyle) -> String {
    match style {
        LevelStyle::Full => level.to_str().to_string(),
        LevelStyle::Upper3 => level.short_code().to_string(),
        LevelStyle::Lower3 => level.short_code().to_lowercase(),
        LevelStyle::Upper => level.to_str().to_uppercase(),
        LevelStyle::Lower => level.to_str().to_lowercase(),
    }
}

/// Output template plus timestamp format, shared by the text sinks
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    template: OutputTemplate,
    timestamp_format: TimestampFormat,
}

impl TextFormatter {
    pub fn new(template: OutputTemplate, timestamp_format: TimestampFormat) -> Self {
        Self {
            template,
            timestamp_format,
        }
    }

    pub fn template(&self) -> &OutputTemplate {
        &self.template
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    pub fn set_template(&mut self, template: OutputTemplate) {
        self.template = template;
    }

    pub fn set_timestamp_format(&mut self, format: TimestampFormat) {
        self.timestamp_format = format;
    }

    pub fn format(&self, event: &LogEvent) -> String {
        let mut out = String::with_capacity(128);
        self.template
            .render_into(event, &self.timestamp_format, None, &mut out);
        out
    }

    pub fn format_painted(&self, event: &LogEvent, paint_level: &dyn Fn(LogLevel, &str) -> String) -> String {
        let mut out = String::with_capacity(128);
        self.template
            .render_into(event, &self.timestamp_format, Some(paint_level), &mut out);
        out
    }
}
