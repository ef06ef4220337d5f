//! Structured representation of an error attached to a log event

use serde::Serialize;
use std::fmt;

/// An error captured as data: kind, message, and the chain of causes
///
/// # Example
///
/// ```
/// use rust_structured_logger::ErrorPayload;
///
/// let payload = ErrorPayload::new("DivideByZero", "attempted to divide by zero")
///     .caused_by(ErrorPayload::new("Input", "denominator was 0"));
///
/// assert_eq!(payload.causes().count(), 1);
/// assert!(payload.render_trace().contains(" ---> Input: denominator was 0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    kind: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<Box<ErrorPayload>>,
}

impl ErrorPayload {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Append `cause` at the end of this payload's cause chain
    #[must_use]
    pub fn caused_by(mut self, cause: ErrorPayload) -> Self {
        self.push_cause(cause);
        self
    }

    fn push_cause(&mut self, cause: ErrorPayload) {
        match self.cause {
            Some(ref mut next) => next.push_cause(cause),
            None => self.cause = Some(Box::new(cause)),
        }
    }

    /// Capture an error and its `source()` chain
    ///
    /// The kind of the outer error is its type name; sources are reached
    /// through `dyn Error` and recorded with the kind `Error`.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut payload = ErrorPayload::new(short_type_name::<E>(), error.to_string());
        let mut source = error.source();
        while let Some(inner) = source {
            payload = payload.caused_by(ErrorPayload::new("Error", inner.to_string()));
            source = inner.source();
        }
        payload
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&ErrorPayload> {
        self.cause.as_deref()
    }

    /// Iterate over the causes, nearest first
    pub fn causes(&self) -> impl Iterator<Item = &ErrorPayload> {
        std::iter::successors(self.cause(), |p| p.cause())
    }

    /// Multi-line trace: the error on the first line, one line per cause
    pub fn render_trace(&self) -> String {
        let mut out = format!("{}: {}", self.kind, self.message);
        for cause in self.causes() {
            out.push_str("\n ---> ");
            out.push_str(&cause.kind);
            out.push_str(": ");
            out.push_str(&cause.message);
        }
        out
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_trace())
    }
}

fn short_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    if full.starts_with("dyn ") {
        return "Error".to_string();
    }
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
