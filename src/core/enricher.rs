//! Enrichers add contextual properties to events before they reach sinks
//!
//! Every built-in enricher uses add-if-absent semantics, so a property that
//! is already on the event (explicitly supplied, or added by an enricher
//! registered earlier) is never overwritten.

use super::diagnostics::panic_message;
use super::log_event::LogEvent;
use super::property::PropertyValue;
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

pub trait Enricher: Send + Sync {
    fn enrich(&self, event: &mut LogEvent);

    fn name(&self) -> &str;

    /// Property keys this enricher may add, used to validate sink templates
    fn property_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Ordered, fixed list of enrichers
#[derive(Default)]
pub struct EnricherChain {
    enrichers: Vec<Box<dyn Enricher>>,
}

impl EnricherChain {
    pub fn new(enrichers: Vec<Box<dyn Enricher>>) -> Self {
        Self { enrichers }
    }

    /// Apply every enricher in registration order
    ///
    /// A panicking enricher is skipped and the rest still run. Returns the
    /// name and panic message of each enricher that panicked.
    pub fn enrich(&self, event: &mut LogEvent) -> Vec<(&str, String)> {
        let mut panicked = Vec::new();
        for enricher in &self.enrichers {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| enricher.enrich(event))) {
                panicked.push((enricher.name(), panic_message(payload.as_ref())));
            }
        }
        panicked
    }

    pub fn property_names(&self) -> Vec<String> {
        self.enrichers
            .iter()
            .flat_map(|e| e.property_names())
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.enrichers.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.enrichers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enrichers.is_empty()
    }
}

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID_CACHE: Cell<u64> = const { Cell::new(0) };
}

/// Small sequential id of the calling thread, assigned on first use
pub fn current_thread_id() -> u64 {
    THREAD_ID_CACHE.with(|cache| {
        let cached = cache.get();
        if cached != 0 {
            return cached;
        }
        let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        cache.set(id);
        id
    })
}

/// Adds `ThreadId`: a stable integer per OS thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadIdEnricher;

impl ThreadIdEnricher {
    pub const PROPERTY: &'static str = "ThreadId";

    pub fn new() -> Self {
        Self
    }
}

impl Enricher for ThreadIdEnricher {
    fn enrich(&self, event: &mut LogEvent) {
        event.add_property_if_absent(Self::PROPERTY, current_thread_id());
    }

    fn name(&self) -> &str {
        "thread_id"
    }

    fn property_names(&self) -> Vec<String> {
        vec![Self::PROPERTY.to_string()]
    }
}

/// Adds `ThreadName` when the current thread has a name
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadNameEnricher;

impl ThreadNameEnricher {
    pub const PROPERTY: &'static str = "ThreadName";

    pub fn new() -> Self {
        Self
    }
}

impl Enricher for ThreadNameEnricher {
    fn enrich(&self, event: &mut LogEvent) {
        if let Some(name) = std::thread::current().name() {
            event.add_property_if_absent(Self::PROPERTY, name);
        }
    }

    fn name(&self) -> &str {
        "thread_name"
    }

    fn property_names(&self) -> Vec<String> {
        vec![Self::PROPERTY.to_string()]
    }
}

/// Adds `ProcessId`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIdEnricher;

impl ProcessIdEnricher {
    pub const PROPERTY: &'static str = "ProcessId";

    pub fn new() -> Self {
        Self
    }
}

impl Enricher for ProcessIdEnricher {
    fn enrich(&self, event: &mut LogEvent) {
        event.add_property_if_absent(Self::PROPERTY, std::process::id());
    }

    fn name(&self) -> &str {
        "process_id"
    }

    fn property_names(&self) -> Vec<String> {
        vec![Self::PROPERTY.to_string()]
    }
}

/// Adds one fixed property to every event
///
/// Useful for common fields like service name, version, or environment.
#[derive(Debug, Clone)]
pub struct PropertyEnricher {
    key: String,
    value: PropertyValue,
}

impl PropertyEnricher {
    pub fn new(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Enricher for PropertyEnricher {
    fn enrich(&self, event: &mut LogEvent) {
        event.add_property_if_absent(self.key.clone(), self.value.clone());
    }

    fn name(&self) -> &str {
        &self.key
    }

    fn property_names(&self) -> Vec<String> {
        vec![self.key.clone()]
    }
}

/// Enricher backed by a closure
///
/// # Example
///
/// ```
/// use rust_structured_logger::{FnEnricher, LogEvent};
///
/// let enricher = FnEnricher::new("region", ["Region"], |event: &mut LogEvent| {
///     event.add_property_if_absent("Region", "eu-west-1");
/// });
/// ```
pub struct FnEnricher<F> {
    name: String,
    property_names: Vec<String>,
    func: F,
}

impl<F> FnEnricher<F>
where
    F: Fn(&mut LogEvent) + Send + Sync,
{
    pub fn new<I, S>(name: impl Into<String>, property_names: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            property_names: property_names.into_iter().map(Into::into).collect(),
            func,
        }
    }
}

impl<F> Enricher for FnEnricher<F>
where
    F: Fn(&mut LogEvent) + Send + Sync,
{
    fn enrich(&self, event: &mut LogEvent) {
        (self.func)(event);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn property_names(&self) -> Vec<String> {
        self.property_names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, Properties};

    fn event_with(key: &str, value: &str) -> LogEvent {
        LogEvent::new(
            LogLevel::Information,
            "test",
            &[],
            None,
            Properties::new().with_property(key, value),
        )
    }

    #[test]
    fn test_thread_id_is_stable_per_thread() {
        let first = current_thread_id();
        assert_eq!(first, current_thread_id());

        let other = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_thread_id_enricher_adds_integer() {
        let mut event = LogEvent::literal(LogLevel::Information, "hello");
        ThreadIdEnricher.enrich(&mut event);
        assert_eq!(
            event.property("ThreadId").and_then(PropertyValue::as_int),
            Some(current_thread_id() as i64)
        );
    }

    #[test]
    fn test_existing_property_is_not_overwritten() {
        let mut event = event_with("ThreadId", "explicit");
        ThreadIdEnricher.enrich(&mut event);
        assert_eq!(event.property("ThreadId"), Some(&PropertyValue::from("explicit")));
    }

    #[test]
    fn test_chain_first_registered_wins() {
        let chain = EnricherChain::new(vec![
            Box::new(PropertyEnricher::new("Env", "first")),
            Box::new(PropertyEnricher::new("Env", "second")),
        ]);
        let mut event = LogEvent::literal(LogLevel::Information, "x");
        chain.enrich(&mut event);
        assert_eq!(event.property("Env"), Some(&PropertyValue::from("first")));
    }

    #[test]
    fn test_panicking_enricher_is_skipped() {
        let chain = EnricherChain::new(vec![
            Box::new(FnEnricher::new("exploding", Vec::<String>::new(), |_: &mut LogEvent| {
                panic!("enricher exploded")
            })),
            Box::new(PropertyEnricher::new("App", "demo")),
        ]);
        let mut event = LogEvent::literal(LogLevel::Information, "x");

        let panicked = chain.enrich(&mut event);

        assert_eq!(panicked, vec![("exploding", "enricher exploded".to_string())]);
        assert_eq!(event.property("App"), Some(&PropertyValue::from("demo")));
    }

    #[test]
    fn test_rerunning_chain_is_a_no_op() {
        let chain = EnricherChain::new(vec![
            Box::new(ThreadIdEnricher),
            Box::new(ProcessIdEnricher),
            Box::new(PropertyEnricher::new("App", "demo")),
        ]);
        let mut event = LogEvent::literal(LogLevel::Information, "x");
        chain.enrich(&mut event);
        let once = event.properties().clone();
        chain.enrich(&mut event);
        assert_eq!(event.properties(), &once);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_thread_name_only_for_named_threads() {
        let named = std::thread::Builder::new()
            .name("worker-7".to_string())
            .spawn(|| {
                let mut event = LogEvent::literal(LogLevel::Information, "x");
                ThreadNameEnricher.enrich(&mut event);
                event.property("ThreadName").cloned()
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(named, Some(PropertyValue::from("worker-7")));

        let unnamed = std::thread::spawn(|| {
            let mut event = LogEvent::literal(LogLevel::Information, "x");
            ThreadNameEnricher.enrich(&mut event);
            event.property("ThreadName").cloned()
        })
        .join()
        .unwrap();
        assert_eq!(unnamed, None);
    }

    #[test]
    fn test_chain_property_names() {
        let chain = EnricherChain::new(vec![
            Box::new(ThreadIdEnricher),
            Box::new(FnEnricher::new("custom", ["A", "B"], |_: &mut LogEvent| {})),
        ]);
        assert_eq!(chain.property_names(), vec!["ThreadId", "A", "B"]);
        assert_eq!(chain.names(), vec!["thread_id", "custom"]);
    }
}
