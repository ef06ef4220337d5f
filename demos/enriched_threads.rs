//! Thread-id enrichment and concurrent emission
//!
//! Installs a process-wide logger with a thread-id enricher, attaches an
//! error to an event, and logs a list of names from several threads.
//!
//! Run with: cargo run --example enriched_threads

use rust_structured_logger::global;
use rust_structured_logger::prelude::*;
use std::thread;

#[derive(Debug, thiserror::Error)]
#[error("Attempted to divide by zero.")]
struct DivideByZeroError;

fn divide(numerator: i64, denominator: i64) -> std::result::Result<i64, DivideByZeroError> {
    numerator.checked_div(denominator).ok_or(DivideByZeroError)
}

fn main() -> Result<()> {
    let logger = Logger::builder()
        .min_level(LogLevel::Information)
        .enrich_with(ThreadIdEnricher::new())
        .write_to(
            ConsoleSink::new()
                .with_template("{Timestamp:%H:%M} [{Level}] ({ThreadId}) {Message} {NewLine}{Exception}")?,
        )
        .build()?;
    global::init(logger)?;

    global::log(LogLevel::Information, "This is an Information level log entry. It should be shown.", &[])?;
    global::log(LogLevel::Error, "This is an Error level log entry. It should be shown.", &[])?;
    global::log(LogLevel::Debug, "This is a Debug level log entry. It should not be shown.", &[])?;

    global::log(LogLevel::Information, "This time we're going to add an exception to an Error log.", &[])?;
    if let Err(e) = divide(1, 0) {
        global::log_error(LogLevel::Error, &e, "We caught an exception!", &[])?;
    }

    let names = ["Chase", "Kevin", "Thomas", "Beth", "Rachel"];
    let handles: Vec<_> = names
        .into_iter()
        .map(|name| thread::spawn(move || global::log(LogLevel::Information, "{Name}", &[name.into()])))
        .collect();

    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => eprintln!("a logging thread panicked"),
        }
    }

    global::close_and_flush()
}
