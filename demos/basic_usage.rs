//! Basic logger usage example
//!
//! Demonstrates level filtering, message templates, and the six levels.
//!
//! Run with: cargo run --example basic_usage

use rust_structured_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .min_level(LogLevel::Verbose)
        .write_to(ConsoleSink::new())
        .build()?;

    println!("1. Logging at different levels:");
    logger.verbose("This is a verbose message");
    logger.debug("This is a debug message");
    logger.info("This is an information message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message");
    logger.flush()?;

    println!("\n2. Minimum level Information - verbose and debug won't show:");
    let logger = Logger::builder()
        .min_level(LogLevel::Information)
        .write_to(
            ConsoleSink::new()
                .with_template("[{Level:u3}] {Message}{NewLine}")?
                .with_colors(false),
        )
        .build()?;
    logger.verbose("Verbose message (hidden)");
    logger.debug("Debug message (hidden)");
    logger.info("Information message (visible)");

    println!("\n3. Message templates capture properties:");
    logger.log(
        LogLevel::Information,
        "Processed {Count} orders for {Customer}",
        &[42.into(), "Contoso".into()],
    )?;
    logger.log(LogLevel::Warning, "Cache {Cache:j} is {Percent} full", &["sessions".into(), 93.into()])?;

    println!("\n4. Metrics:");
    logger.flush()?;
    let metrics = logger.metrics();
    println!("   delivered: {}", metrics.total_logged());
    println!("   filtered:  {}", metrics.filtered_count());

    logger.shutdown()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
