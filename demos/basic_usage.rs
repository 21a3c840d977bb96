//! Basic logger usage example
//!
//! Demonstrates console logging, levels, runtime threshold changes and the
//! process-wide logger.
//!
//! Run with: cargo run --example basic_usage

use shlog::prelude::*;
use shlog::{info, logf, warn};

fn main() -> Result<()> {
    println!("=== shlog - Basic Usage Example ===\n");

    let logger = Logger::builder().level(LogLevel::Trace).build()?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;

    println!("\n2. Changing the threshold at runtime:");
    logger.set_level_name("WARN")?;
    logger.info("Info message (hidden)")?;
    warn!(logger, "Warning message with a value: {}", 42)?;
    if let Err(e) = logger.set_level_name("LOUD") {
        println!("   rejected: {}", e);
    }

    println!("\n3. Caller attribution:");
    handle_request(&logger, 7)?;

    println!("\n4. Process-wide logger:");
    shlog::init_logger("")?;
    shlog::log("INFO", "logged through the global logger");
    logf!("DEBUG", "{} + {} = {}", 1, 2, 3);
    shlog::change_log_level("ERROR")?;
    shlog::log("INFO", "hidden after change_log_level");
    shlog::shutdown();

    println!("\n=== Example completed successfully! ===");
    Ok(())
}

fn handle_request(logger: &Logger, id: u32) -> Result<()> {
    info!(logger, "handling request {}", id)
}
