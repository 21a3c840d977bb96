//! File logging example
//!
//! Demonstrates a rotating log file with retention and compression.
//!
//! Run with: cargo run --example file_logging

use shlog::prelude::*;

fn main() -> Result<()> {
    println!("=== shlog - File Logging Example ===\n");

    let policy = RotationPolicy::new()
        .with_max_size(4 * 1024)
        .with_max_backups(3)
        .with_compression(true);

    let logger = Logger::builder()
        .level(LogLevel::Debug)
        .file("logs/application.log")
        .rotation_policy(policy.clone())
        .build()?;

    println!("1. Writing enough lines to rotate a few times:");
    logger.info("Application started")?;
    logger.debug("Loading configuration...")?;
    for i in 1..=200 {
        logger.info(format!("Processing item {}/200", i))?;
        if i % 50 == 0 {
            logger.warn(format!("Checkpoint at item {}", i))?;
        }
    }
    logger.info("All operations completed")?;
    logger.flush()?;

    println!("\n2. Backups on disk (newest first):");
    let appender = RotatingFileAppender::with_policy("logs/application.log", policy)?;
    for backup in appender.backups()? {
        println!("   {}", backup.display());
    }

    println!("\n3. Loading the same setup from JSON:");
    let config = LoggerConfig::from_json(
        r#"{ "level": "WARN", "file": "logs/configured.log", "rotation": { "max_size": 8192 } }"#,
    )?;
    let configured = config.build()?;
    configured.info("hidden below WARN")?;
    configured.error("written to logs/configured.log")?;

    println!("\n=== Example completed successfully! ===");
    println!("Check the 'logs' directory for the output");

    Ok(())
}
