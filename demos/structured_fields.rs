//! Structured fields example
//!
//! Demonstrates attaching record members to log lines.
//!
//! Run with: cargo run --example structured_fields

use shlog::prelude::*;
use shlog::validators::AccountRecord;
use shlog::loggable;
use std::sync::Arc;

loggable! {
    #[derive(Debug, Clone)]
    struct Order {
        id: u64,
        customer: String,
        total: f64,
        coupon: Option<String>,
    }
}

fn main() -> Result<()> {
    println!("=== shlog - Structured Fields Example ===\n");

    let logger = Logger::new();

    println!("1. A struct declared with loggable!:");
    let order = Order {
        id: 1042,
        customer: "kim".to_string(),
        total: 37.5,
        coupon: None,
    };
    logger.log_fields(LogLevel::Info, "order placed", &order)?;

    println!("\n2. Shared pointers work the same way:");
    let shared = Arc::new(order.clone());
    logger.log_fields(LogLevel::Debug, "order queued", shared)?;

    println!("\n3. Ad-hoc context:");
    let context = LogContext::new()
        .with_field("order_id", order.id)
        .with_field("retry", true);
    logger.log_with_context(LogLevel::Warn, "payment retried", context)?;

    println!("\n4. Account records mask the password:");
    let account = AccountRecord {
        email: "kim@example.com".into(),
        password: "correct-horse1".into(),
        name: "Kim".into(),
        phone_number: "010-1234-5678".into(),
    };
    match account.validate() {
        Ok(()) => logger.log_fields(LogLevel::Info, "account accepted", &account)?,
        Err(e) => logger.log_fields(LogLevel::Error, format!("account rejected: {}", e), &account)?,
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
