//! Timestamp formatting utilities
//!
//! Line timestamps default to `2006-01-02 15:04:05` style local time.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Default strftime pattern for line timestamps.
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use shlog::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::UnixMillis;
/// let stamp = format.format(&Utc::now());
/// assert!(stamp.parse::<i64>().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local wall-clock time: `2025-01-08 10:30:45`
    #[default]
    DateTime,

    /// RFC 3339 in UTC: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime pattern, rendered in local time
    ///
    /// ```
    /// use shlog::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::DateTime => datetime
                .with_timezone(&Local)
                .format(DEFAULT_TIMESTAMP_PATTERN)
                .to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(pattern) => Self::format_pattern(datetime, pattern),
        }
    }

    /// strftime rendering that never panics on a malformed pattern.
    fn format_pattern(datetime: &DateTime<Utc>, pattern: &str) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let local = datetime.with_timezone(&Local);
        if write!(out, "{}", local.format(pattern)).is_err() {
            out.clear();
            out.push_str(&local.format(DEFAULT_TIMESTAMP_PATTERN).to_string());
        }
        out
    }
}
