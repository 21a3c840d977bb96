//! Log entry structure

use super::caller::CallerInfo;
use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub caller: CallerInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<LogContext>,
}

/// Escape line breaks and tabs so one entry renders as one physical line.
///
/// Applied at render time, after truncation, so an escape is never cut.
pub(crate) fn sanitize(text: &str) -> String {
    if !text.contains(['\n', '\r', '\t']) {
        return text.to_string();
    }
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: message.as_ref().to_string(),
            timestamp: Utc::now(),
            caller: CallerInfo::unknown(),
            context: None,
        }
    }

    #[must_use]
    pub fn with_caller(mut self, caller: CallerInfo) -> Self {
        self.caller = caller;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_defaults() {
        let entry = LogEntry::new(LogLevel::Info, "a\nb");
        assert_eq!(entry.message, "a\nb");
        assert!(entry.caller.is_unknown());
        assert!(entry.context.is_none());
    }

    #[test]
    fn test_sanitize_escapes_breaks() {
        assert_eq!(sanitize("a\nb\r\tc"), "a\\nb\\r\\tc");
        assert_eq!(sanitize("plain"), "plain");
    }
}
