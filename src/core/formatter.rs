//! Text formatter for log lines
//!
//! Every entry renders to exactly one newline-terminated line:
//!
//! ```text
//! 2025-01-08 10:30:45 [INFO][handlers][login] user signed in email=a@b.com
//! ```
//!
//! The level name and every field key are wrapped in the level's ANSI color.

use super::log_entry::{sanitize, LogEntry};
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Default cap on the rendered message, in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 256;

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFormatter {
    pub timestamp_format: TimestampFormat,
    pub max_message_length: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::default(),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }
}

impl TextFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    /// Render `entry` as a single line, including the trailing newline.
    pub fn format(&self, entry: &LogEntry) -> String {
        let color = entry.level.color().to_fg_str();
        let mut line = String::with_capacity(64 + entry.message.len());

        line.push_str(&self.timestamp_format.format(&entry.timestamp));

        // Writing into a String cannot fail
        let _ = write!(
            line,
            " [\x1b[{}m{}{}]{}",
            color,
            entry.level.as_str(),
            RESET,
            entry.caller
        );

        line.push(' ');
        line.push_str(&sanitize(truncate_chars(&entry.message, self.max_message_length)));

        if let Some(ref context) = entry.context {
            for (key, value) in context.fields() {
                let _ = write!(
                    line,
                    " \x1b[{}m{}{}={}",
                    color,
                    sanitize(key),
                    RESET,
                    sanitize(&value.to_string())
                );
            }
        }

        line.push('\n');
        line
    }
}

/// Longest prefix of `text` holding at most `max` characters.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
