//! Appender trait for log output destinations

use super::error::Result;

/// A sink for rendered log lines.
///
/// `line` is one complete, newline-terminated entry. Implementations must
/// write it whole: the logger serializes calls, so a line is never
/// interleaved with another.
pub trait Appender: Send {
    fn append(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<A: Appender + ?Sized> Appender for Box<A> {
    fn append(&mut self, line: &str) -> Result<()> {
        (**self).append(line)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
