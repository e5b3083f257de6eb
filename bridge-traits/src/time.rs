//! Time and Logging Abstractions
//!
//! The injectable time source behind token expiry checks, and the leveled
//! sink the host receives mirrored log events through.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// Time source, injected so expiry can be tested deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Whether something expiring at `expires_at` is expired at `now`, or will be
/// within `buffer_seconds`.
///
/// Without a known expiry nothing ever expires.
pub fn expires_within(
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    buffer_seconds: i64,
) -> bool {
    expires_at
        .map(|at| now + Duration::seconds(buffer_seconds) >= at)
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// One log event as handed to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Module path of the emitting code, e.g. `core_auth::authorizer`
    pub target: String,
    pub message: String,
    /// Structured fields, already redacted
    pub fields: HashMap<String, String>,
    /// Name of the innermost active span
    pub span_id: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            fields: HashMap::new(),
            span_id: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }
}

/// Host logging sink
///
/// Receives every event the session logs that passes [`min_level`]. Entries
/// arrive with token-like fields already masked.
///
/// - **Web**: the browser console
/// - **Desktop**: the application's own logger
///
/// [`min_level`]: LoggerSink::min_level
#[async_trait]
pub trait LoggerSink: Send + Sync {
    async fn log(&self, entry: LogEntry) -> Result<()>;

    /// Events below this level are dropped before reaching the sink.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_expires_within() {
        let now = Utc::now();
        let at = Some(now + Duration::minutes(10));

        assert!(!expires_within(at, now, 60));
        assert!(expires_within(at, now, 600));
        assert!(expires_within(at, now + Duration::minutes(11), 0));
        assert!(!expires_within(None, now, i64::from(u16::MAX)));
    }

    #[test]
    fn test_log_entry_builder() {
        let entry = LogEntry::new(LogLevel::Warn, "core_auth::authorizer", "Failed to authorize")
            .with_field("attempt", "2")
            .with_span_id("authorize");

        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.target, "core_auth::authorizer");
        assert_eq!(entry.fields.get("attempt"), Some(&"2".to_string()));
        assert_eq!(entry.span_id.as_deref(), Some("authorize"));
    }
}
