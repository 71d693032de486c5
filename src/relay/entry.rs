//! This module defines the log entry data model and the outbound wire events.
use serde::{Deserialize, Serialize};

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a level string as delivered by log events.
    ///
    /// Returns `None` for an empty or unrecognized string; callers treat
    /// that as a malformed event and drop it rather than erroring.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

/// A single buffered log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Name of the module the entry originated from.
    pub source: String,
    /// The log level.
    pub level: LogLevel,
    /// The message content.
    pub message: String,
}

/// Events the relay emits to clients over the transport.
///
/// Serialized as JSON tagged by a `type` field. Field order on `Log` is
/// fixed: timestamp, source, level, message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    Log {
        timestamp: i64,
        source: String,
        level: LogLevel,
        message: String,
    },
    LogClear,
}

impl RelayEvent {
    pub fn from_entry(entry: &LogEntry) -> Self {
        Self::Log {
            timestamp: entry.timestamp,
            source: entry.source.clone(),
            level: entry.level,
            message: entry.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
    }

    #[test]
    fn rejects_empty_and_unknown_levels() {
        assert_eq!(LogLevel::parse(""), None);
        assert_eq!(LogLevel::parse("trace"), None);
        assert_eq!(LogLevel::parse("INFO"), None);
    }

    #[test]
    fn maps_tracing_levels() {
        assert_eq!(LogLevel::from(tracing::Level::TRACE), LogLevel::Debug);
        assert_eq!(LogLevel::from(tracing::Level::INFO), LogLevel::Info);
        assert_eq!(LogLevel::from(tracing::Level::ERROR), LogLevel::Error);
    }

    #[test]
    fn log_event_wire_format_preserves_field_order() {
        let event = RelayEvent::Log {
            timestamp: 1700000000000,
            source: "core".to_string(),
            level: LogLevel::Info,
            message: "hello".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"log","timestamp":1700000000000,"source":"core","level":"info","message":"hello"}"#
        );
    }

    #[test]
    fn clear_event_wire_format() {
        let json = serde_json::to_string(&RelayEvent::LogClear).unwrap();
        assert_eq!(json, r#"{"type":"log_clear"}"#);
    }
}
