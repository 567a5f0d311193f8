//! Event system for analysis-core logging

use super::codes::{self, Code};
use crate::utils::SourceLocation;
use std::collections::HashMap;
use std::time::SystemTime;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    /// Create a new error event
    pub fn error(error_code: Code, message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level: LogLevel::Error,
            code: error_code,
            message: message.to_string(),
            location: None,
            context: HashMap::new(),
        }
    }

    /// Create a new warning event (warnings may not have codes)
    pub fn warning(message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level: LogLevel::Warning,
            code: Code::new("W000"),
            message: message.to_string(),
            location: None,
            context: HashMap::new(),
        }
    }

    /// Create a new info event
    pub fn info(message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level: LogLevel::Info,
            code: Code::new("I000"),
            message: message.to_string(),
            location: None,
            context: HashMap::new(),
        }
    }

    /// Create a success event (info with success code)
    pub fn success(success_code: Code, message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level: LogLevel::Info,
            code: success_code,
            message: message.to_string(),
            location: None,
            context: HashMap::new(),
        }
    }

    /// Create a debug event
    pub fn debug(message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level: LogLevel::Debug,
            code: Code::new("D000"),
            message: message.to_string(),
            location: None,
            context: HashMap::new(),
        }
    }

    /// Attach a source location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach a context key/value pair
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn is_debug(&self) -> bool {
        self.level == LogLevel::Debug
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.code.as_str())
    }

    /// Plain text rendering for console sinks
    pub fn format(&self) -> String {
        let mut out = format!("[{}][{}] {}", self.level.as_str(), self.code, self.message);
        if let Some(loc) = self.location {
            out.push_str(&format!(" ({})", loc));
        }
        if !self.context.is_empty() {
            let mut keys: Vec<&String> = self.context.keys().collect();
            keys.sort();
            let parts: Vec<String> = keys
                .iter()
                .map(|k| format!("{}={}", k, self.context[*k]))
                .collect();
            out.push_str(&format!(" {{{}}}", parts.join(", ")));
        }
        out
    }

    /// Structured JSON rendering for tooling sinks
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let timestamp: chrono::DateTime<chrono::Utc> = self.timestamp.into();
        serde_json::to_string(&serde_json::json!({
            "timestamp": timestamp.to_rfc3339(),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "location": self.location.map(|l| l.to_string()),
            "context": self.context,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_event_format() {
        let event = LogEvent::error(codes::pattern::INVALID_VARID, "varid is 0")
            .with_location(SourceLocation::new(0, 3, 1))
            .with_context("pattern", "%varid% =");
        let text = event.format();
        assert!(text.starts_with("[ERROR][E040] varid is 0 (3:1)"));
        assert!(text.contains("pattern=%varid% ="));
    }

    #[test]
    fn test_event_json() {
        let event = LogEvent::success(codes::success::STREAM_CONSTRUCTED, "stream built")
            .with_context("tokens", "6");
        let json = event.format_json().expect("serializable event");
        assert!(json.contains("\"code\":\"I020\""));
        assert!(json.contains("\"tokens\":\"6\""));
    }

    #[test]
    fn test_event_classification() {
        let event = LogEvent::error(codes::system::INITIALIZATION_FAILURE, "boom");
        assert!(event.requires_halt());
        assert_eq!(event.category(), "System");
        assert_eq!(event.severity(), "Critical");
    }
}
