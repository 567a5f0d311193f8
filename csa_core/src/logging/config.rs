//! Runtime logging preferences
//!
//! Environment-driven, cached once per process. The analysis core never
//! reads configuration files; embedders either accept the environment
//! defaults or install preferences before the first log call.

use super::events::LogLevel;
use crate::config::constants::compile_time;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct LoggingPreferences {
    /// Minimum level that reaches any sink
    pub min_log_level: LogLevel,

    /// Whether events are echoed to the console
    pub enable_console: bool,

    /// Whether console output is JSON instead of plain text
    pub use_structured: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: env::var(env_vars::LOG_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_console: env::var(env_vars::LOG_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            use_structured: env::var(env_vars::LOG_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

fn preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES.get_or_init(LoggingPreferences::default)
}

/// Install preferences explicitly (before the first log call wins)
pub fn set_preferences(prefs: LoggingPreferences) -> Result<(), LoggingPreferences> {
    RUNTIME_PREFERENCES.set(prefs)
}

pub fn get_min_log_level() -> LogLevel {
    preferences().min_log_level
}

pub fn use_console_logging() -> bool {
    preferences().enable_console
}

pub fn use_structured_logging() -> bool {
    preferences().use_structured
}

pub fn get_event_buffer_size() -> usize {
    compile_time::logging::LOG_BUFFER_SIZE
}

/// Sanity-check the cached configuration
pub fn validate_config() -> Result<(), String> {
    if get_event_buffer_size() == 0 {
        return Err("log buffer size must be non-zero".to_string());
    }
    Ok(())
}

pub fn get_config_summary() -> String {
    format!(
        "Logging: min_level={}, console={}, structured={}, buffer={}",
        get_min_log_level().as_str(),
        use_console_logging(),
        use_structured_logging(),
        get_event_buffer_size()
    )
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const LOG_MIN_LEVEL: &str = "CSA_LOG_MIN_LEVEL";
    pub const LOG_CONSOLE: &str = "CSA_LOG_CONSOLE";
    pub const LOG_STRUCTURED: &str = "CSA_LOG_STRUCTURED";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("WARN"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("2"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("bogus"), None);
    }

    #[test]
    fn test_config_validates() {
        assert!(validate_config().is_ok());
        assert!(get_config_summary().contains("Logging:"));
    }
}
