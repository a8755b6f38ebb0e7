//! Logging configuration: compile-time limits plus runtime user preferences
//!
//! Limits come from the build profile and cannot be changed at runtime.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences.
///
/// Only the first call wins, and the first log call without installed
/// preferences fixes them to the environment defaults.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized")?;

    Ok(())
}

fn get_runtime_preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES.get_or_init(LoggingPreferences::default)
}

/// Minimum log level chosen by the user
pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn log_performance_events() -> bool {
    get_runtime_preferences().log_performance_events
}

/// In-memory event buffer capacity
pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Validate compile-time logging limits
pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE == 0 {
        return Err("Log buffer size cannot be zero".to_string());
    }

    if MAX_LOG_MESSAGE_LENGTH < 64 {
        return Err(format!(
            "Max log message length too small: {}",
            MAX_LOG_MESSAGE_LENGTH
        ));
    }

    Ok(())
}

pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         === Limits (Compile-time) ===\n\
         - Log buffer size: {}\n\
         - Max message length: {}\n\
         === User Preferences (Runtime) ===\n\
         - Min log level: {:?}\n\
         - Structured logging: {}\n\
         - Console logging: {}\n\
         - Performance events: {}",
        LOG_BUFFER_SIZE,
        MAX_LOG_MESSAGE_LENGTH,
        preferences.min_log_level,
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        preferences.log_performance_events,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_min_level_follows_preferences() {
        let preferences = get_runtime_preferences();
        assert_eq!(
            get_min_log_level(),
            preferences.min_log_level.to_events_log_level()
        );
        assert!(std::ptr::eq(preferences, get_runtime_preferences()));
    }

    #[test]
    fn test_preferences_fixed_after_first_read() {
        get_runtime_preferences();
        assert!(init_runtime_preferences(LoggingPreferences::default()).is_err());
    }

    #[test]
    fn test_summary_lists_limits() {
        let summary = get_config_summary();
        assert!(summary.contains("Log buffer size"));
        assert!(summary.contains("Min log level"));
    }
}
