// RUNTIME PREFERENCES (User Experience)
//
// Nothing in here changes how an expression is parsed. These toggles only
// control metrics collection and logging verbosity.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to collect per-category token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to track operator usage patterns
    pub track_operator_patterns: bool,

    /// Whether to show position information in error log context
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            track_operator_patterns: env_flag(env_vars::LEXICAL_TRACK_OPERATORS, false),
            include_position_in_errors: env_flag(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransducerPreferences {
    /// Log every Plus/Minus that is rewritten to its unary form
    pub log_reclassifications: bool,

    /// Log operator stack pops as they move tokens to the output
    pub log_stack_operations: bool,
}

impl Default for TransducerPreferences {
    fn default() -> Self {
        Self {
            log_reclassifications: env_flag(env_vars::TRANSDUCER_LOG_RECLASSIFICATIONS, false),
            log_stack_operations: env_flag(env_vars::TRANSDUCER_LOG_STACK_OPERATIONS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchPreferences {
    /// Skip lines starting with `#` in expression files
    pub skip_comment_lines: bool,

    /// Stop at the first failing expression
    pub fail_fast: bool,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        Self {
            skip_comment_lines: env_flag(env_vars::BATCH_SKIP_COMMENTS, true),
            fail_fast: env_flag(env_vars::BATCH_FAIL_FAST, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,

    /// Whether to include timing metrics in logs
    pub log_performance_events: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_flag(env_vars::LOGGING_LOG_PERFORMANCE, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Failures while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid runtime configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub transducer: TransducerPreferences,
    pub batch: BatchPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML text. Missing sections fall back to
    /// environment-derived defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "RPN_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_TRACK_OPERATORS: &str = "RPN_LEXICAL_TRACK_OPERATORS";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "RPN_LEXICAL_INCLUDE_POSITIONS";

    // Transducer
    pub const TRANSDUCER_LOG_RECLASSIFICATIONS: &str = "RPN_TRANSDUCER_LOG_RECLASSIFICATIONS";
    pub const TRANSDUCER_LOG_STACK_OPERATIONS: &str = "RPN_TRANSDUCER_LOG_STACK_OPERATIONS";

    // Batch
    pub const BATCH_SKIP_COMMENTS: &str = "RPN_BATCH_SKIP_COMMENTS";
    pub const BATCH_FAIL_FAST: &str = "RPN_BATCH_FAIL_FAST";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "RPN_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "RPN_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "RPN_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "RPN_LOGGING_LOG_PERFORMANCE";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_partial_toml_keeps_other_sections() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [lexical]
            track_operator_patterns = true

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.lexical.track_operator_patterns);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = RuntimeConfig::from_toml_str("[lexical\ntrack = ");
        assert_matches!(result, Err(ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch]\nfail_fast = true").unwrap();

        let config = RuntimeConfig::load(file.path()).unwrap();
        assert!(config.batch.fail_fast);
    }

    #[test]
    fn test_load_missing_file() {
        let result = RuntimeConfig::load("/definitely/not/here.toml");
        assert_matches!(result, Err(ConfigError::Io { .. }));
    }
}
