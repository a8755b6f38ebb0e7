//! Logging macros taking `Code` values and `"key" => value` context pairs
//!
//! Context values may be any `Display` type.

/// Formats `"key" => value` pairs into owned context strings
#[doc(hidden)]
#[macro_export]
macro_rules! __log_pairs {
    ($($key:expr => $value:expr),*) => {
        vec![$(($key, format!("{}", $value))),*]
    };
}

/// Log error with Code type
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_error_with_context($code, $message, Some($span), &$crate::__log_pairs!($($key => $value),*))
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_error_with_context($code, $message, None, &$crate::__log_pairs!($($key => $value),*))
    };
}

/// Log success with Code type
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_success_with_context($code, $message, &$crate::__log_pairs!($($key => $value),*))
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_with_level(
            $crate::logging::LogEvent::info($message),
            &$crate::__log_pairs!($($key => $value),*),
        )
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warning {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_with_level(
            $crate::logging::LogEvent::warning($message),
            &$crate::__log_pairs!($($key => $value),*),
        )
    };
}

/// Log debug message; context is only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            $crate::logging::log_with_level(
                $crate::logging::LogEvent::debug($message),
                &$crate::__log_pairs!($($key => $value),*),
            )
        }
    };
}

/// Log a success event carrying the elapsed time of a stage
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr) => {
        if $crate::logging::config::log_performance_events() {
            $crate::log_success!($code, $message,
                "duration_ms" => $duration.as_secs_f64() * 1000.0
            );
        }
    };

    ($code:expr, $message:expr, duration = $duration:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::config::log_performance_events() {
            $crate::log_success!($code, $message,
                "duration_ms" => $duration.as_secs_f64() * 1000.0,
                $($key => $value),+
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_macros_expand_without_global_logger() {
        let duration = std::time::Duration::from_millis(3);
        let span = Span::covering(Position::start(), "@");

        log_error!(codes::lexical::SYNTAX_ERROR, "Unrecognized input",
            "near" => "@",
            "offset" => 0
        );
        log_error!(codes::lexical::SYNTAX_ERROR, "Unrecognized input", span = span);
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => 7
        );
        log_info!("Converting expression", "length" => 5);
        log_warning!("Deep nesting", "depth" => 900);
        log_debug!("Stack push", "token" => "+");
        log_performance!(codes::success::PIPELINE_COMPLETE,
            "Pipeline finished",
            duration = duration,
            "tokens" => 3
        );
    }
}
