//! Global logging module for the RPN compiler
//!
//! Provides a thread-safe global logger, per-thread expression context used
//! during batch processing, and the support functions behind the logging
//! macros.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Identifies the expression currently being processed on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionContext {
    pub source: String,
    pub line: usize,
}

thread_local! {
    static EXPRESSION_CONTEXT: RefCell<Option<ExpressionContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    codes::ensure_registered(&[
        codes::system::INTERNAL_ERROR,
        codes::input::INVALID_INPUT,
        codes::lexical::SYNTAX_ERROR,
        codes::transducer::MISPLACED_COMMA,
    ])?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Install a caller-built service, such as one backed by a `MemoryLogger`
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// EXPRESSION CONTEXT
// ============================================================================

pub fn set_expression_context(source: &str, line: usize) {
    EXPRESSION_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(ExpressionContext {
            source: source.to_string(),
            line,
        });
    });
}

pub fn clear_expression_context() {
    EXPRESSION_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with events tagged by source and line
pub fn with_expression_context<F, R>(source: &str, line: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_expression_context(source, line);
    let result = f();
    clear_expression_context();
    result
}

pub fn get_expression_context() -> Option<ExpressionContext> {
    EXPRESSION_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Add source and line to an event if a context is set (used by macros)
pub fn attach_expression_context(event: LogEvent) -> LogEvent {
    match get_expression_context() {
        Some(ctx) => event
            .with_context("source", &ctx.source)
            .with_context("line", &ctx.line.to_string()),
        None => event,
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Attach context pairs and hand the event to the global logger, if any
pub fn log_with_level(mut event: LogEvent, context: &[(&str, String)]) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    logger.log_event(attach_expression_context(event));
}

/// Used by the `log_error!` macro
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: &[(&str, String)],
) {
    let event = LogEvent::error(code, message);
    log_with_level(
        match span {
            Some(s) => event.with_span(s),
            None => event,
        },
        context,
    );
}

/// Used by the `log_success!` macro
pub fn log_success_with_context(code: Code, message: &str, context: &[(&str, String)]) {
    log_with_level(LogEvent::success(code, message), context);
}

pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    diagnostics.push_str(&format!(
        "Limits: {}\n",
        crate::config::build_info::source_info()
    ));

    if let Some(ctx) = get_expression_context() {
        diagnostics.push_str(&format!("Current expression: {}:{}\n", ctx.source, ctx.line));
    }

    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_logging_initialization() {
        if is_initialized() {
            return;
        }

        let result = init_global_logging();
        assert!(result.is_ok() || is_initialized());
        assert!(is_initialized());
    }

    #[test]
    fn test_expression_context_management() {
        assert!(get_expression_context().is_none());

        set_expression_context("exprs.txt", 3);
        assert_eq!(
            get_expression_context(),
            Some(ExpressionContext {
                source: "exprs.txt".to_string(),
                line: 3
            })
        );

        clear_expression_context();
        assert!(get_expression_context().is_none());
    }

    #[test]
    fn test_with_expression_context() {
        let result = with_expression_context("exprs.txt", 7, || {
            let event = attach_expression_context(LogEvent::info("inside"));
            assert_eq!(event.context.get("line"), Some(&"7".to_string()));
            42
        });

        assert_eq!(result, 42);
        assert!(get_expression_context().is_none());
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Initialized:"));
        assert!(diagnostics.contains(crate::config::build_info::profile()));
        assert!(diagnostics.contains("Min log level"));
    }
}
