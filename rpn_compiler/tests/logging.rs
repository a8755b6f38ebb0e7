//! Global logging integration: failures and completions reach the installed logger.
//!
//! The global logger is process-wide, so these tests share one `MemoryLogger`
//! and only check that expected events are present.

use rpn_compiler::logging::{self, codes, LogLevel, LoggingService, MemoryLogger};
use rpn_compiler::{batch, pipeline};
use std::io::Write;
use std::sync::{Arc, OnceLock};

static MEMORY_LOGGER: OnceLock<Arc<MemoryLogger>> = OnceLock::new();

fn memory_logger() -> &'static MemoryLogger {
    MEMORY_LOGGER.get_or_init(|| {
        let logger = logging::service::create_test_logger();
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);
        logging::init_global_logging_with_service(Arc::new(service))
            .expect("global logger installed once per test process");
        logger
    })
}

#[test]
fn test_unclosed_paren_logs_error_code() {
    let logger = memory_logger();

    let error = pipeline::process_expression("(1+2").unwrap_err();
    assert_eq!(error.error_code(), codes::transducer::UNMATCHED_PARENTHESIS);
    assert!(logger.has_error_with_code(codes::transducer::UNMATCHED_PARENTHESIS));
}

#[test]
fn test_unknown_character_logs_error_code() {
    let logger = memory_logger();

    let error = pipeline::process_expression("1 + @").unwrap_err();
    assert_eq!(error.error_code(), codes::lexical::SYNTAX_ERROR);
    assert!(logger.has_error_with_code(codes::lexical::SYNTAX_ERROR));
}

#[test]
fn test_valid_expression_logs_stage_completion() {
    let logger = memory_logger();

    pipeline::process_expression("max(1, -2) ^ 2").unwrap();
    assert!(logger.has_success_with_code(codes::success::TOKENIZATION_COMPLETE));
    assert!(logger.has_success_with_code(codes::success::POSTFIX_CONVERSION_COMPLETE));
}

#[test]
fn test_batch_errors_carry_line_context() {
    let logger = memory_logger();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "1 + 2").unwrap();
    writeln!(file, "(3 * 4").unwrap();
    file.flush().unwrap();

    let config = batch::BatchConfig {
        max_threads: 1,
        ..batch::BatchConfig::default()
    };
    let results = batch::process_expression_file(file.path(), &config).unwrap();
    assert_eq!(results.failure_count(), 1);

    let source = file.path().display().to_string();
    let tagged = logger
        .get_errors()
        .into_iter()
        .filter(|event| event.context.get("source") == Some(&source))
        .collect::<Vec<_>>();

    assert!(!tagged.is_empty());
    assert!(tagged
        .iter()
        .all(|event| event.context.get("line").map(String::as_str) == Some("2")));
}
