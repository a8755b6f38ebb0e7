//! Error and success codes with their classification metadata
//!
//! Single source of truth for every code the compiler logs. Each stage owns
//! a numeric band: input `E00x`, lexical `E02x`, transducer `E04x`.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Expression input error codes (CLI and batch files)
pub mod input {
    use super::Code;

    pub const INPUT_NOT_FOUND: Code = Code::new("E005");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_INPUT: Code = Code::new("E012");
    pub const TOO_MANY_EXPRESSIONS: Code = Code::new("E013");
}

/// Tokenizer error codes
pub mod lexical {
    use super::Code;

    pub const SYNTAX_ERROR: Code = Code::new("E020");
    pub const MALFORMED_EXPRESSION: Code = Code::new("E021");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("E024");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Shunting-yard transducer error codes
pub mod transducer {
    use super::Code;

    pub const MISPLACED_COMMA: Code = Code::new("E040");
    pub const UNBALANCED_PARENTHESIS: Code = Code::new("E041");
    pub const UNMATCHED_PARENTHESIS: Code = Code::new("E042");
    pub const UNKNOWN_TOKEN: Code = Code::new("E043");
    pub const MISSING_FUNCTION_PARENTHESIS: Code = Code::new("E044");
    pub const NESTING_TOO_DEEP: Code = Code::new("E045");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const BATCH_PROCESSING_COMPLETE: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const POSTFIX_CONVERSION_COMPLETE: Code = Code::new("I040");
    pub const PIPELINE_COMPLETE: Code = Code::new("I041");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal system error",
        "File a bug report with the failing expression",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "System initialization failure",
        "Check runtime configuration and logging setup",
    ),
    // Input
    ErrorMetadata::new(
        "E005",
        "Input",
        Severity::High,
        false,
        false,
        "Expression file not found",
        "Check the path passed with --file",
    ),
    ErrorMetadata::new(
        "E011",
        "Input",
        Severity::High,
        false,
        false,
        "I/O error while reading expressions",
        "Check file permissions and encoding",
    ),
    ErrorMetadata::new(
        "E012",
        "Input",
        Severity::Medium,
        true,
        false,
        "Invalid command-line or batch input",
        "Run with --help for usage",
    ),
    ErrorMetadata::new(
        "E013",
        "Input",
        Severity::High,
        false,
        true,
        "Too many expressions in one batch",
        "Split the expression file or raise max_expressions_per_batch",
    ),
    // Lexical
    ErrorMetadata::new(
        "E020",
        "Lexical",
        Severity::High,
        true,
        false,
        "No lexical rule matches the remaining input",
        "Remove or replace the characters shown in the error",
    ),
    ErrorMetadata::new(
        "E021",
        "Lexical",
        Severity::High,
        true,
        false,
        "Scanner produced an empty lexeme",
        "Report the expression; this indicates a scanner defect",
    ),
    ErrorMetadata::new(
        "E022",
        "Lexical",
        Severity::Medium,
        true,
        false,
        "Numeric literal could not be parsed",
        "Check the number format",
    ),
    ErrorMetadata::new(
        "E023",
        "Lexical",
        Severity::Medium,
        true,
        false,
        "Identifier or variable name exceeds maximum length",
        "Use a shorter name",
    ),
    ErrorMetadata::new(
        "E024",
        "Lexical",
        Severity::High,
        false,
        true,
        "Expression exceeds maximum length",
        "Split the expression or raise max_expression_length",
    ),
    ErrorMetadata::new(
        "E027",
        "Lexical",
        Severity::High,
        false,
        true,
        "Expression produces too many tokens",
        "Split the expression or raise max_token_count",
    ),
    // Transducer
    ErrorMetadata::new(
        "E040",
        "Transducer",
        Severity::High,
        true,
        false,
        "Comma outside of a function call",
        "Commas are only allowed between function arguments",
    ),
    ErrorMetadata::new(
        "E041",
        "Transducer",
        Severity::High,
        true,
        false,
        "Missing or misplaced opening parenthesis",
        "Check that every argument list is opened with '('",
    ),
    ErrorMetadata::new(
        "E042",
        "Transducer",
        Severity::High,
        true,
        false,
        "Unmatched parenthesis",
        "Balance opening and closing parentheses",
    ),
    ErrorMetadata::new(
        "E043",
        "Transducer",
        Severity::High,
        true,
        false,
        "Token kind not accepted by the transducer",
        "Token sources must not supply already-reclassified unary signs",
    ),
    ErrorMetadata::new(
        "E044",
        "Transducer",
        Severity::High,
        true,
        false,
        "Function name not followed by '('",
        "Follow the function name with an argument list",
    ),
    ErrorMetadata::new(
        "E045",
        "Transducer",
        Severity::High,
        false,
        true,
        "Operator stack exceeded maximum depth",
        "Reduce nesting or raise max_stack_depth",
    ),
    // Success
    ErrorMetadata::new(
        "I001",
        "System",
        Severity::Low,
        true,
        false,
        "Operation completed successfully",
        "Continue normal operation",
    ),
    ErrorMetadata::new(
        "I004",
        "System",
        Severity::Low,
        true,
        false,
        "System initialization completed successfully",
        "Continue normal operation",
    ),
    ErrorMetadata::new(
        "I006",
        "Batch",
        Severity::Low,
        true,
        false,
        "Expression batch processed",
        "Review per-expression results",
    ),
    ErrorMetadata::new(
        "I020",
        "Lexical",
        Severity::Low,
        true,
        false,
        "Tokenization completed successfully",
        "Continue to postfix conversion",
    ),
    ErrorMetadata::new(
        "I040",
        "Transducer",
        Severity::Low,
        true,
        false,
        "Postfix conversion completed successfully",
        "Postfix sequence ready for evaluation",
    ),
    ErrorMetadata::new(
        "I041",
        "Pipeline",
        Severity::Low,
        true,
        false,
        "Expression pipeline completed successfully",
        "Continue normal operation",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Check that every code in `codes` has registry metadata
pub fn ensure_registered(codes: &[Code]) -> Result<(), String> {
    for code in codes {
        if get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Code {} not found in metadata registry", code));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_no_duplicate_codes() {
        assert_eq!(get_error_registry().len(), REGISTRY_ENTRIES.len());
    }

    #[test]
    fn test_every_constant_is_registered() {
        let all = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            input::INPUT_NOT_FOUND,
            input::IO_ERROR,
            input::INVALID_INPUT,
            input::TOO_MANY_EXPRESSIONS,
            lexical::SYNTAX_ERROR,
            lexical::MALFORMED_EXPRESSION,
            lexical::INVALID_NUMBER,
            lexical::IDENTIFIER_TOO_LONG,
            lexical::EXPRESSION_TOO_LONG,
            lexical::TOO_MANY_TOKENS,
            transducer::MISPLACED_COMMA,
            transducer::UNBALANCED_PARENTHESIS,
            transducer::UNMATCHED_PARENTHESIS,
            transducer::UNKNOWN_TOKEN,
            transducer::MISSING_FUNCTION_PARENTHESIS,
            transducer::NESTING_TOO_DEEP,
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::BATCH_PROCESSING_COMPLETE,
            success::TOKENIZATION_COMPLETE,
            success::POSTFIX_CONVERSION_COMPLETE,
            success::PIPELINE_COMPLETE,
        ];
        assert!(ensure_registered(&all).is_ok());
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_category("E042"), "Transducer");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("E024"));
        assert!(is_recoverable("E020"));
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
    }
}
