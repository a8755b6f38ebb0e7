//! Lexical analysis for infix expressions
//!
//! Turns expression text into an ordered token sequence. Plus and minus are
//! always emitted as binary operators here; the transducer decides which
//! of them are signs.

pub mod tokenizer;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;

pub use tokenizer::{classify_lexeme, match_lexeme, LexemeKind, LexerError, LexicalMetrics, Tokenizer};

/// Tokenize with default preferences
pub fn tokenize(input: &str) -> Result<Tokenizer, LexerError> {
    Tokenizer::new(input)
}

/// Tokenize with custom runtime preferences (limits remain compile-time)
pub fn tokenize_with_preferences(
    input: &str,
    preferences: LexicalPreferences,
) -> Result<Tokenizer, LexerError> {
    Tokenizer::with_preferences(input, preferences)
}

const LEXICAL_CODES: [crate::logging::Code; 6] = [
    codes::lexical::SYNTAX_ERROR,
    codes::lexical::MALFORMED_EXPRESSION,
    codes::lexical::INVALID_NUMBER,
    codes::lexical::IDENTIFIER_TOO_LONG,
    codes::lexical::EXPRESSION_TOO_LONG,
    codes::lexical::TOO_MANY_TOKENS,
];

/// Startup check that every lexical error code is registered
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    codes::ensure_registered(&LEXICAL_CODES)?;
    codes::ensure_registered(&[codes::success::TOKENIZATION_COMPLETE])?;

    crate::log_debug!("Lexical limits initialized",
        "max_expression_length" => MAX_EXPRESSION_LENGTH,
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT,
        "error_preview_length" => ERROR_PREVIEW_LENGTH
    );

    Ok(())
}

/// Validate lexical limits and a smoke tokenization
pub fn validate_tokenization() -> Result<(), String> {
    codes::ensure_registered(&LEXICAL_CODES)?;

    if MAX_EXPRESSION_LENGTH == 0 {
        return Err("MAX_EXPRESSION_LENGTH cannot be zero".to_string());
    }
    if MAX_IDENTIFIER_LENGTH == 0 {
        return Err("MAX_IDENTIFIER_LENGTH cannot be zero".to_string());
    }
    if MAX_TOKEN_COUNT == 0 {
        return Err("MAX_TOKEN_COUNT cannot be zero".to_string());
    }
    if ERROR_PREVIEW_LENGTH == 0 {
        return Err("ERROR_PREVIEW_LENGTH cannot be zero".to_string());
    }
    if MAX_TOKEN_COUNT >= MAX_EXPRESSION_LENGTH {
        return Err("MAX_TOKEN_COUNT must be below MAX_EXPRESSION_LENGTH".to_string());
    }

    let tokenizer = tokenize("f($x, 1.5) ^ -2").map_err(|e| e.to_string())?;
    if tokenizer.len() != 9 {
        return Err(format!(
            "Smoke tokenization produced {} tokens, expected 9",
            tokenizer.len()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    #[test]
    fn test_tokenize_helpers() {
        let tokenizer = tokenize("a + 1").unwrap();
        assert_eq!(tokenizer.len(), 3);

        let preferences = LexicalPreferences {
            collect_detailed_metrics: true,
            track_operator_patterns: true,
            include_position_in_errors: false,
        };
        let tokenizer = tokenize_with_preferences("a + 1", preferences).unwrap();
        assert!(tokenizer.preferences().track_operator_patterns);
        assert_eq!(
            tokenizer.tokens().last().map(|t| &t.value),
            Some(&Token::number(1.0))
        );
    }

    #[test]
    fn test_init_logging() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_validate_tokenization() {
        assert_eq!(validate_tokenization(), Ok(()));
    }

    #[test]
    fn test_token_limit_below_length_limit() {
        assert!(MAX_TOKEN_COUNT < MAX_EXPRESSION_LENGTH);
    }
}
