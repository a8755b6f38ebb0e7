//! Errors raised while converting a token stream to postfix
//!
//! Every variant is terminal for the expression being converted.

use crate::config::compile_time::syntax::MAX_STACK_DEPTH;
use crate::logging::{codes, Code};
use crate::tokens::Token;
use crate::utils::Span;

pub type TransducerResult<T> = Result<T, TransducerError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransducerError {
    #[error("Misplaced comma outside of a function call at {span}")]
    MisplacedComma { span: Span },

    #[error("Unbalanced parenthesis: comma at {span} has no enclosing '('")]
    UnbalancedParen { span: Span },

    #[error("Unmatched parenthesis '{paren}' at {span}")]
    UnmatchedParen { paren: Token, span: Span },

    #[error("Unknown token '{token}' ({kind}) at {span}", kind = .token.kind_name())]
    UnknownToken { token: Token, span: Span },

    #[error("Function '{name}' at {span} is not followed by '('")]
    MissingFunctionParen { name: String, span: Span },

    #[error("Operator stack too deep: {depth} (max {MAX_STACK_DEPTH})")]
    NestingTooDeep { depth: usize, span: Span },
}

impl TransducerError {
    pub fn unmatched_paren(paren: Token, span: Span) -> Self {
        Self::UnmatchedParen { paren, span }
    }

    pub fn unknown_token(token: Token, span: Span) -> Self {
        Self::UnknownToken { token, span }
    }

    pub fn missing_function_paren(name: &str, span: Span) -> Self {
        Self::MissingFunctionParen {
            name: name.to_string(),
            span,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::MisplacedComma { .. } => codes::transducer::MISPLACED_COMMA,
            Self::UnbalancedParen { .. } => codes::transducer::UNBALANCED_PARENTHESIS,
            Self::UnmatchedParen { .. } => codes::transducer::UNMATCHED_PARENTHESIS,
            Self::UnknownToken { .. } => codes::transducer::UNKNOWN_TOKEN,
            Self::MissingFunctionParen { .. } => codes::transducer::MISSING_FUNCTION_PARENTHESIS,
            Self::NestingTooDeep { .. } => codes::transducer::NESTING_TOO_DEEP,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::MisplacedComma { span }
            | Self::UnbalancedParen { span }
            | Self::UnmatchedParen { span, .. }
            | Self::UnknownToken { span, .. }
            | Self::MissingFunctionParen { span, .. }
            | Self::NestingTooDeep { span, .. } => *span,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_error_codes() {
        let span = Span::dummy();
        assert_eq!(
            TransducerError::MisplacedComma { span }.error_code(),
            codes::transducer::MISPLACED_COMMA
        );
        assert_eq!(
            TransducerError::unmatched_paren(Token::ParenOpen, span).error_code(),
            codes::transducer::UNMATCHED_PARENTHESIS
        );
        assert_eq!(
            TransducerError::missing_function_paren("f", span).error_code(),
            codes::transducer::MISSING_FUNCTION_PARENTHESIS
        );
    }

    #[test]
    fn test_messages_name_the_offending_token() {
        let span = Span::covering(Position::start().advance_str("1+2"), ")");
        let error = TransducerError::unmatched_paren(Token::ParenClose, span);
        assert_eq!(error.to_string(), "Unmatched parenthesis ')' at 1:4-5");

        let error = TransducerError::unknown_token(Token::UnaryMinus, Span::dummy());
        assert!(error.to_string().contains("UnaryMinus"));
        assert_eq!(error.category(), "Transducer");
    }
}
