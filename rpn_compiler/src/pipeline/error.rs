use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::syntax::TransducerError;
use crate::utils::Span;

/// Pipeline processing errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("Tokenization failed: {0}")]
    Lexical(#[from] LexerError),

    #[error("Postfix conversion failed: {0}")]
    Transducer(#[from] TransducerError),

    #[error("Invalid input: {message}")]
    Input { message: String },
}

impl PipelineError {
    pub fn input_error(message: &str) -> Self {
        Self::Input {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Lexical(error) => error.error_code(),
            Self::Transducer(error) => error.error_code(),
            Self::Input { .. } => codes::input::INVALID_INPUT,
        }
    }

    /// Source location of the failure, when known
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexical(error) => error.position().map(|p| Span::new(p, p)),
            Self::Transducer(error) => Some(error.span()),
            Self::Input { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_error_code_passthrough() {
        let lexical = PipelineError::from(LexerError::Syntax {
            near: "@".to_string(),
            position: Position::start(),
        });
        assert_eq!(lexical.error_code(), codes::lexical::SYNTAX_ERROR);
        assert_eq!(lexical.span().map(|s| s.start()), Some(Position::start()));

        let transducer = PipelineError::from(TransducerError::MisplacedComma {
            span: Span::dummy(),
        });
        assert_eq!(transducer.error_code(), codes::transducer::MISPLACED_COMMA);

        let input = PipelineError::input_error("empty");
        assert_eq!(input.error_code(), codes::input::INVALID_INPUT);
        assert!(input.span().is_none());
        assert_eq!(input.to_string(), "Invalid input: empty");
    }
}
