//! Infix to postfix conversion
//!
//! [`Transducer`] runs the shunting-yard algorithm over any [`TokenSource`],
//! normally a [`Tokenizer`](crate::lexical::Tokenizer).

mod error;
mod shunting_yard;

pub use error::{TransducerError, TransducerResult};
pub use shunting_yard::{ParserState, Transducer, TransducerMetrics};

use crate::config::compile_time::syntax::MAX_STACK_DEPTH;
use crate::logging::codes;
use crate::tokens::TokenSource;

/// Convert a token source with default preferences
pub fn transduce<S: TokenSource>(source: S) -> TransducerResult<Transducer> {
    Transducer::new(source)
}

/// Startup check that every transducer error code is registered
pub fn init_transducer_logging() -> Result<(), String> {
    codes::ensure_registered(&[
        codes::transducer::MISPLACED_COMMA,
        codes::transducer::UNBALANCED_PARENTHESIS,
        codes::transducer::UNMATCHED_PARENTHESIS,
        codes::transducer::UNKNOWN_TOKEN,
        codes::transducer::MISSING_FUNCTION_PARENTHESIS,
        codes::transducer::NESTING_TOO_DEEP,
        codes::success::POSTFIX_CONVERSION_COMPLETE,
    ])?;

    crate::log_debug!("Transducer limits initialized", "max_stack_depth" => MAX_STACK_DEPTH);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{source_from_tokens, Token};

    #[test]
    fn test_transduce_custom_source() {
        let source = source_from_tokens(vec![Token::number(1.0), Token::Plus, Token::number(2.0)]);
        let transducer = transduce(source).unwrap();

        let rendered: Vec<String> = transducer.iter().map(|t| t.value.to_string()).collect();
        assert_eq!(rendered, vec!["1", "2", "+"]);
    }

    #[test]
    fn test_init_logging() {
        assert!(init_transducer_logging().is_ok());
    }
}
