//! Token system for infix expressions
//!
//! ## Key Components
//!
//! - **[`Token`]** - closed set of operand, operator and punctuation tokens,
//!   with static precedence/associativity tables
//! - **[`Cursor`]** - repositionable sequence used for both the scanned
//!   token list and the postfix output
//! - **[`TokenSource`]** - what the transducer pulls tokens from
//!
//! ## Operator Table
//!
//! | Tokens                         | Precedence | Associativity |
//! |--------------------------------|------------|---------------|
//! | `+` `-`                        | 1          | left          |
//! | `*` `/` `%`                    | 2          | left          |
//! | `^`                            | 3          | right         |
//! | unary `+`, unary `-`, `!`      | 4          | right         |
//!
//! All tokens carry the span of source text they were scanned from.

pub mod cursor;
pub mod token;

pub use cursor::Cursor;
pub use token::{classify_symbol, is_operator_symbol, Associativity, OperatorInfo, Token, TokenClass};

pub use crate::utils::{Position, Span, Spanned};

/// A token with span information
pub type SpannedToken = Spanned<Token>;

/// Forward-only view of a token sequence with one token of lookahead.
///
/// `next` returns `None` once the sequence is exhausted; `peek` never moves
/// the cursor.
pub trait TokenSource {
    /// Rewind to the first token and return it
    fn first(&mut self) -> Option<&SpannedToken>;

    /// Advance and return the new current token
    fn next(&mut self) -> Option<&SpannedToken>;

    /// Token after the current one, without moving
    fn peek(&self) -> Option<&SpannedToken>;
}

impl TokenSource for Cursor<SpannedToken> {
    fn first(&mut self) -> Option<&SpannedToken> {
        Cursor::first(self)
    }

    fn next(&mut self) -> Option<&SpannedToken> {
        Cursor::next(self)
    }

    fn peek(&self) -> Option<&SpannedToken> {
        Cursor::peek(self)
    }
}

/// Wrap bare tokens for use as a token source (spans are left empty)
pub fn source_from_tokens<I>(tokens: I) -> Cursor<SpannedToken>
where
    I: IntoIterator<Item = Token>,
{
    tokens
        .into_iter()
        .map(|token| Spanned::new(token, Span::dummy()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_as_token_source() {
        let mut source = source_from_tokens(vec![Token::number(1.0), Token::Plus]);

        assert_eq!(
            TokenSource::first(&mut source).map(|t| &t.value),
            Some(&Token::number(1.0))
        );
        assert_eq!(TokenSource::peek(&source).map(|t| &t.value), Some(&Token::Plus));
        assert_eq!(TokenSource::next(&mut source).map(|t| &t.value), Some(&Token::Plus));
        assert!(TokenSource::next(&mut source).is_none());
    }
}
