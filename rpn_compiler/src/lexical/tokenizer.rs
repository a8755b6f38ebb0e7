//! Expression tokenizer
//!
//! Scans an infix expression left to right. Each step strips leading
//! whitespace, then tries an ordered set of lexical rules against the start
//! of the remaining input; the first rule that matches wins.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{classify_symbol, Cursor, SpannedToken, Token, TokenClass, TokenSource};
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_error, log_success};
use std::collections::BTreeMap;

/// Tokenizer errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerError {
    #[error("Syntax error near '{near}' at {position}")]
    Syntax { near: String, position: Position },

    #[error("Malformed expression near '{near}' at {position}")]
    MalformedExpression { near: String, position: Position },

    #[error("Invalid number format: '{text}'")]
    InvalidNumber { text: String, position: Position },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, position: Position },

    #[error("Expression too long: {length} bytes (max {MAX_EXPRESSION_LENGTH})")]
    ExpressionTooLong { length: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Syntax { .. } => codes::lexical::SYNTAX_ERROR,
            LexerError::MalformedExpression { .. } => codes::lexical::MALFORMED_EXPRESSION,
            LexerError::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::ExpressionTooLong { .. } => codes::lexical::EXPRESSION_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// Where in the input the error was detected, if it is tied to a location
    pub fn position(&self) -> Option<Position> {
        match self {
            LexerError::Syntax { position, .. }
            | LexerError::MalformedExpression { position, .. }
            | LexerError::InvalidNumber { position, .. }
            | LexerError::IdentifierTooLong { position, .. } => Some(*position),
            LexerError::ExpressionTooLong { .. } | LexerError::TooManyTokens { .. } => None,
        }
    }
}

/// Which lexical rule produced a lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    Symbol,
    Number,
    Variable,
    Name,
    Whitespace,
}

/// Token counts gathered while tokenizing
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub number_tokens: usize,
    pub variable_tokens: usize,
    pub identifier_tokens: usize,
    pub function_tokens: usize,
    pub operator_tokens: usize,
    pub punctuation_tokens: usize,

    // Only filled when operator tracking is enabled
    pub operator_usage_patterns: BTreeMap<String, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        if !preferences.collect_detailed_metrics {
            return;
        }

        match token.token_class() {
            TokenClass::Operand => match token {
                Token::Number(_) => self.number_tokens += 1,
                Token::Variable(_) => self.variable_tokens += 1,
                _ => self.identifier_tokens += 1,
            },
            TokenClass::Function => self.function_tokens += 1,
            TokenClass::Punctuation => self.punctuation_tokens += 1,
            TokenClass::Operator => {
                self.operator_tokens += 1;

                if preferences.track_operator_patterns {
                    *self
                        .operator_usage_patterns
                        .entry(token.kind_name().to_string())
                        .or_insert(0) += 1;
                }
            }
        }
    }
}

/// Tokenized expression with a repositionable cursor
#[derive(Debug, Clone)]
pub struct Tokenizer {
    tokens: Cursor<SpannedToken>,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl Tokenizer {
    /// Tokenize `input` with default preferences
    pub fn new(input: &str) -> Result<Self, LexerError> {
        Self::with_preferences(input, LexicalPreferences::default())
    }

    pub fn with_preferences(
        input: &str,
        preferences: LexicalPreferences,
    ) -> Result<Self, LexerError> {
        log_debug!("Starting tokenization",
            "length" => input.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        let tokens = match scan(input) {
            Ok(tokens) => tokens,
            Err(error) => {
                log_lexer_error(&error, &preferences);
                return Err(error);
            }
        };

        let mut metrics = LexicalMetrics::default();
        for token in &tokens {
            metrics.record_token(&token.value, &preferences);
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => metrics.total_tokens,
            "functions" => metrics.function_tokens,
            "operators" => metrics.operator_tokens
        );

        Ok(Self {
            tokens: Cursor::new(tokens),
            metrics,
            preferences,
        })
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    // === CURSOR ===

    pub fn first(&mut self) -> Option<&SpannedToken> {
        self.tokens.first()
    }

    pub fn reset(&mut self) -> Option<&SpannedToken> {
        self.tokens.reset()
    }

    pub fn current(&self) -> Option<&SpannedToken> {
        self.tokens.current()
    }

    pub fn next(&mut self) -> Option<&SpannedToken> {
        self.tokens.next()
    }

    pub fn previous(&mut self) -> Option<&SpannedToken> {
        self.tokens.previous()
    }

    /// Token after the current one; the cursor does not move
    pub fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.peek()
    }

    pub fn key(&self) -> Option<usize> {
        self.tokens.key()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[SpannedToken] {
        self.tokens.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpannedToken> {
        self.tokens.iter()
    }

    pub fn into_tokens(self) -> Vec<SpannedToken> {
        self.tokens.into_inner()
    }
}

impl TokenSource for Tokenizer {
    fn first(&mut self) -> Option<&SpannedToken> {
        self.tokens.first()
    }

    fn next(&mut self) -> Option<&SpannedToken> {
        self.tokens.next()
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.peek()
    }
}

fn log_lexer_error(error: &LexerError, preferences: &LexicalPreferences) {
    match error.position() {
        Some(position) if preferences.include_position_in_errors => {
            log_error!(error.error_code(), &error.to_string(),
                span = Span::new(position, position),
                "line" => position.line,
                "column" => position.column
            );
        }
        _ => {
            log_error!(error.error_code(), &error.to_string());
        }
    }
}

// ============================================================================
// SCANNING
// ============================================================================

fn scan(input: &str) -> Result<Vec<SpannedToken>, LexerError> {
    if input.len() > MAX_EXPRESSION_LENGTH {
        return Err(LexerError::ExpressionTooLong {
            length: input.len(),
        });
    }

    let mut tokens: Vec<SpannedToken> = Vec::new();
    let mut rest = input;
    let mut position = Position::start();

    loop {
        let trimmed = rest.trim_start_matches(is_leading_whitespace);
        position = position.advance_str(&rest[..rest.len() - trimmed.len()]);
        rest = trimmed;

        if rest.is_empty() {
            break;
        }

        let (length, kind) = match_lexeme(rest).ok_or_else(|| LexerError::Syntax {
            near: preview(rest),
            position,
        })?;

        let lexeme = &rest[..length];
        let span = Span::covering(position, lexeme);

        if let Some(token) = classify_lexeme(lexeme, kind, position)? {
            if tokens.len() >= MAX_TOKEN_COUNT {
                return Err(LexerError::TooManyTokens {
                    count: tokens.len() + 1,
                });
            }

            // A name directly followed by `(` is a function call
            if token == Token::ParenOpen
                && matches!(tokens.last(), Some(prev) if matches!(prev.value, Token::Identifier(_)))
            {
                if let Some(prev) = tokens.pop() {
                    tokens.push(prev.map(Token::into_function));
                }
            }

            tokens.push(Spanned::new(token, span));
        }

        position = span.end();
        rest = &rest[length..];
    }

    Ok(tokens)
}

fn is_leading_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B')
}

/// First `ERROR_PREVIEW_LENGTH` characters of the unmatched input
fn preview(rest: &str) -> String {
    rest.chars().take(ERROR_PREVIEW_LENGTH).collect()
}

/// Length in bytes and rule of the lexeme at the start of `input`.
///
/// Rules are tried in order: symbol, number, `$`-variable, bare name,
/// blank run.
pub fn match_lexeme(input: &str) -> Option<(usize, LexemeKind)> {
    let bytes = input.as_bytes();
    let first = *bytes.first()?;

    if first.is_ascii() && classify_symbol(first as char).is_some() {
        return Some((1, LexemeKind::Symbol));
    }

    if let Some(length) = match_number(bytes) {
        return Some((length, LexemeKind::Number));
    }

    if first == b'$' {
        let length = run_length(&bytes[1..], |b| b.is_ascii_alphanumeric() || b == b'_' || b == b':');
        if length > 0 {
            return Some((length + 1, LexemeKind::Variable));
        }
    }

    if first.is_ascii_alphabetic() || first == b'_' {
        let length = run_length(bytes, |b| b.is_ascii_alphanumeric() || b == b'_');
        return Some((length, LexemeKind::Name));
    }

    let length = run_length(bytes, |b| b == b' ' || b == b'\t');
    if length > 0 {
        return Some((length, LexemeKind::Whitespace));
    }

    None
}

/// `\d*\.\d+`, then `\d+\.\d*`, then `\d+`
fn match_number(bytes: &[u8]) -> Option<usize> {
    let whole = run_length(bytes, |b| b.is_ascii_digit());

    if bytes.get(whole) == Some(&b'.') {
        let fraction = run_length(&bytes[whole + 1..], |b| b.is_ascii_digit());
        if whole > 0 || fraction > 0 {
            return Some(whole + 1 + fraction);
        }
    }

    (whole > 0).then_some(whole)
}

fn run_length(bytes: &[u8], accept: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&b| accept(b)).count()
}

/// Turn a matched lexeme into a token.
///
/// Blank lexemes produce no token. An empty lexeme from any other rule means
/// the grammar matched nothing and is reported as malformed input.
pub fn classify_lexeme(
    lexeme: &str,
    kind: LexemeKind,
    position: Position,
) -> Result<Option<Token>, LexerError> {
    if kind == LexemeKind::Whitespace {
        return Ok(None);
    }

    let malformed = || LexerError::MalformedExpression {
        near: preview(lexeme),
        position,
    };

    if lexeme.is_empty() {
        return Err(malformed());
    }

    let token = match kind {
        LexemeKind::Symbol => lexeme
            .chars()
            .next()
            .and_then(classify_symbol)
            .ok_or_else(malformed)?,
        LexemeKind::Number => {
            let value = lexeme
                .parse::<f64>()
                .map_err(|_| LexerError::InvalidNumber {
                    text: lexeme.to_string(),
                    position,
                })?;
            Token::number(value)
        }
        LexemeKind::Variable => {
            let name = lexeme.strip_prefix('$').unwrap_or(lexeme);
            check_name_length(name, position)?;
            Token::variable(name)
        }
        LexemeKind::Name => {
            check_name_length(lexeme, position)?;
            Token::identifier(lexeme)
        }
        LexemeKind::Whitespace => return Ok(None),
    };

    Ok(Some(token))
}

fn check_name_length(name: &str, position: Position) -> Result<(), LexerError> {
    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(LexerError::IdentifierTooLong {
            length: name.len(),
            position,
        });
    }
    Ok(())
}
