//! Source location tracking for expressions
//!
//! Every token remembers the slice of input it was scanned from so that
//! tokenizer and transducer errors can point back at the offending text.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance position over a whole string
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Span covering `text` when it begins at `start`
    pub fn covering(start: Position, text: &str) -> Self {
        Self::new(start, start.advance_str(text))
    }

    /// Byte length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Source text for this span, or `None` if it does not fit the input
    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start.offset..self.end.offset)
    }

    /// Span for tokens that were not scanned from text (caller-built sources)
    pub fn dummy() -> Self {
        Self {
            start: Position::start(),
            end: Position::start(),
        }
    }

    /// Render the line containing this span with carets under it.
    pub fn underline(&self, source: &str) -> Option<String> {
        let line = source.lines().nth(self.start.line.checked_sub(1)? as usize)?;
        let width = if self.start.line == self.end.line {
            (self.end.column.saturating_sub(self.start.column) as usize).max(1)
        } else {
            1
        };

        let padding = " ".repeat(self.start.column.saturating_sub(1) as usize);
        Some(format!("{}\n{}{}", line, padding, "^".repeat(width)))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A value with its source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Map the value while preserving the span
    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance_tracks_lines() {
        let pos = Position::start().advance_str("ab\nc");
        assert_eq!(pos.offset, 4);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn test_span_covering_and_slice() {
        let start = Position::start().advance_str("1 + ");
        let span = Span::covering(start, "$x");
        assert_eq!(span.len(), 2);
        assert_eq!(span.slice("1 + $x * 2"), Some("$x"));
        assert_eq!(span.to_string(), "1:5-7");
    }

    #[test]
    fn test_underline() {
        let start = Position::start().advance_str("1 + ");
        let span = Span::covering(start, "@@");
        assert_eq!(span.underline("1 + @@").unwrap(), "1 + @@\n    ^^");
    }

    #[test]
    fn test_spanned_map_keeps_span() {
        let span = Span::covering(Position::start(), "abc");
        let spanned = Spanned::new(3, span).map(|n| n * 2);
        assert_eq!(spanned.value, 6);
        assert_eq!(spanned.span, span);
    }
}
