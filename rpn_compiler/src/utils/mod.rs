//! Shared utilities used by the tokenizer and the transducer

pub mod span;

pub use span::{Position, Span, Spanned};
