//! Serializable result of converting one expression

use crate::tokens::Token;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub expression: String,
    pub postfix: Vec<Token>,
    /// Space-separated postfix listing
    pub rendered: String,
    pub token_count: usize,
    pub function_calls: usize,
    pub duration_ms: f64,
}

impl PipelineOutput {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Postfix tokens joined by single spaces
pub fn render_postfix<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a Token>,
{
    tokens
        .into_iter()
        .map(|token| token.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
