//! Expression token set with static operator tables
//!
//! Tokens are plain values. Reclassification (identifier to function, binary
//! sign to unary sign, argument count resolution) builds a new token that
//! replaces the old one; nothing is mutated in place.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Token {
    // === OPERANDS ===
    /// Numeric literal (`12`, `3.5`, `.5`, `7.`)
    Number(f64),
    /// `$name` reference, stored without the sigil
    Variable(String),
    /// Bare name, a named constant unless followed by `(`
    Identifier(String),
    /// Function call; `arg_count` is resolved when the call closes
    Function { name: String, arg_count: usize },

    // === PUNCTUATION ===
    ParenOpen,  // (
    ParenClose, // )
    Comma,      // ,

    // === BINARY OPERATORS ===
    Plus,     // +
    Minus,    // -
    Multiply, // *
    Divide,   // /
    Modulo,   // %
    Power,    // ^

    // === UNARY OPERATORS ===
    /// `+` in operand position (only produced by the transducer)
    UnaryPlus,
    /// `-` in operand position (only produced by the transducer)
    UnaryMinus,
    /// `!`
    Not,
}

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Associativity {
    Left,
    Right,
}

/// Precedence and associativity of an operator token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub precedence: u8,
    pub associativity: Associativity,
}

impl OperatorInfo {
    const fn left(precedence: u8) -> Self {
        Self {
            precedence,
            associativity: Associativity::Left,
        }
    }

    const fn right(precedence: u8) -> Self {
        Self {
            precedence,
            associativity: Associativity::Right,
        }
    }

    /// Whether an operator with this info, arriving while `stacked` is on top
    /// of the operator stack, forces `stacked` out first.
    pub fn yields_to(&self, stacked: &OperatorInfo) -> bool {
        match self.associativity {
            Associativity::Left => self.precedence <= stacked.precedence,
            Associativity::Right => self.precedence < stacked.precedence,
        }
    }
}

/// Token classification for metrics and output grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Numbers, variables and named constants
    Operand,
    /// Function calls
    Function,
    /// Unary and binary operators
    Operator,
    /// Parentheses and commas
    Punctuation,
}

impl Token {
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    pub fn function(name: impl Into<String>, arg_count: usize) -> Self {
        Self::Function {
            name: name.into(),
            arg_count,
        }
    }

    /// Precedence and associativity, `None` for non-operators
    pub fn operator_info(&self) -> Option<OperatorInfo> {
        match self {
            Self::Plus | Self::Minus => Some(OperatorInfo::left(1)),
            Self::Multiply | Self::Divide | Self::Modulo => Some(OperatorInfo::left(2)),
            Self::Power => Some(OperatorInfo::right(3)),
            Self::UnaryPlus | Self::UnaryMinus | Self::Not => Some(OperatorInfo::right(4)),
            _ => None,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.operator_info().is_some()
    }

    pub fn is_unary_operator(&self) -> bool {
        matches!(self, Self::UnaryPlus | Self::UnaryMinus | Self::Not)
    }

    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            Self::Number(_) | Self::Variable(_) | Self::Identifier(_)
        )
    }

    pub fn is_paren(&self) -> bool {
        matches!(self, Self::ParenOpen | Self::ParenClose)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function { .. })
    }

    /// Identifier becomes a function call of the same name.
    /// Any other token is returned unchanged.
    pub fn into_function(self) -> Self {
        match self {
            Self::Identifier(name) => Self::Function { name, arg_count: 0 },
            other => other,
        }
    }

    /// Binary sign becomes the matching unary sign.
    /// Any other token is returned unchanged.
    pub fn into_unary(self) -> Self {
        match self {
            Self::Plus => Self::UnaryPlus,
            Self::Minus => Self::UnaryMinus,
            other => other,
        }
    }

    /// Function token carrying the resolved argument count.
    /// Any other token is returned unchanged.
    pub fn with_arg_count(self, arg_count: usize) -> Self {
        match self {
            Self::Function { name, .. } => Self::Function { name, arg_count },
            other => other,
        }
    }

    pub fn arg_count(&self) -> Option<usize> {
        match self {
            Self::Function { arg_count, .. } => Some(*arg_count),
            _ => None,
        }
    }

    /// Name carried by variables, identifiers and functions
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Variable(name) | Self::Identifier(name) | Self::Function { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn token_class(&self) -> TokenClass {
        match self {
            Self::Number(_) | Self::Variable(_) | Self::Identifier(_) => TokenClass::Operand,
            Self::Function { .. } => TokenClass::Function,
            Self::ParenOpen | Self::ParenClose | Self::Comma => TokenClass::Punctuation,
            Self::Plus
            | Self::Minus
            | Self::Multiply
            | Self::Divide
            | Self::Modulo
            | Self::Power
            | Self::UnaryPlus
            | Self::UnaryMinus
            | Self::Not => TokenClass::Operator,
        }
    }

    /// Stable kind name used in logs and serialized output
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "Number",
            Self::Variable(_) => "Variable",
            Self::Identifier(_) => "Identifier",
            Self::Function { .. } => "Function",
            Self::ParenOpen => "ParenOpen",
            Self::ParenClose => "ParenClose",
            Self::Comma => "Comma",
            Self::Plus => "Plus",
            Self::Minus => "Minus",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::Modulo => "Modulo",
            Self::Power => "Power",
            Self::UnaryPlus => "UnaryPlus",
            Self::UnaryMinus => "UnaryMinus",
            Self::Not => "Not",
        }
    }

    /// The token as it would appear in expression source
    pub fn as_source_string(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Variable(name) => format!("${}", name),
            Self::Identifier(name) | Self::Function { name, .. } => name.clone(),
            Self::ParenOpen => "(".to_string(),
            Self::ParenClose => ")".to_string(),
            Self::Comma => ",".to_string(),
            Self::Plus | Self::UnaryPlus => "+".to_string(),
            Self::Minus | Self::UnaryMinus => "-".to_string(),
            Self::Multiply => "*".to_string(),
            Self::Divide => "/".to_string(),
            Self::Modulo => "%".to_string(),
            Self::Power => "^".to_string(),
            Self::Not => "!".to_string(),
        }
    }
}

/// Postfix rendering: unary signs are written `u+`/`u-` and functions as
/// `name/arity` so a postfix listing stays unambiguous.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnaryPlus => write!(f, "u+"),
            Self::UnaryMinus => write!(f, "u-"),
            Self::Function { name, arg_count } => write!(f, "{}/{}", name, arg_count),
            other => write!(f, "{}", other.as_source_string()),
        }
    }
}

// === STATIC SYMBOL TABLE ===

/// Map a single-character symbol to its token
pub fn classify_symbol(symbol: char) -> Option<Token> {
    match symbol {
        '!' => Some(Token::Not),
        '+' => Some(Token::Plus),
        '-' => Some(Token::Minus),
        '*' => Some(Token::Multiply),
        '/' => Some(Token::Divide),
        '%' => Some(Token::Modulo),
        '^' => Some(Token::Power),
        '(' => Some(Token::ParenOpen),
        ')' => Some(Token::ParenClose),
        ',' => Some(Token::Comma),
        _ => None,
    }
}

pub fn is_operator_symbol(symbol: char) -> bool {
    classify_symbol(symbol).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_tiers() {
        let prec = |t: Token| t.operator_info().unwrap().precedence;
        assert_eq!(prec(Token::Plus), prec(Token::Minus));
        assert!(prec(Token::Multiply) > prec(Token::Plus));
        assert_eq!(prec(Token::Modulo), prec(Token::Divide));
        assert!(prec(Token::Power) > prec(Token::Multiply));
        assert!(prec(Token::UnaryMinus) > prec(Token::Power));
        assert_eq!(prec(Token::Not), prec(Token::UnaryPlus));
    }

    #[test]
    fn test_non_operators_have_no_info() {
        assert!(Token::number(1.0).operator_info().is_none());
        assert!(Token::ParenOpen.operator_info().is_none());
        assert!(Token::Comma.operator_info().is_none());
        assert!(Token::function("max", 2).operator_info().is_none());
    }

    #[test]
    fn test_yields_to_respects_associativity() {
        let minus = Token::Minus.operator_info().unwrap();
        let power = Token::Power.operator_info().unwrap();
        let times = Token::Multiply.operator_info().unwrap();

        // Left-assoc pops equal precedence, right-assoc does not
        assert!(minus.yields_to(&minus));
        assert!(!power.yields_to(&power));
        assert!(minus.yields_to(&times));
        assert!(!times.yields_to(&minus));
    }

    #[test]
    fn test_reclassification_builds_new_tokens() {
        assert_eq!(Token::identifier("max").into_function(), Token::function("max", 0));
        assert_eq!(Token::number(2.0).into_function(), Token::number(2.0));
        assert_eq!(Token::Minus.into_unary(), Token::UnaryMinus);
        assert_eq!(Token::Plus.into_unary(), Token::UnaryPlus);
        assert_eq!(Token::Multiply.into_unary(), Token::Multiply);
        assert_eq!(
            Token::function("max", 0).with_arg_count(3).arg_count(),
            Some(3)
        );
        assert_eq!(Token::Comma.with_arg_count(3), Token::Comma);
    }

    #[test]
    fn test_symbol_table() {
        for symbol in "!+-*/%^(),".chars() {
            assert!(is_operator_symbol(symbol), "missing symbol {}", symbol);
        }
        assert_eq!(classify_symbol('^'), Some(Token::Power));
        assert_eq!(classify_symbol('$'), None);
    }

    #[test]
    fn test_display_is_unambiguous_for_postfix() {
        assert_eq!(Token::UnaryMinus.to_string(), "u-");
        assert_eq!(Token::Minus.to_string(), "-");
        assert_eq!(Token::function("max", 3).to_string(), "max/3");
        assert_eq!(Token::variable("x").to_string(), "$x");
        assert_eq!(Token::number(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&Token::function("max", 2)).unwrap();
        assert_eq!(json, r#"{"kind":"Function","value":{"name":"max","arg_count":2}}"#);

        let json = serde_json::to_string(&Token::Plus).unwrap();
        assert_eq!(json, r#"{"kind":"Plus"}"#);
    }
}
