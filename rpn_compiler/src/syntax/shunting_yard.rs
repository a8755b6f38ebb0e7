//! Shunting-yard transducer: infix token stream to postfix sequence
//!
//! The engine pulls tokens from a [`TokenSource`] one at a time and keeps
//! three pieces of state besides the output:
//!
//! - the parser state, which decides whether `+`/`-` are signs or binary
//!   operators;
//! - the operator stack holding operators, open parentheses and pending
//!   function calls;
//! - one argument counter per open function call, innermost last.
//!
//! Parentheses and commas never reach the output. A function token is
//! emitted when its closing parenthesis is seen, carrying the number of
//! arguments it was called with.

use super::error::{TransducerError, TransducerResult};
use crate::config::compile_time::syntax::MAX_STACK_DEPTH;
use crate::config::runtime::TransducerPreferences;
use crate::logging::codes;
use crate::tokens::{Cursor, SpannedToken, Token, TokenSource};
use crate::{log_debug, log_error, log_success};

/// What the engine expects to see next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Start of input, or after an operator, `(` or `,`
    ExpectOperand,
    /// After an operand or `)`
    ExpectOperator,
}

/// Counters gathered during one conversion
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct TransducerMetrics {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub reclassified_signs: usize,
    pub function_calls: usize,
    pub discarded_parens: usize,
    pub max_stack_depth: usize,
}

/// Completed postfix conversion with a repositionable cursor over the output
#[derive(Debug, Clone)]
pub struct Transducer {
    output: Cursor<SpannedToken>,
    metrics: TransducerMetrics,
}

impl Transducer {
    /// Drive `source` to exhaustion and build the postfix sequence
    pub fn new<S: TokenSource>(source: S) -> TransducerResult<Self> {
        Self::with_preferences(source, TransducerPreferences::default())
    }

    pub fn with_preferences<S: TokenSource>(
        mut source: S,
        preferences: TransducerPreferences,
    ) -> TransducerResult<Self> {
        let mut engine = ShuntingYard::new(preferences);

        match engine.run(&mut source) {
            Ok(()) => {
                let metrics = engine.metrics.clone();
                log_success!(codes::success::POSTFIX_CONVERSION_COMPLETE, "Postfix conversion completed",
                    "input_tokens" => metrics.input_tokens,
                    "output_tokens" => metrics.output_tokens,
                    "function_calls" => metrics.function_calls
                );

                Ok(Self {
                    output: Cursor::new(engine.output),
                    metrics,
                })
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    span = error.span(),
                    "stack_depth" => engine.stack.len(),
                    "emitted" => engine.output.len()
                );
                Err(error)
            }
        }
    }

    pub fn metrics(&self) -> &TransducerMetrics {
        &self.metrics
    }

    // === OUTPUT CURSOR ===

    pub fn first(&mut self) -> Option<&SpannedToken> {
        self.output.first()
    }

    pub fn reset(&mut self) -> Option<&SpannedToken> {
        self.output.reset()
    }

    pub fn current(&self) -> Option<&SpannedToken> {
        self.output.current()
    }

    pub fn next(&mut self) -> Option<&SpannedToken> {
        self.output.next()
    }

    pub fn previous(&mut self) -> Option<&SpannedToken> {
        self.output.previous()
    }

    pub fn peek(&self) -> Option<&SpannedToken> {
        self.output.peek()
    }

    pub fn key(&self) -> Option<usize> {
        self.output.key()
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn tokens(&self) -> &[SpannedToken] {
        self.output.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpannedToken> {
        self.output.iter()
    }

    pub fn into_tokens(self) -> Vec<SpannedToken> {
        self.output.into_inner()
    }
}

struct ShuntingYard {
    state: ParserState,
    output: Vec<SpannedToken>,
    stack: Vec<SpannedToken>,
    funcs: Vec<usize>,
    preferences: TransducerPreferences,
    metrics: TransducerMetrics,
}

impl ShuntingYard {
    fn new(preferences: TransducerPreferences) -> Self {
        Self {
            state: ParserState::ExpectOperand,
            output: Vec::new(),
            stack: Vec::new(),
            funcs: Vec::new(),
            preferences,
            metrics: TransducerMetrics::default(),
        }
    }

    fn run<S: TokenSource>(&mut self, source: &mut S) -> TransducerResult<()> {
        let mut next = source.first().cloned();

        while let Some(token) = next {
            self.metrics.input_tokens += 1;
            self.dispatch(token, source)?;
            next = source.next().cloned();
        }

        self.finish()
    }

    fn dispatch<S: TokenSource>(
        &mut self,
        token: SpannedToken,
        source: &mut S,
    ) -> TransducerResult<()> {
        match token.value {
            Token::Number(_) | Token::Variable(_) | Token::Identifier(_) => {
                self.emit(token);
                self.state = ParserState::ExpectOperator;
            }
            Token::Function { .. } => self.open_call(token, source)?,
            Token::Comma => self.comma(&token)?,
            Token::Plus | Token::Minus => {
                let token = if self.state == ParserState::ExpectOperand {
                    self.metrics.reclassified_signs += 1;
                    if self.preferences.log_reclassifications {
                        log_debug!("Sign reclassified as unary",
                            "token" => token.value.kind_name(),
                            "at" => token.span
                        );
                    }
                    token.map(Token::into_unary)
                } else {
                    token
                };
                self.operator(token)?;
            }
            Token::Multiply | Token::Divide | Token::Modulo | Token::Power | Token::Not => {
                self.operator(token)?;
            }
            Token::ParenOpen => {
                self.push(token)?;
                self.state = ParserState::ExpectOperand;
            }
            Token::ParenClose => self.close_paren(token)?,
            Token::UnaryPlus | Token::UnaryMinus => {
                return Err(TransducerError::unknown_token(token.value, token.span));
            }
        }

        Ok(())
    }

    /// Function token: push it, consume its `(` and seed the argument count
    fn open_call<S: TokenSource>(
        &mut self,
        function: SpannedToken,
        source: &mut S,
    ) -> TransducerResult<()> {
        let name = function.value.name().unwrap_or_default().to_string();
        let call_span = function.span;

        self.push(function)?;
        self.funcs.push(0);
        self.metrics.function_calls += 1;

        match source.next().cloned() {
            Some(paren) if paren.value == Token::ParenOpen => {
                self.metrics.input_tokens += 1;
                self.push(paren)?;
                self.state = ParserState::ExpectOperand;
            }
            _ => return Err(TransducerError::missing_function_paren(&name, call_span)),
        }

        let has_arguments = !matches!(
            source.peek().map(|t| &t.value),
            None | Some(Token::ParenClose)
        );
        if let Some(count) = self.funcs.last_mut() {
            *count = usize::from(has_arguments);
        }

        Ok(())
    }

    fn comma(&mut self, comma: &SpannedToken) -> TransducerResult<()> {
        match self.funcs.last_mut() {
            Some(count) => *count += 1,
            None => return Err(TransducerError::MisplacedComma { span: comma.span }),
        }

        self.pop_until_open_paren(comma)?;
        self.state = ParserState::ExpectOperand;
        Ok(())
    }

    /// Move operators to the output until `(` is on top; the `(` stays
    fn pop_until_open_paren(&mut self, comma: &SpannedToken) -> TransducerResult<()> {
        loop {
            match self.stack.last() {
                Some(top) if top.value == Token::ParenOpen => return Ok(()),
                Some(_) => self.pop_to_output(),
                None => return Err(TransducerError::UnbalancedParen { span: comma.span }),
            }
        }
    }

    fn operator(&mut self, token: SpannedToken) -> TransducerResult<()> {
        if let Some(incoming) = token.value.operator_info() {
            while let Some(stacked) = self.stack.last().and_then(|top| top.value.operator_info()) {
                if !incoming.yields_to(&stacked) {
                    break;
                }
                self.pop_to_output();
            }
        }

        self.push(token)?;
        self.state = ParserState::ExpectOperand;
        Ok(())
    }

    fn close_paren(&mut self, close: SpannedToken) -> TransducerResult<()> {
        loop {
            match self.stack.pop() {
                Some(top) if top.value == Token::ParenOpen => break,
                Some(top) => self.emit(top),
                None => return Err(TransducerError::unmatched_paren(close.value, close.span)),
            }
        }
        self.metrics.discarded_parens += 2;

        if matches!(self.stack.last(), Some(top) if top.value.is_function()) {
            if let Some(function) = self.stack.pop() {
                let arg_count = self.funcs.pop().unwrap_or_default();
                self.emit(function.map(|f| f.with_arg_count(arg_count)));
            }
        }

        self.state = ParserState::ExpectOperator;
        Ok(())
    }

    /// Drain the stack once input is exhausted
    fn finish(&mut self) -> TransducerResult<()> {
        while let Some(top) = self.stack.pop() {
            if top.value.is_paren() {
                return Err(TransducerError::unmatched_paren(top.value, top.span));
            }
            self.emit(top);
        }
        Ok(())
    }

    fn push(&mut self, token: SpannedToken) -> TransducerResult<()> {
        if self.stack.len() >= MAX_STACK_DEPTH {
            return Err(TransducerError::NestingTooDeep {
                depth: self.stack.len() + 1,
                span: token.span,
            });
        }

        self.stack.push(token);
        self.metrics.max_stack_depth = self.metrics.max_stack_depth.max(self.stack.len());
        Ok(())
    }

    fn pop_to_output(&mut self) {
        if let Some(top) = self.stack.pop() {
            if self.preferences.log_stack_operations {
                log_debug!("Operator popped to output",
                    "token" => top.value,
                    "remaining" => self.stack.len()
                );
            }
            self.emit(top);
        }
    }

    fn emit(&mut self, token: SpannedToken) {
        self.metrics.output_tokens += 1;
        self.output.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Tokenizer;
    use crate::tokens::source_from_tokens;
    use crate::utils::{Span, Spanned};
    use assert_matches::assert_matches;

    fn convert(input: &str) -> TransducerResult<Transducer> {
        Transducer::new(Tokenizer::new(input).unwrap())
    }

    fn postfix(input: &str) -> Vec<Token> {
        convert(input)
            .unwrap()
            .into_tokens()
            .into_iter()
            .map(Spanned::into_inner)
            .collect()
    }

    fn rendered(input: &str) -> String {
        postfix(input)
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Stack evaluator for checking operator semantics
    fn evaluate(tokens: &[Token]) -> f64 {
        let mut stack: Vec<f64> = Vec::new();

        for token in tokens {
            match token {
                Token::Number(value) => stack.push(*value),
                Token::UnaryMinus => {
                    let a = stack.pop().unwrap();
                    stack.push(-a);
                }
                Token::UnaryPlus => {}
                Token::Not => {
                    let a = stack.pop().unwrap();
                    stack.push(if a == 0.0 { 1.0 } else { 0.0 });
                }
                Token::Function { name, arg_count } => {
                    let at = stack.len() - arg_count;
                    let args: Vec<f64> = stack.split_off(at);
                    let value = match name.as_str() {
                        "max" => args.into_iter().fold(f64::MIN, f64::max),
                        "min" => args.into_iter().fold(f64::MAX, f64::min),
                        "sum" => args.into_iter().sum(),
                        "zero" => 0.0,
                        other => panic!("unknown function {}", other),
                    };
                    stack.push(value);
                }
                binary => {
                    let b = stack.pop().unwrap();
                    let a = stack.pop().unwrap();
                    stack.push(match binary {
                        Token::Plus => a + b,
                        Token::Minus => a - b,
                        Token::Multiply => a * b,
                        Token::Divide => a / b,
                        Token::Modulo => a % b,
                        Token::Power => a.powf(b),
                        other => panic!("unexpected token {:?}", other),
                    });
                }
            }
        }

        assert_eq!(stack.len(), 1, "leftover operands: {:?}", stack);
        stack[0]
    }

    fn eval(input: &str) -> f64 {
        evaluate(&postfix(input))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(rendered("2+3*4"), "2 3 4 * +");
        assert_eq!(eval("2+3*4"), 14.0);
        assert_eq!(eval("(2+3)*4"), 20.0);
        assert_eq!(eval("10 - 4 % 3 * 2"), 8.0);
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(rendered("2^3^2"), "2 3 2 ^ ^");
        assert_eq!(eval("2^3^2"), 512.0);
    }

    #[test]
    fn test_minus_is_left_associative() {
        assert_eq!(rendered("8-3-2"), "8 3 - 2 -");
        assert_eq!(eval("8-3-2"), 3.0);
        assert_eq!(eval("16/4/2"), 2.0);
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(rendered("-3+4"), "3 u- 4 +");
        assert_eq!(eval("-3+4"), 1.0);
        assert_eq!(rendered("3--4"), "3 4 u- -");
        assert_eq!(eval("3--4"), 7.0);
        assert_eq!(eval("+2*-(1+1)"), -4.0);
        assert_eq!(eval("--5"), 5.0);
    }

    #[test]
    fn test_sign_after_paren_and_comma_is_unary() {
        assert_eq!(rendered("(-1)"), "1 u-");
        assert_eq!(rendered("max(1,-2)"), "1 2 u- max/2");
        assert_eq!(eval("max(-1, -2)"), -1.0);
    }

    #[test]
    fn test_logical_not() {
        assert_eq!(rendered("!0 + 1"), "0 ! 1 +");
        assert_eq!(eval("!0 + 1"), 2.0);
    }

    #[test]
    fn test_function_arity() {
        let tokens = postfix("max(1,2,3)");
        assert_eq!(tokens.last(), Some(&Token::function("max", 3)));
        assert_eq!(evaluate(&tokens), 3.0);

        assert_eq!(postfix("zero()"), vec![Token::function("zero", 0)]);
        assert_eq!(postfix("f(x)"), vec![Token::identifier("x"), Token::function("f", 1)]);
    }

    #[test]
    fn test_nested_function_calls() {
        assert_eq!(
            rendered("max(1, min(4, 2), sum(1, 2, 3) * 2)"),
            "1 4 2 min/2 1 2 3 sum/3 2 * max/3"
        );
        assert_eq!(eval("max(1, min(4, 2), sum(1, 2, 3) * 2)"), 12.0);
        assert_eq!(eval("sum(max(1, 2), (3 + 4), zero())"), 9.0);
    }

    #[test]
    fn test_variables_and_identifiers_are_operands() {
        assert_eq!(
            postfix("$rate * pi"),
            vec![Token::variable("rate"), Token::identifier("pi"), Token::Multiply]
        );
    }

    #[test]
    fn test_no_punctuation_in_output() {
        for input in ["(1+2)*3", "f(g(1,2),(3))", "((($a)))", "max(1,2,3) ^ (2)"] {
            let transducer = convert(input).unwrap();
            assert!(
                transducer
                    .iter()
                    .all(|t| !matches!(t.value, Token::ParenOpen | Token::ParenClose | Token::Comma)),
                "punctuation in output of {}",
                input
            );
        }
    }

    #[test]
    fn test_empty_input() {
        let transducer = convert("").unwrap();
        assert!(transducer.is_empty());
        assert_eq!(transducer.key(), None);
    }

    #[test]
    fn test_unclosed_paren() {
        assert_matches!(
            convert("(1+2"),
            Err(TransducerError::UnmatchedParen { paren: Token::ParenOpen, .. })
        );
        assert_matches!(
            convert("f(1"),
            Err(TransducerError::UnmatchedParen { paren: Token::ParenOpen, .. })
        );
    }

    #[test]
    fn test_stray_close_paren() {
        let error = convert("1+2)").unwrap_err();
        assert_matches!(error, TransducerError::UnmatchedParen { paren: Token::ParenClose, span } => {
            assert_eq!(span.start().offset, 3);
        });
        assert_eq!(error.error_code(), codes::transducer::UNMATCHED_PARENTHESIS);
    }

    #[test]
    fn test_misplaced_comma() {
        assert_matches!(convert(","), Err(TransducerError::MisplacedComma { .. }));
        assert_matches!(convert("(1, 2)"), Err(TransducerError::MisplacedComma { .. }));
        assert_matches!(convert("f(1), 2"), Err(TransducerError::MisplacedComma { .. }));
    }

    #[test]
    fn test_function_without_paren_from_custom_source() {
        let source = source_from_tokens(vec![Token::function("f", 0), Token::number(1.0)]);
        assert_matches!(
            Transducer::new(source),
            Err(TransducerError::MissingFunctionParen { ref name, .. }) if name == "f"
        );

        let source = source_from_tokens(vec![Token::function("g", 0)]);
        assert_matches!(
            Transducer::new(source),
            Err(TransducerError::MissingFunctionParen { .. })
        );
    }

    #[test]
    fn test_unary_token_from_custom_source_is_unknown() {
        let source = source_from_tokens(vec![Token::UnaryMinus, Token::number(1.0)]);
        let error = Transducer::new(source).unwrap_err();
        assert_matches!(error, TransducerError::UnknownToken { token: Token::UnaryMinus, .. });
        assert_eq!(error.error_code(), codes::transducer::UNKNOWN_TOKEN);
    }

    #[test]
    fn test_comma_without_open_paren_is_unbalanced() {
        let mut engine = ShuntingYard::new(TransducerPreferences::default());
        engine.funcs.push(1);
        engine.push(Spanned::new(Token::Plus, Span::dummy())).unwrap();

        let comma = Spanned::new(Token::Comma, Span::dummy());
        assert_matches!(engine.comma(&comma), Err(TransducerError::UnbalancedParen { .. }));
        assert_eq!(engine.output, vec![Spanned::new(Token::Plus, Span::dummy())]);
    }

    #[test]
    fn test_nesting_limit() {
        let input = "(".repeat(MAX_STACK_DEPTH + 1);
        assert_matches!(
            convert(&input),
            Err(TransducerError::NestingTooDeep { depth, .. }) if depth == MAX_STACK_DEPTH + 1
        );
    }

    #[test]
    fn test_output_navigation_is_repeatable() {
        let mut transducer = convert("1 + 2 * 3").unwrap();
        assert_eq!(transducer.key(), Some(0));

        let walk = |t: &mut Transducer| {
            let mut seen = Vec::new();
            let mut current = t.first().cloned();
            while let Some(token) = current {
                seen.push(token.value);
                current = t.next().cloned();
            }
            seen
        };

        let first_pass = walk(&mut transducer);
        let second_pass = walk(&mut transducer);
        assert_eq!(first_pass, second_pass);
        assert_eq!(first_pass.len(), 5);

        transducer.first();
        transducer.next();
        assert_eq!(transducer.key(), Some(1));
        assert_eq!(transducer.peek().map(|t| &t.value), Some(&Token::number(3.0)));
        assert_eq!(transducer.previous().map(|t| &t.value), Some(&Token::number(1.0)));
        assert!(transducer.previous().is_none());
        assert_eq!(transducer.reset().map(|t| &t.value), Some(&Token::number(1.0)));
    }

    #[test]
    fn test_output_keeps_source_spans() {
        let input = "$a + foo(2)";
        let transducer = convert(input).unwrap();
        let slices: Vec<&str> = transducer
            .iter()
            .map(|t| t.span.slice(input).unwrap())
            .collect();

        assert_eq!(slices, vec!["$a", "2", "foo", "+"]);
    }

    #[test]
    fn test_metrics() {
        let transducer = convert("-f(1, 2) * (3)").unwrap();
        let metrics = transducer.metrics();

        assert_eq!(metrics.input_tokens, 11);
        assert_eq!(metrics.output_tokens, 6);
        assert_eq!(metrics.reclassified_signs, 1);
        assert_eq!(metrics.function_calls, 1);
        assert_eq!(metrics.discarded_parens, 4);
    }
}
