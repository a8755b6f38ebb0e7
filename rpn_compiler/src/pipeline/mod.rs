mod error;
mod info;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use output::{render_postfix, PipelineOutput};
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::lexical::Tokenizer;
use crate::syntax::Transducer;
use std::time::Instant;

/// Convert one expression (tokenize -> transduce) with default preferences
pub fn process_expression(expression: &str) -> Result<PipelineResult, PipelineError> {
    process_expression_with_config(expression, &RuntimeConfig::default())
}

/// Convert one expression with explicit runtime preferences
pub fn process_expression_with_config(
    expression: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    crate::log_info!("Converting expression", "length" => expression.len());

    let tokenizer = Tokenizer::with_preferences(expression, config.lexical.clone())?;
    let lexical_metrics = tokenizer.metrics().clone();

    let transducer = Transducer::with_preferences(tokenizer, config.transducer.clone())?;
    let transducer_metrics = transducer.metrics().clone();

    let result = PipelineResult::new(
        expression,
        transducer.into_tokens(),
        lexical_metrics,
        transducer_metrics,
        start_time.elapsed(),
    );

    result.log_success();

    Ok(result)
}

/// Convert independent expressions, each with its own tokenizer and
/// transducer. Results keep input order.
pub fn process_expressions<S: AsRef<str>>(
    expressions: &[S],
    config: &RuntimeConfig,
) -> Vec<Result<PipelineResult, PipelineError>> {
    expressions
        .iter()
        .map(|expression| process_expression_with_config(expression.as_ref(), config))
        .collect()
}
