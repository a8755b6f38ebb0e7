use super::output::{render_postfix, PipelineOutput};
use crate::lexical::LexicalMetrics;
use crate::syntax::TransducerMetrics;
use crate::tokens::SpannedToken;
use std::time::Duration;

/// Everything produced by converting one expression
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub expression: String,
    pub postfix: Vec<SpannedToken>,
    pub lexical_metrics: LexicalMetrics,
    pub transducer_metrics: TransducerMetrics,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        expression: &str,
        postfix: Vec<SpannedToken>,
        lexical_metrics: LexicalMetrics,
        transducer_metrics: TransducerMetrics,
        processing_duration: Duration,
    ) -> Self {
        Self {
            expression: expression.to_string(),
            token_count: lexical_metrics.total_tokens,
            postfix,
            lexical_metrics,
            transducer_metrics,
            processing_duration,
        }
    }

    pub fn rendered(&self) -> String {
        render_postfix(self.postfix.iter().map(|t| &t.value))
    }

    pub fn to_output(&self) -> PipelineOutput {
        PipelineOutput {
            expression: self.expression.clone(),
            postfix: self.postfix.iter().map(|t| t.value.clone()).collect(),
            rendered: self.rendered(),
            token_count: self.token_count,
            function_calls: self.transducer_metrics.function_calls,
            duration_ms: self.processing_duration.as_secs_f64() * 1000.0,
        }
    }

    pub fn log_success(&self) {
        crate::log_performance!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Expression converted to postfix",
            duration = self.processing_duration,
            "tokens" => self.token_count,
            "output_tokens" => self.postfix.len(),
            "max_stack_depth" => self.transducer_metrics.max_stack_depth
        );
    }
}
