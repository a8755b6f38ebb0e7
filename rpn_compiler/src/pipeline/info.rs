use crate::config::compile_time::{lexical, syntax};

/// Information about pipeline capabilities and active limits
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub pipeline_stages: usize,
    pub operators: &'static str,
    pub variable_sigil: char,
    pub max_expression_length: usize,
    pub max_token_count: usize,
    pub max_stack_depth: usize,
    pub build_profile: &'static str,
    pub global_logging_enabled: bool,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "RPN Compiler Pipeline:\n\
             - Pipeline Stages: {}\n\
             - Operators: {}\n\
             - Variable Sigil: {}\n\
             - Max Expression Length: {} bytes\n\
             - Max Token Count: {}\n\
             - Max Stack Depth: {}\n\
             - Build Profile: {}\n\
             - Global Logging: {}",
            self.pipeline_stages,
            self.operators,
            self.variable_sigil,
            self.max_expression_length,
            self.max_token_count,
            self.max_stack_depth,
            self.build_profile,
            self.global_logging_enabled
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage infix to postfix compiler ({} profile)",
            self.pipeline_stages, self.build_profile
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        pipeline_stages: 2,
        operators: "! + - * / % ^ ( ) ,",
        variable_sigil: '$',
        max_expression_length: lexical::MAX_EXPRESSION_LENGTH,
        max_token_count: lexical::MAX_TOKEN_COUNT,
        max_stack_depth: syntax::MAX_STACK_DEPTH,
        build_profile: crate::config::build_info::profile(),
        global_logging_enabled: crate::logging::is_initialized(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_limits() {
        let info = get_pipeline_info();
        let report = info.report();
        assert!(report.contains("Max Stack Depth"));
        assert!(info.summary().starts_with("2-stage"));
    }
}
