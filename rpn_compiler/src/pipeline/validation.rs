/// Validate that every pipeline stage is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::lexical::init_lexical_analysis_logging()?;
    crate::lexical::validate_tokenization()?;
    crate::syntax::init_transducer_logging()?;
    crate::logging::config::validate_config()?;

    let result = super::process_expression("max(1, -2) ^ 2")
        .map_err(|e| format!("Pipeline smoke test failed: {}", e))?;
    if result.rendered() != "1 2 u- max/2 2 ^" {
        return Err(format!(
            "Pipeline smoke test produced unexpected postfix: {}",
            result.rendered()
        ));
    }

    crate::log_debug!("Pipeline validation completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pipeline() {
        assert_eq!(validate_pipeline(), Ok(()));
    }
}
