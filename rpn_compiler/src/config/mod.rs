//! Configuration module for the expression compiler
//! Compile-time limits come from the TOML profile selected at build time

// Generated by build.rs from config/<profile>.toml
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("RPN_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("RPN_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;
    use super::*;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(compile_time::lexical::MAX_EXPRESSION_LENGTH > 0);
        assert!(compile_time::lexical::MAX_IDENTIFIER_LENGTH > 0);
        assert!(compile_time::lexical::ERROR_PREVIEW_LENGTH > 0);
        assert!(compile_time::syntax::MAX_STACK_DEPTH > 0);
        assert!(compile_time::logging::LOG_BUFFER_SIZE > 0);
    }

    #[test]
    fn test_source_info_names_profile() {
        let info = build_info::source_info();
        assert!(info.contains(build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}
