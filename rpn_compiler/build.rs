// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    batch_processing: BatchProcessingLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_expression_length: usize,
    max_identifier_length: usize,
    max_token_count: usize,
    error_preview_length: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_stack_depth: usize,
}

#[derive(serde::Deserialize)]
struct BatchProcessingLimits {
    max_expressions_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RPN_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=RPN_CONFIG_DIR");

    let profile = env::var("RPN_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("RPN_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Profiles live at the workspace root, one level above this crate
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_EXPRESSION_LENGTH: usize = 16 * 1024 * 1024;
    const ABSOLUTE_MAX_STACK_DEPTH: usize = 1_000_000;

    if config.lexical.max_expression_length == 0
        || config.lexical.max_expression_length > ABSOLUTE_MAX_EXPRESSION_LENGTH
    {
        panic!("LIMITS: max_expression_length must be within 1..={ABSOLUTE_MAX_EXPRESSION_LENGTH}");
    }

    if config.lexical.max_identifier_length == 0 || config.lexical.max_token_count == 0 {
        panic!("LIMITS: identifier and token limits cannot be zero");
    }

    // Every token spans at least one byte
    if config.lexical.max_token_count >= config.lexical.max_expression_length {
        panic!("LIMITS: max_token_count must be below max_expression_length");
    }

    if config.lexical.error_preview_length == 0 {
        panic!("LIMITS: error_preview_length cannot be zero");
    }

    if config.syntax.max_stack_depth == 0
        || config.syntax.max_stack_depth > ABSOLUTE_MAX_STACK_DEPTH
    {
        panic!("LIMITS: max_stack_depth must be within 1..={ABSOLUTE_MAX_STACK_DEPTH}");
    }

    if profile == "production" && config.lexical.max_expression_length > 1024 * 1024 {
        panic!("PRODUCTION: max_expression_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_EXPRESSION_LENGTH: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const ERROR_PREVIEW_LENGTH: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_STACK_DEPTH: usize = {};
    }}

    pub mod batch_processing {{
        pub const MAX_EXPRESSIONS_PER_BATCH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.lexical.max_expression_length,
        config.lexical.max_identifier_length,
        config.lexical.max_token_count,
        config.lexical.error_preview_length,
        config.syntax.max_stack_depth,
        config.batch_processing.max_expressions_per_batch,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
