use rpn_compiler::config::runtime::RuntimeConfig;
use rpn_compiler::{batch, logging, pipeline};
use std::env;
use std::path::PathBuf;

/// Parsed command-line options
#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    expression: Option<String>,
    file: Option<PathBuf>,
    config_path: Option<PathBuf>,
    fail_fast: bool,
    sequential: bool,
    threads: Option<usize>,
    help: bool,
    diagnostics: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("rpn_compiler");

    let options = match parse_cli_options(&args[1.min(args.len())..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} <expression> | --file <path> [options]", program_name);
            eprintln!("       {} --help", program_name);
            std::process::exit(1);
        }
    };

    if options.help {
        print_help(program_name);
        return Ok(());
    }

    let mut runtime = match &options.config_path {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    if options.fail_fast {
        runtime.batch.fail_fast = true;
    }

    // Preferences must be installed before the global logger reads them
    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()?;

    pipeline::validate_pipeline()?;

    if options.diagnostics {
        eprintln!("{}", logging::get_system_diagnostics());
        if options.expression.is_none() && options.file.is_none() {
            return Ok(());
        }
    }

    if let Some(path) = &options.file {
        let mut config = batch::BatchConfig::from_runtime(&runtime);
        if options.sequential {
            config.max_threads = 1;
        }
        if let Some(threads) = options.threads {
            config.max_threads = threads;
        }
        process_file(path, &config)?;
    } else if let Some(expression) = &options.expression {
        process_single_expression(expression, &runtime)?;
    }

    Ok(())
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                options.help = true;
            }
            "--fail-fast" => {
                options.fail_fast = true;
            }
            "--sequential" => {
                options.sequential = true;
            }
            "--diagnostics" => {
                options.diagnostics = true;
            }
            "--file" | "--config" | "--threads" => {
                let flag = args[i].as_str();
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{} requires a value", flag))?;
                match flag {
                    "--file" => options.file = Some(PathBuf::from(value)),
                    "--config" => options.config_path = Some(PathBuf::from(value)),
                    _ => {
                        let threads = value
                            .parse::<usize>()
                            .map_err(|_| format!("Invalid thread count '{}'", value))?;
                        options.threads = Some(threads.clamp(1, 32));
                    }
                }
                i += 1;
            }
            // A lone "-" or a leading minus such as "-3+4" is an expression
            arg if arg.starts_with("--") => {
                return Err(format!("Unknown option '{}'", arg));
            }
            arg => {
                if options.expression.is_some() {
                    return Err("Only one expression may be given; use --file for more".to_string());
                }
                options.expression = Some(arg.to_string());
            }
        }
        i += 1;
    }

    if !options.help {
        match (&options.expression, &options.file) {
            (None, None) if options.diagnostics => {}
            (None, None) => return Err("Missing expression or --file".to_string()),
            (Some(_), Some(_)) => {
                return Err("Give either an expression or --file, not both".to_string())
            }
            _ => {}
        }
    }

    Ok(options)
}

fn print_help(program_name: &str) {
    println!("RPN Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Infix expression to postfix (RPN) conversion");
    println!();
    println!("USAGE:");
    println!(
        "    {} <expression> [options]          # Convert one expression",
        program_name
    );
    println!(
        "    {} --file <path> [options]         # Convert one expression per line",
        program_name
    );
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --file PATH         Read expressions from PATH ('#' lines are comments)");
    println!("    --config PATH       Load runtime preferences from a TOML file");
    println!("    --fail-fast         Stop at the first failing expression");
    println!("    --sequential        Convert file expressions on one thread");
    println!("    --threads N         Set maximum number of threads (default: auto)");
    println!("    --diagnostics       Print logging and limit configuration to stderr");
    println!();
    println!("OUTPUT:");
    println!("    One JSON object per converted expression on stdout");
    println!("    Errors and logs on stderr; exit status 1 if any expression failed");
    println!();
    println!("EXAMPLES:");
    println!("    {} '2 + 3 * $x'", program_name);
    println!("    {} 'max(1, -2) ^ 2'", program_name);
    println!("    {} --file exprs.txt --fail-fast", program_name);
    println!();

    let pipeline_info = pipeline::get_pipeline_info();
    println!("PIPELINE CAPABILITIES:");
    for line in pipeline_info.report().lines() {
        println!("    {}", line);
    }
    println!();

    let batch_info = batch::get_batch_info();
    println!("BATCH PROCESSING CAPABILITIES:");
    println!(
        "    Max recommended threads: {}",
        batch_info.max_recommended_threads
    );
    println!(
        "    Parallel processing: {}",
        batch_info.supports_parallel_processing
    );
    println!("    Fail-fast mode: {}", batch_info.supports_fail_fast);
    println!("    Comment lines: {}", batch_info.supports_comment_lines);
    println!(
        "    Max expressions per file: {}",
        batch_info.max_expressions_per_batch
    );
}

fn process_single_expression(
    expression: &str,
    runtime: &RuntimeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match pipeline::process_expression_with_config(expression, runtime) {
        Ok(result) => {
            println!("{}", result.to_output().to_json()?);
        }
        Err(error) => {
            print_detailed_error(expression, &error);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn process_file(
    path: &std::path::Path,
    config: &batch::BatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match batch::process_expression_file(path, config) {
        Ok(results) => {
            for outcome in &results.outcomes {
                match &outcome.result {
                    Ok(result) => println!("{}", result.to_output().to_json()?),
                    Err(error) => {
                        eprintln!("{}:{}:", path.display(), outcome.line);
                        print_detailed_error(&outcome.expression, error);
                    }
                }
            }

            eprintln!("{}", results.summary());

            if results.failure_count() > 0 {
                std::process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("Batch processing failed: {}", error);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn get_error_summary(error: &pipeline::PipelineError) -> &'static str {
    match error {
        pipeline::PipelineError::Lexical(_) => "Tokenization error",
        pipeline::PipelineError::Transducer(_) => "Postfix conversion error",
        pipeline::PipelineError::Input { .. } => "Input error",
    }
}

fn print_detailed_error(expression: &str, error: &pipeline::PipelineError) {
    eprintln!("FAILED [{}] {}: {}", error.error_code(), get_error_summary(error), error);

    if let Some(underline) = error.span().and_then(|span| span.underline(expression)) {
        for line in underline.lines() {
            eprintln!("    {}", line);
        }
    }
}
