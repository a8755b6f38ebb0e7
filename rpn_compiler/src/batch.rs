//! Batch processing of expression files
//!
//! An expression file holds one infix expression per line. Blank lines are
//! ignored and `#` lines are comments unless comment skipping is disabled.
//! Every expression is converted independently, sequentially or across a
//! small pool of threads.

use crate::config::compile_time::batch_processing::MAX_EXPRESSIONS_PER_BATCH;
use crate::config::runtime::RuntimeConfig;
use crate::logging::{self, codes, Code};
use crate::pipeline::{self, PipelineError, PipelineResult};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub max_expressions: usize,
    pub skip_comment_lines: bool,
    pub fail_fast: bool,
    pub runtime: RuntimeConfig,
}

impl BatchConfig {
    /// Batch settings taken from runtime preferences
    pub fn from_runtime(runtime: &RuntimeConfig) -> Self {
        Self {
            skip_comment_lines: runtime.batch.skip_comment_lines,
            fail_fast: runtime.batch.fail_fast,
            runtime: runtime.clone(),
            ..Self::default()
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            max_threads: std::thread::available_parallelism()
                .map(|n| n.get().min(8))
                .unwrap_or(4),
            max_expressions: MAX_EXPRESSIONS_PER_BATCH,
            skip_comment_lines: runtime.batch.skip_comment_lines,
            fail_fast: runtime.batch.fail_fast,
            runtime,
        }
    }
}

/// One expression read from a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionLine {
    /// 1-based line number in the source file
    pub line: usize,
    pub text: String,
}

/// Result of converting one expression of a batch
#[derive(Debug)]
pub struct ExpressionOutcome {
    pub line: usize,
    pub expression: String,
    pub result: Result<PipelineResult, PipelineError>,
}

/// Batch processing results, ordered by line
#[derive(Debug)]
pub struct BatchResults {
    pub outcomes: Vec<ExpressionOutcome>,
    pub processing_duration: Duration,
    pub expressions_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            processing_duration: Duration::new(0, 0),
            expressions_discovered: 0,
        }
    }

    pub fn expressions_processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.outcomes.len() as f64
        }
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.outcomes.extend(other.outcomes);
        self.outcomes.sort_by_key(|o| o.line);
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} expressions processed, {} successful ({:.1}%), {} failed, {:.2}s total",
            self.expressions_processed(),
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

impl Default for BatchResults {
    fn default() -> Self {
        Self::new()
    }
}

/// Batch processing errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Expression file not found: {path}")]
    InputNotFound { path: String },

    #[error("Failed to read '{path}': {error}")]
    Io { path: String, error: String },

    #[error("No expressions found in: {path}")]
    NoExpressions { path: String },

    #[error("Too many expressions: {count} (max: {max})")]
    TooManyExpressions { count: usize, max: usize },

    #[error("Thread pool error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::InputNotFound { .. } => codes::input::INPUT_NOT_FOUND,
            Self::Io { .. } => codes::input::IO_ERROR,
            Self::NoExpressions { .. } => codes::input::INVALID_INPUT,
            Self::TooManyExpressions { .. } => codes::input::TOO_MANY_EXPRESSIONS,
            Self::ThreadError { .. } => codes::system::INTERNAL_ERROR,
        }
    }
}

// ============================================================================
// READING
// ============================================================================

/// Split file content into expressions, keeping line numbers
pub fn parse_expression_lines(content: &str, skip_comment_lines: bool) -> Vec<ExpressionLine> {
    content
        .lines()
        .enumerate()
        .map(|(index, text)| (index + 1, text.trim()))
        .filter(|(_, text)| !text.is_empty())
        .filter(|(_, text)| !(skip_comment_lines && text.starts_with('#')))
        .map(|(line, text)| ExpressionLine {
            line,
            text: text.to_string(),
        })
        .collect()
}

/// Read and split an expression file
pub fn read_expressions(path: &Path, config: &BatchConfig) -> Result<Vec<ExpressionLine>, BatchError> {
    crate::log_info!("Reading expression file", "path" => path.display());

    if !path.is_file() {
        return Err(BatchError::InputNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| BatchError::Io {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;

    let expressions = parse_expression_lines(&content, config.skip_comment_lines);

    if expressions.is_empty() {
        return Err(BatchError::NoExpressions {
            path: path.display().to_string(),
        });
    }

    if expressions.len() > config.max_expressions {
        return Err(BatchError::TooManyExpressions {
            count: expressions.len(),
            max: config.max_expressions,
        });
    }

    crate::log_debug!("Expressions loaded",
        "path" => path.display(),
        "expressions" => expressions.len()
    );

    Ok(expressions)
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

fn process_line(source: &str, expression: &ExpressionLine, runtime: &RuntimeConfig) -> ExpressionOutcome {
    let result = logging::with_expression_context(source, expression.line, || {
        pipeline::process_expression_with_config(&expression.text, runtime)
    });

    ExpressionOutcome {
        line: expression.line,
        expression: expression.text.clone(),
        result,
    }
}

/// Convert expressions one after another
pub fn process_lines_sequential(
    source: &str,
    expressions: &[ExpressionLine],
    config: &BatchConfig,
) -> BatchResults {
    let start_time = Instant::now();
    let mut results = BatchResults::new();
    results.expressions_discovered = expressions.len();

    for expression in expressions {
        let outcome = process_line(source, expression, &config.runtime);
        let failed = outcome.result.is_err();
        results.outcomes.push(outcome);

        if failed && config.fail_fast {
            crate::log_warning!("Fail-fast mode enabled, stopping batch processing",
                "line" => expression.line
            );
            break;
        }
    }

    results.processing_duration = start_time.elapsed();
    results
}

/// Convert expressions in chunks spread across worker threads
pub fn process_lines_parallel(
    source: &str,
    expressions: &[ExpressionLine],
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let mut results = BatchResults::new();
    results.expressions_discovered = expressions.len();

    if expressions.is_empty() {
        return Ok(results);
    }

    let threads = config.max_threads.max(1);
    let chunk_size = calculate_chunk_size(expressions.len(), threads);

    crate::log_debug!("Parallel processing configuration",
        "expressions" => expressions.len(),
        "chunk_size" => chunk_size,
        "threads" => threads
    );

    for chunk in expressions.chunks(chunk_size) {
        let chunk_results = process_chunk_parallel(source, chunk, threads, &config.runtime)?;
        results.merge(chunk_results);

        if !config.fail_fast {
            continue;
        }

        // Drop lines after the first failure, matching sequential order
        if let Some(first_failure) = results.outcomes.iter().position(|o| o.result.is_err()) {
            crate::log_warning!("Fail-fast mode enabled, stopping batch processing",
                "line" => results.outcomes[first_failure].line
            );
            results.outcomes.truncate(first_failure + 1);
            break;
        }
    }

    results.processing_duration = start_time.elapsed();
    Ok(results)
}

fn process_chunk_parallel(
    source: &str,
    chunk: &[ExpressionLine],
    threads: usize,
    runtime: &RuntimeConfig,
) -> Result<BatchResults, BatchError> {
    let per_thread = chunk.len().div_ceil(threads);

    let outcomes = thread::scope(|scope| {
        let handles: Vec<_> = chunk
            .chunks(per_thread)
            .map(|slice| {
                scope.spawn(move || {
                    slice
                        .iter()
                        .map(|expression| process_line(source, expression, runtime))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(chunk.len());
        for handle in handles {
            let part = handle.join().map_err(|_| BatchError::ThreadError {
                message: "Thread panicked during processing".to_string(),
            })?;
            outcomes.extend(part);
        }
        Ok::<_, BatchError>(outcomes)
    })?;

    let mut results = BatchResults::new();
    results.outcomes = outcomes;
    results.outcomes.sort_by_key(|o| o.line);
    Ok(results)
}

fn calculate_chunk_size(expressions: usize, threads: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 16;
    const MAX_CHUNK_SIZE: usize = 4096;

    expressions.div_ceil(threads).clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Read an expression file and convert every expression in it
pub fn process_expression_file(path: &Path, config: &BatchConfig) -> Result<BatchResults, BatchError> {
    let expressions = read_expressions(path, config)?;
    let source = path.display().to_string();

    crate::log_info!("Starting batch processing",
        "path" => source.as_str(),
        "expressions" => expressions.len(),
        "max_threads" => config.max_threads
    );

    let results = if config.max_threads <= 1 {
        process_lines_sequential(&source, &expressions, config)
    } else {
        process_lines_parallel(&source, &expressions, config)?
    };

    crate::log_success!(codes::success::BATCH_PROCESSING_COMPLETE, "Batch processing completed",
        "path" => source.as_str(),
        "processed" => results.expressions_processed(),
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

/// Get batch processing capabilities
pub fn get_batch_info() -> BatchInfo {
    BatchInfo {
        max_recommended_threads: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4),
        supports_parallel_processing: true,
        supports_fail_fast: true,
        supports_comment_lines: true,
        max_expressions_per_batch: MAX_EXPRESSIONS_PER_BATCH,
    }
}

/// Batch processing capabilities
#[derive(Debug, Clone)]
pub struct BatchInfo {
    pub max_recommended_threads: usize,
    pub supports_parallel_processing: bool,
    pub supports_fail_fast: bool,
    pub supports_comment_lines: bool,
    pub max_expressions_per_batch: usize,
}

impl BatchInfo {
    pub fn summary(&self) -> String {
        format!(
            "Batch processor: {} threads, up to {} expressions per file",
            self.max_recommended_threads, self.max_expressions_per_batch
        )
    }
}
