// Internal modules
pub mod batch;
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use lexical::{LexerError, Tokenizer};
pub use pipeline::{PipelineError, PipelineResult};
pub use syntax::{Transducer, TransducerError};
pub use tokens::{Token, TokenSource};

// Re-export pipeline output for serialized consumers
pub use pipeline::output::PipelineOutput;
