//! Error types.
//!
//! Library code returns [`PipelineError`]; the binary converts it into an
//! [`AppError`], which carries the process exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a missing CLI argument.
pub const EXIT_USAGE: u8 = 1;
/// Exit code for unreadable or malformed input.
pub const EXIT_INPUT: u8 = 2;
/// Exit code when the input yields no hour buckets.
pub const EXIT_EMPTY: u8 = 3;
/// Exit code when at least one chart could not be written.
pub const EXIT_RENDER: u8 = 4;

/// Failures raised while loading, computing or rendering a report.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to open CSV '{}': {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV input: {0}")]
    Read(#[from] std::io::Error),

    #[error("CSV parse error on line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("missing required column: `{0}`")]
    MissingColumn(&'static str),

    #[error("unparseable timestamp '{value}' on line {line}")]
    UnparseableTimestamp { line: usize, value: String },

    #[error("no hour buckets could be built from the input (empty dataset)")]
    EmptyDataset,

    #[error("failed to render '{file}': {message}")]
    Render { file: String, message: String },
}

impl PipelineError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Open { .. }
            | PipelineError::Read(_)
            | PipelineError::Csv { .. }
            | PipelineError::MissingColumn(_)
            | PipelineError::UnparseableTimestamp { .. } => EXIT_INPUT,
            PipelineError::EmptyDataset => EXIT_EMPTY,
            PipelineError::Render { .. } => EXIT_RENDER,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::new(err.exit_code(), format!("Error: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
