//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while acquiring or releasing the output sink
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("A capture session is already active")]
    AlreadyCapturing,

    /// The captured text is kept so a teardown fault does not lose it
    #[error("Failed to restore output sink: {source}")]
    SinkRestoreFailure {
        captured: String,
        #[source]
        source: std::io::Error,
    },
}

impl CaptureError {
    /// Text captured before the failure, if any
    pub fn captured_text(&self) -> Option<&str> {
        match self {
            CaptureError::SinkRestoreFailure { captured, .. } => Some(captured),
            CaptureError::AlreadyCapturing => None,
        }
    }
}

/// Errors produced by the numeric literal grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("empty value")]
    Empty,

    #[error("invalid numeric token '{0}'")]
    InvalidNumber(String),

    #[error("unbalanced brackets")]
    UnbalancedBrackets,

    #[error("nested arrays are not supported")]
    NestedArray,

    #[error("unexpected token '{0}' after value")]
    TrailingToken(String),
}

/// Errors that can occur during trace parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed trace line {line_number}: {reason}: '{line}'")]
    MalformedTraceLine {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("Invalid parser configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read parser configuration: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("Parser configuration TOML error: {0}")]
    ConfigToml(#[from] toml::de::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors from running a computation under capture and parsing its output
#[derive(Error, Debug)]
pub enum TraceError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
