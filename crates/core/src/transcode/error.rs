//! Error types for the transcode pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a transcode request.
///
/// Every variant is terminal for the request: the runner never retries.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// Speed factor is not a positive number or lies outside the accepted range.
    #[error("Invalid speed factor {value}: {reason}")]
    InvalidSpeed { value: f64, reason: String },

    /// Speed text is not a number at all.
    #[error("Speed '{input}' is not a number")]
    UnparsableSpeed { input: String },

    /// Input bytes could not be written to the scratch directory.
    #[error("Failed to stage input at {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The media processor binary could not be started.
    #[error("Failed to launch media processor {path}: {source}")]
    ProcessorLaunch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The media processor ran and exited unsuccessfully.
    #[error("Media processor failed with {}", describe_exit(.exit_code))]
    ProcessorFailure {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The media processor reported success but the artifact is missing.
    #[error("Media processor produced no output at {path}")]
    MissingOutput { path: PathBuf },

    /// The encode exceeded the configured timeout.
    #[error("Transcode timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The request was cancelled before the encode finished.
    #[error("Transcode cancelled")]
    Cancelled,

    /// I/O error outside staging.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

impl TranscodeError {
    /// Creates a new invalid speed error.
    pub fn invalid_speed(value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidSpeed {
            value,
            reason: reason.into(),
        }
    }

    /// Creates a new processor failure carrying the engine's error stream.
    pub fn processor_failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::ProcessorFailure {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// The processor's captured error stream, verbatim, for processor failures.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::ProcessorFailure { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSpeed { .. } => "invalid_speed",
            Self::UnparsableSpeed { .. } => "unparsable_speed",
            Self::Staging { .. } => "staging",
            Self::ProcessorLaunch { .. } => "processor_launch",
            Self::ProcessorFailure { .. } => "processor_failure",
            Self::MissingOutput { .. } => "missing_output",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Io(_) => "io",
        }
    }

    /// Whether the user could fix this by changing the file or the speed.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSpeed { .. } | Self::UnparsableSpeed { .. } | Self::ProcessorFailure { .. }
        )
    }
}
