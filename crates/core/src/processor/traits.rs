//! Trait definitions for the processor module.

use async_trait::async_trait;
use std::ffi::OsString;

use crate::transcode::TranscodeError;

/// Exit status and captured streams of one processor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// An external engine that performs the actual decode/filter/encode work.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Returns the name of this processor implementation.
    fn name(&self) -> &str;

    /// Runs the engine once with `args` and waits for it to exit.
    ///
    /// Fails only when the engine cannot be started; a non-zero exit is
    /// reported through [`ProcessOutput`]. Dropping the returned future
    /// must terminate the running engine.
    async fn run(&self, args: &[OsString]) -> Result<ProcessOutput, TranscodeError>;

    /// Validates that the engine is installed and executable.
    async fn validate(&self) -> Result<(), TranscodeError>;
}
