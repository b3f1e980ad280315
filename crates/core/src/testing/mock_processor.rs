//! Mock media processor for testing.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::processor::{MediaProcessor, ProcessOutput};
use crate::transcode::TranscodeError;

/// Mock implementation of the MediaProcessor trait.
///
/// Provides controllable behavior for testing:
/// - Record every argument vector for assertions
/// - Simulate non-zero exits with a scripted error stream
/// - Simulate launch failures
/// - Delay completion to exercise cancellation and timeouts
///
/// On a successful run the mock writes a small file at the last argument
/// (the output path), the way ffmpeg would.
#[derive(Debug)]
pub struct MockProcessor {
    invocations: Arc<RwLock<Vec<Vec<String>>>>,
    exit_code: Arc<RwLock<i32>>,
    stderr: Arc<RwLock<String>>,
    launch_error: Arc<RwLock<Option<std::io::ErrorKind>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    write_output: Arc<RwLock<bool>>,
    output_bytes: Arc<RwLock<Vec<u8>>>,
}

impl Default for MockProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProcessor {
    /// Create a mock that succeeds immediately.
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(RwLock::new(Vec::new())),
            exit_code: Arc::new(RwLock::new(0)),
            stderr: Arc::new(RwLock::new(String::new())),
            launch_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
            write_output: Arc::new(RwLock::new(true)),
            output_bytes: Arc::new(RwLock::new(b"mock-artifact".to_vec())),
        }
    }

    /// Get all recorded argument vectors.
    pub async fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.read().await.clone()
    }

    /// Get the most recent argument vector.
    pub async fn last_invocation(&self) -> Option<Vec<String>> {
        self.invocations.read().await.last().cloned()
    }

    /// Get the number of runs performed.
    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Make subsequent runs exit with `exit_code` and `stderr`.
    pub async fn fail_with(&self, exit_code: i32, stderr: impl Into<String>) {
        *self.exit_code.write().await = exit_code;
        *self.stderr.write().await = stderr.into();
    }

    /// Make subsequent runs fail to launch with the given error kind.
    pub async fn fail_launch(&self, kind: std::io::ErrorKind) {
        *self.launch_error.write().await = Some(kind);
    }

    /// Restore successful behavior.
    pub async fn succeed(&self) {
        *self.exit_code.write().await = 0;
        self.stderr.write().await.clear();
        *self.launch_error.write().await = None;
    }

    /// Delay every run by `delay` before it completes.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Whether a successful run writes the output file.
    pub async fn set_write_output(&self, write_output: bool) {
        *self.write_output.write().await = write_output;
    }

    /// Bytes written as the artifact on success.
    pub async fn set_output_bytes(&self, bytes: impl Into<Vec<u8>>) {
        *self.output_bytes.write().await = bytes.into();
    }
}

#[async_trait]
impl MediaProcessor for MockProcessor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, args: &[OsString]) -> Result<ProcessOutput, TranscodeError> {
        if let Some(kind) = *self.launch_error.read().await {
            return Err(TranscodeError::ProcessorLaunch {
                path: PathBuf::from("mock-ffmpeg"),
                source: std::io::Error::from(kind),
            });
        }

        self.invocations.write().await.push(
            args.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        );

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let exit_code = *self.exit_code.read().await;
        if exit_code == 0 && *self.write_output.read().await {
            if let Some(output_path) = args.last() {
                let bytes = self.output_bytes.read().await.clone();
                tokio::fs::write(output_path, bytes).await?;
            }
        }

        Ok(ProcessOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: self.stderr.read().await.clone(),
        })
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        match *self.launch_error.read().await {
            Some(kind) => Err(TranscodeError::ProcessorLaunch {
                path: PathBuf::from("mock-ffmpeg"),
                source: std::io::Error::from(kind),
            }),
            None => Ok(()),
        }
    }
}
