//! FFmpeg subprocess implementation.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::config::ProcessorConfig;
use super::traits::{MediaProcessor, ProcessOutput};
use crate::transcode::TranscodeError;

/// Runs the `ffmpeg` binary as a child process.
///
/// Arguments go straight to the child as a vector; no shell is involved.
#[derive(Debug, Clone)]
pub struct FfmpegProcessor {
    ffmpeg_path: PathBuf,
}

impl FfmpegProcessor {
    /// Creates a processor from the given configuration.
    pub fn new(config: &ProcessorConfig) -> Self {
        Self::with_path(config.ffmpeg_path.clone())
    }

    /// Creates a processor using the binary at `ffmpeg_path`.
    pub fn with_path(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    fn launch_error(&self, source: std::io::Error) -> TranscodeError {
        TranscodeError::ProcessorLaunch {
            path: self.ffmpeg_path.clone(),
            source,
        }
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn run(&self, args: &[OsString]) -> Result<ProcessOutput, TranscodeError> {
        debug!(ffmpeg = %self.ffmpeg_path.display(), args = ?args, "Launching ffmpeg");

        let output = Command::new(&self.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.launch_error(e))?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.launch_error(e))?;

        if !output.status.success() {
            return Err(TranscodeError::processor_failure(
                output.status.code(),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_configured_path() {
        let config = ProcessorConfig::with_ffmpeg_path("/opt/ffmpeg/bin/ffmpeg");
        let processor = FfmpegProcessor::new(&config);
        assert_eq!(processor.ffmpeg_path(), Path::new("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(processor.name(), "ffmpeg");
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let processor = FfmpegProcessor::with_path("/nonexistent/bin/ffmpeg-speedshift");
        let err = processor.run(&["-version".into()]).await.unwrap_err();
        assert!(matches!(err, TranscodeError::ProcessorLaunch { .. }));
    }

    #[tokio::test]
    async fn test_validate_missing_binary() {
        let processor = FfmpegProcessor::with_path("/nonexistent/bin/ffmpeg-speedshift");
        let err = processor.validate().await.unwrap_err();
        assert!(matches!(err, TranscodeError::ProcessorLaunch { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_exit_code_and_stderr() {
        let processor = FfmpegProcessor::with_path("/bin/sh");
        let output = processor
            .run(&[
                "-c".into(),
                "printf 'partial' ; printf 'Invalid data found' >&2; exit 3".into(),
            ])
            .await
            .unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout, "partial");
        assert_eq!(output.stderr, "Invalid data found");
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let processor = FfmpegProcessor::with_path("/bin/echo");
        let output = processor
            .run(&["$(whoami);".into(), "a b".into()])
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "$(whoami); a b\n");
    }
}
