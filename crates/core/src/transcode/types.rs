//! Request and result types for the transcode pipeline.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::scratch::ScratchDir;
use crate::speed::SpeedFactor;

/// One transcode request: the uploaded file and the speed to apply.
#[derive(Debug, Clone)]
pub struct TranscodeRequest {
    /// Raw bytes of the uploaded video.
    pub data: Vec<u8>,
    /// Filename as supplied by the client.
    pub filename: String,
    /// Requested speed multiplier, validated by the runner.
    pub speed: f64,
}

impl TranscodeRequest {
    pub fn new(data: impl Into<Vec<u8>>, filename: impl Into<String>, speed: f64) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            speed,
        }
    }
}

/// A successful transcode.
///
/// Owns the request's scratch directory: the artifact stays on disk until
/// this value is dropped, after which the directory is removed.
#[derive(Debug)]
pub struct TranscodeOutput {
    pub summary: TranscodeSummary,
    pub output_path: PathBuf,
    scratch: ScratchDir,
}

/// Serializable facts about a finished transcode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodeSummary {
    pub job_id: String,
    /// Derived artifact filename, e.g. `clip.2x.mp4`.
    pub output_name: String,
    pub output_size_bytes: u64,
    pub speed: SpeedFactor,
    pub video_filter: String,
    pub audio_filter: String,
    pub duration_ms: u64,
}

impl TranscodeOutput {
    pub(crate) fn new(
        summary: TranscodeSummary,
        output_path: PathBuf,
        scratch: ScratchDir,
    ) -> Self {
        Self {
            summary,
            output_path,
            scratch,
        }
    }

    pub fn output_name(&self) -> &str {
        &self.summary.output_name
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Reads the artifact into memory.
    pub async fn read_artifact(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.output_path).await
    }
}
