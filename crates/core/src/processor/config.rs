//! Configuration for the media processor and the transcode runner.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for running the external media processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Directory under which per-request scratch directories are created.
    #[serde(default = "default_scratch_root")]
    pub scratch_root: PathBuf,

    /// Timeout for a single encode in seconds. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Maximum encodes running at the same time.
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,

    /// Upload extensions accepted by the host (without the dot).
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_scratch_root() -> PathBuf {
    std::env::temp_dir().join("speedshift")
}

fn default_max_concurrent_jobs() -> usize {
    2
}

fn default_accepted_extensions() -> Vec<String> {
    ["mp4", "mov", "avi", "mkv", "webm"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            scratch_root: default_scratch_root(),
            timeout_secs: None,
            max_concurrent_jobs: default_max_concurrent_jobs(),
            accepted_extensions: default_accepted_extensions(),
        }
    }
}

impl ProcessorConfig {
    /// Creates a new config with a custom ffmpeg path.
    pub fn with_ffmpeg_path(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ..Default::default()
        }
    }

    /// Sets the scratch root.
    pub fn with_scratch_root(mut self, scratch_root: impl Into<PathBuf>) -> Self {
        self.scratch_root = scratch_root.into();
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Sets the maximum concurrent encodes.
    pub fn with_max_concurrent_jobs(mut self, max: usize) -> Self {
        self.max_concurrent_jobs = max;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
