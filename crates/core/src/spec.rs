//! Speed transform specification: everything the media processor needs to
//! re-time one input file.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::speed::SpeedFactor;
use crate::tempo::{filter_number, TempoChain};
use crate::transcode::TranscodeError;

/// Encoder settings applied to every transform, independent of speed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodePolicy {
    /// FFmpeg video encoder (`-c:v`).
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    /// Constant rate factor (`-crf`), lower is better quality.
    #[serde(default = "default_crf")]
    pub crf: u8,
    /// Encoder preset (`-preset`).
    #[serde(default = "default_preset")]
    pub preset: String,
    /// FFmpeg audio encoder (`-c:a`).
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    /// Audio bitrate (`-b:a`), ffmpeg notation such as `192k`.
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_crf() -> u8 {
    18
}

fn default_preset() -> String {
    "ultrafast".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

impl Default for EncodePolicy {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
            crf: default_crf(),
            preset: default_preset(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
        }
    }
}

/// A validated, immutable description of one speed transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedTransformSpec {
    input_path: PathBuf,
    speed: SpeedFactor,
    tempo: TempoChain,
    video_filter: String,
    audio_filter: String,
    policy: EncodePolicy,
}

impl SpeedTransformSpec {
    /// Builds a spec from a raw speed value.
    ///
    /// Fails with [`TranscodeError::InvalidSpeed`] unless `speed` is a
    /// finite number greater than zero.
    pub fn build(
        input_path: impl Into<PathBuf>,
        speed: f64,
        policy: &EncodePolicy,
    ) -> Result<Self, TranscodeError> {
        let speed = SpeedFactor::new(speed)?;
        Ok(Self::for_speed(input_path, speed, policy))
    }

    /// Builds a spec from an already validated speed.
    pub fn for_speed(
        input_path: impl Into<PathBuf>,
        speed: SpeedFactor,
        policy: &EncodePolicy,
    ) -> Self {
        let tempo = TempoChain::build(speed);
        let video_filter = format!("setpts={}*PTS", filter_number(speed.timestamp_scale()));
        let audio_filter = tempo.to_filter();

        Self {
            input_path: input_path.into(),
            speed,
            tempo,
            video_filter,
            audio_filter,
            policy: policy.clone(),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn speed(&self) -> SpeedFactor {
        self.speed
    }

    pub fn tempo(&self) -> &TempoChain {
        &self.tempo
    }

    /// Video filter expression (`setpts=<1/speed>*PTS`).
    pub fn video_filter(&self) -> &str {
        &self.video_filter
    }

    /// Audio filter expression (comma-joined `atempo` stages).
    pub fn audio_filter(&self) -> &str {
        &self.audio_filter
    }

    pub fn policy(&self) -> &EncodePolicy {
        &self.policy
    }

    /// Builds the processor argument vector writing to `output_path`.
    ///
    /// Arguments are kept discrete; they are never joined into a shell line.
    pub fn to_args(&self, output_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(20);
        args.push("-i".into());
        args.push(self.input_path.clone().into_os_string());

        let crf = self.policy.crf.to_string();
        let options: [&str; 15] = [
            "-vf",
            &self.video_filter,
            "-af",
            &self.audio_filter,
            "-c:v",
            &self.policy.video_codec,
            "-crf",
            &crf,
            "-preset",
            &self.policy.preset,
            "-c:a",
            &self.policy.audio_codec,
            "-b:a",
            &self.policy.audio_bitrate,
            "-y",
        ];
        args.extend(options.into_iter().map(OsString::from));

        args.push(output_path.as_os_str().to_os_string());
        args
    }
}
