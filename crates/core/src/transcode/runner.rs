//! Transcode runner: stages the upload, runs the processor, classifies the result.

use std::ffi::OsString;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::TranscodeError;
use super::types::{TranscodeOutput, TranscodeRequest, TranscodeSummary};
use crate::config::Config;
use crate::metrics::{record_transcode, ActiveTranscode};
use crate::naming::derive_output_name;
use crate::processor::{MediaProcessor, ProcessOutput, ProcessorConfig};
use crate::scratch::ScratchDir;
use crate::spec::{EncodePolicy, SpeedTransformSpec};
use crate::speed::{SpeedFactor, SpeedLimits};

/// Runs one speed transform per call.
///
/// Every call gets its own scratch directory and spec, so concurrent calls
/// share nothing but the processor and a slot semaphore.
pub struct TranscodeRunner {
    processor: Arc<dyn MediaProcessor>,
    config: ProcessorConfig,
    limits: SpeedLimits,
    policy: EncodePolicy,
    slots: Arc<Semaphore>,
}

impl TranscodeRunner {
    /// Creates a runner with default speed limits and encode policy.
    pub fn new(processor: Arc<dyn MediaProcessor>, config: ProcessorConfig) -> Self {
        let slots = Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1)));
        Self {
            processor,
            config,
            limits: SpeedLimits::default(),
            policy: EncodePolicy::default(),
            slots,
        }
    }

    /// Creates a runner from the full application configuration.
    pub fn from_config(processor: Arc<dyn MediaProcessor>, config: &Config) -> Self {
        Self::new(processor, config.processor.clone())
            .with_limits(config.speed)
            .with_policy(config.encode.clone())
    }

    /// Sets the accepted speed range.
    pub fn with_limits(mut self, limits: SpeedLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the encoder policy.
    pub fn with_policy(mut self, policy: EncodePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn limits(&self) -> SpeedLimits {
        self.limits
    }

    /// Processor slots currently free.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Checks a raw speed against positivity and the configured limits.
    pub fn validate_speed(&self, speed: f64) -> Result<SpeedFactor, TranscodeError> {
        self.limits.check(SpeedFactor::new(speed)?)
    }

    /// Runs one request to completion.
    ///
    /// Triggering `cancel` terminates a running processor and yields
    /// [`TranscodeError::Cancelled`]. On any error the scratch directory is
    /// removed before returning; on success it moves into the output.
    pub async fn run(
        &self,
        request: TranscodeRequest,
        cancel: &CancellationToken,
    ) -> Result<TranscodeOutput, TranscodeError> {
        let start = Instant::now();
        let job_id = Uuid::new_v4().to_string();

        let result = self.run_job(&job_id, request, cancel, start).await;

        let elapsed = start.elapsed().as_secs_f64();
        match &result {
            Ok(output) => {
                record_transcode("success", elapsed);
                info!(
                    job_id = %job_id,
                    output = %output.summary.output_name,
                    size_bytes = output.summary.output_size_bytes,
                    duration_ms = output.summary.duration_ms,
                    "Transcode completed"
                );
            }
            Err(e) => {
                record_transcode(e.kind(), elapsed);
                warn!(job_id = %job_id, kind = e.kind(), error = %e, "Transcode failed");
            }
        }

        result
    }

    async fn run_job(
        &self,
        job_id: &str,
        request: TranscodeRequest,
        cancel: &CancellationToken,
        start: Instant,
    ) -> Result<TranscodeOutput, TranscodeError> {
        let speed = self.validate_speed(request.speed)?;

        let _slot = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TranscodeError::Cancelled),
            permit = Arc::clone(&self.slots).acquire_owned() => {
                permit.map_err(|_| TranscodeError::Cancelled)?
            }
        };
        let _active = ActiveTranscode::start();

        let scratch = ScratchDir::create(&self.config.scratch_root, job_id).await?;
        let input_path = scratch.stage(&request.filename, &request.data).await?;
        drop(request.data);

        let output_name = derive_output_name(&request.filename, speed);
        let output_path = scratch.file_path(&output_name);
        let spec = SpeedTransformSpec::for_speed(&input_path, speed, &self.policy);

        info!(
            job_id = %job_id,
            filename = %request.filename,
            speed = speed.value(),
            video_filter = spec.video_filter(),
            audio_filter = spec.audio_filter(),
            "Starting transcode"
        );

        let args = spec.to_args(&output_path);
        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(job_id = %job_id, "Cancellation requested, stopping processor");
                return Err(TranscodeError::Cancelled);
            }
            result = self.execute(&args) => result?,
        };

        if !output.success() {
            return Err(TranscodeError::processor_failure(
                output.exit_code,
                output.stderr,
            ));
        }

        let metadata = tokio::fs::metadata(&output_path)
            .await
            .map_err(|_| TranscodeError::MissingOutput {
                path: output_path.clone(),
            })?;

        let summary = TranscodeSummary {
            job_id: job_id.to_string(),
            output_name,
            output_size_bytes: metadata.len(),
            speed,
            video_filter: spec.video_filter().to_string(),
            audio_filter: spec.audio_filter().to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        Ok(TranscodeOutput::new(summary, output_path, scratch))
    }

    /// Runs the processor, bounded by the configured timeout if any.
    async fn execute(&self, args: &[OsString]) -> Result<ProcessOutput, TranscodeError> {
        match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, self.processor.run(args))
                .await
                .map_err(|_| TranscodeError::Timeout {
                    timeout_secs: limit.as_secs(),
                })?,
            None => self.processor.run(args).await,
        }
    }
}
