//! The speed transform pipeline.
//!
//! A [`TranscodeRunner`] takes an uploaded file and a speed factor, stages
//! the file in a fresh scratch directory, runs the media processor with a
//! [`SpeedTransformSpec`](crate::spec::SpeedTransformSpec) and hands back
//! either the artifact or a [`TranscodeError`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use speedshift_core::{FfmpegProcessor, ProcessorConfig, TranscodeRequest, TranscodeRunner};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ProcessorConfig::default();
//! let runner = TranscodeRunner::new(Arc::new(FfmpegProcessor::new(&config)), config);
//!
//! let request = TranscodeRequest::new(bytes, "clip.mp4", 2.0);
//! match runner.run(request, &CancellationToken::new()).await {
//!     Ok(output) => println!("wrote {}", output.output_name()), // clip.2x.mp4
//!     Err(e) => eprintln!("{}: {:?}", e, e.diagnostic()),
//! }
//! ```

mod error;
mod runner;
mod types;

pub use error::TranscodeError;
pub use runner::TranscodeRunner;
pub use types::{TranscodeOutput, TranscodeRequest, TranscodeSummary};
