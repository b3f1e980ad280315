//! Media processor boundary.
//!
//! The pipeline never decodes or encodes media itself. It hands an argument
//! vector to a [`MediaProcessor`], which runs the external engine (FFmpeg
//! in production) and reports its exit status and captured output.
//!
//! # Example
//!
//! ```ignore
//! use speedshift_core::processor::{FfmpegProcessor, MediaProcessor, ProcessorConfig};
//!
//! let processor = FfmpegProcessor::new(&ProcessorConfig::default());
//! processor.validate().await?;
//!
//! let output = processor.run(&args).await?;
//! if !output.success() {
//!     eprintln!("{}", output.stderr);
//! }
//! ```

mod config;
mod ffmpeg;
mod traits;

pub use config::ProcessorConfig;
pub use ffmpeg::FfmpegProcessor;
pub use traits::{MediaProcessor, ProcessOutput};
