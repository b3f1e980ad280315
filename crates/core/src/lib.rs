pub mod config;
pub mod metrics;
pub mod naming;
pub mod processor;
pub mod scratch;
pub mod spec;
pub mod speed;
pub mod tempo;
pub mod testing;
pub mod transcode;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig,
};
pub use naming::{derive_output_name, is_accepted_extension, sanitize_filename, trimmed_speed};
pub use processor::{FfmpegProcessor, MediaProcessor, ProcessOutput, ProcessorConfig};
pub use scratch::ScratchDir;
pub use spec::{EncodePolicy, SpeedTransformSpec};
pub use speed::{SpeedFactor, SpeedLimits};
pub use tempo::TempoChain;
pub use transcode::{
    TranscodeError, TranscodeOutput, TranscodeRequest, TranscodeRunner, TranscodeSummary,
};
