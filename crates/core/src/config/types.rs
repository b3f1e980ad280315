use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::processor::ProcessorConfig;
use crate::spec::EncodePolicy;
use crate::speed::SpeedLimits;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub processor: ProcessorConfig,
    #[serde(default)]
    pub speed: SpeedLimits,
    #[serde(default)]
    pub encode: EncodePolicy,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted upload body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    1024 * 1024 * 1024 // 1 GiB
}

/// Sanitized config for API responses (local filesystem layout hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub processor: SanitizedProcessorConfig,
    pub speed: SpeedLimits,
    pub encode: EncodePolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProcessorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    pub max_concurrent_jobs: usize,
    pub accepted_extensions: Vec<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            processor: SanitizedProcessorConfig {
                timeout_secs: config.processor.timeout_secs,
                max_concurrent_jobs: config.processor.max_concurrent_jobs,
                accepted_extensions: config.processor.accepted_extensions.clone(),
            },
            speed: config.speed,
            encode: config.encode.clone(),
        }
    }
}
