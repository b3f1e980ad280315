use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Speed bounds are finite, positive and ordered
/// - At least one concurrent job, non-zero timeout when set
/// - Encode policy strings are non-empty and crf is within x264/x265 range
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let speed = &config.speed;
    if !(speed.min.is_finite() && speed.max.is_finite()) || speed.min <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "speed.min must be a positive number (got {})",
            speed.min
        )));
    }
    if speed.min > speed.max {
        return Err(ConfigError::ValidationError(format!(
            "speed.min ({}) cannot exceed speed.max ({})",
            speed.min, speed.max
        )));
    }

    if config.processor.max_concurrent_jobs == 0 {
        return Err(ConfigError::ValidationError(
            "processor.max_concurrent_jobs must be at least 1".to_string(),
        ));
    }
    if config.processor.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "processor.timeout_secs cannot be 0 (omit it to disable the timeout)".to_string(),
        ));
    }

    let encode = &config.encode;
    for (name, value) in [
        ("encode.video_codec", &encode.video_codec),
        ("encode.preset", &encode.preset),
        ("encode.audio_codec", &encode.audio_codec),
        ("encode.audio_bitrate", &encode.audio_bitrate),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                name
            )));
        }
    }
    if encode.crf > 51 {
        return Err(ConfigError::ValidationError(format!(
            "encode.crf must be between 0 and 51 (got {})",
            encode.crf
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speed::SpeedLimits;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_inverted_speed_bounds_fails() {
        let config = Config {
            speed: SpeedLimits { min: 4.0, max: 2.0 },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_non_positive_min_fails() {
        let config = Config {
            speed: SpeedLimits { min: 0.0, max: 2.0 },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_jobs_fails() {
        let mut config = Config::default();
        config.processor.max_concurrent_jobs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.processor.timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_preset_fails() {
        let mut config = Config::default();
        config.encode.preset = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("encode.preset"));
    }

    #[test]
    fn test_validate_crf_out_of_range_fails() {
        let mut config = Config::default();
        config.encode.crf = 60;
        assert!(validate_config(&config).is_err());
    }
}
