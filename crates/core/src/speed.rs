//! Playback speed factor and the bounds the pipeline accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::transcode::TranscodeError;

/// A playback-rate multiplier: `> 1` speeds up, `< 1` slows down.
///
/// Always finite and strictly positive. Range limits are a separate
/// concern, see [`SpeedLimits`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    /// Normal playback speed.
    pub const UNITY: SpeedFactor = SpeedFactor(1.0);

    /// Creates a speed factor, rejecting zero, negatives, NaN and infinities.
    pub fn new(value: f64) -> Result<Self, TranscodeError> {
        if value.is_nan() {
            return Err(TranscodeError::invalid_speed(value, "not a number"));
        }
        if value.is_infinite() {
            return Err(TranscodeError::invalid_speed(value, "must be finite"));
        }
        if value <= 0.0 {
            return Err(TranscodeError::invalid_speed(value, "must be greater than 0"));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Scale applied to presentation timestamps (`1 / speed`).
    pub fn timestamp_scale(self) -> f64 {
        1.0 / self.0
    }
}

impl fmt::Display for SpeedFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x", self.0)
    }
}

impl TryFrom<f64> for SpeedFactor {
    type Error = TranscodeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for SpeedFactor {
    type Err = TranscodeError;

    /// Parses form input such as `"1.5"`, tolerating surrounding whitespace
    /// and a trailing `x` (`"2x"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed
            .strip_suffix(['x', 'X'])
            .unwrap_or(trimmed)
            .trim_end();
        let value = number
            .parse::<f64>()
            .map_err(|_| TranscodeError::UnparsableSpeed {
                input: s.to_string(),
            })?;
        Self::new(value)
    }
}

/// Inclusive range of speed factors the pipeline will process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimits {
    #[serde(default = "default_min_speed")]
    pub min: f64,
    #[serde(default = "default_max_speed")]
    pub max: f64,
}

fn default_min_speed() -> f64 {
    0.1
}

fn default_max_speed() -> f64 {
    8.0
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self {
            min: default_min_speed(),
            max: default_max_speed(),
        }
    }
}

impl SpeedLimits {
    /// Whether `value` lies within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Returns the speed unchanged if it lies within the limits.
    pub fn check(&self, speed: SpeedFactor) -> Result<SpeedFactor, TranscodeError> {
        if self.contains(speed.value()) {
            Ok(speed)
        } else {
            Err(TranscodeError::invalid_speed(
                speed.value(),
                format!("must be between {} and {}", self.min, self.max),
            ))
        }
    }
}
