//! Audio tempo chains.
//!
//! FFmpeg's `atempo` filter only accepts a factor in `[0.5, 2.0]` per
//! instance. Larger or smaller factors are expressed as a chain of
//! instances whose product is the requested factor.

use std::fmt;

use crate::speed::SpeedFactor;

/// Smallest factor a single `atempo` stage accepts.
pub const MIN_STAGE: f64 = 0.5;
/// Largest factor a single `atempo` stage accepts.
pub const MAX_STAGE: f64 = 2.0;

/// Ordered `atempo` stages whose product equals the requested speed.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoChain {
    stages: Vec<f64>,
}

impl TempoChain {
    /// Builds the chain for `speed`.
    ///
    /// Boundary stages of `2.0` (or `0.5`) are factored out until the
    /// remainder fits in a single stage; the remainder goes last.
    pub fn build(speed: SpeedFactor) -> Self {
        let mut residual = speed.value();
        let mut stages = Vec::new();

        while residual > MAX_STAGE {
            stages.push(MAX_STAGE);
            residual /= MAX_STAGE;
        }
        while residual < MIN_STAGE {
            stages.push(MIN_STAGE);
            residual *= 2.0;
        }
        stages.push(residual);

        Self { stages }
    }

    pub fn stages(&self) -> &[f64] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Product of all stages.
    pub fn product(&self) -> f64 {
        self.stages.iter().product()
    }

    /// Renders the chain as an ffmpeg audio filter expression.
    pub fn to_filter(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TempoChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "atempo={}", filter_number(*stage))?;
        }
        Ok(())
    }
}

/// Formats a filter argument in shortest round-trip form, always keeping a
/// fractional part (`1.0`, `0.5`, `0.3333333333333333`).
pub(crate) fn filter_number(value: f64) -> String {
    format!("{:?}", value)
}
