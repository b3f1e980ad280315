//! Prometheus metrics for the transcode pipeline.
//!
//! Collectors are registered into the host's registry via [`all_metrics`].

use once_cell::sync::Lazy;
use prometheus::core::Collector;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

/// Transcodes total by result ("success" or an error kind).
pub static TRANSCODES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("speedshift_transcodes_total", "Total transcode requests"),
        &["result"],
    )
    .unwrap()
});

/// Transcode duration in seconds.
pub static TRANSCODE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "speedshift_transcode_duration_seconds",
            "Duration of transcode requests, staging included",
        )
        .buckets(vec![
            0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0,
        ]),
        &["result"],
    )
    .unwrap()
});

/// Encodes currently holding a processor slot.
pub static TRANSCODES_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "speedshift_transcodes_active",
        "Number of transcodes currently running",
    )
    .unwrap()
});

/// All core metrics, for registration in the host's registry.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(TRANSCODES_TOTAL.clone()),
        Box::new(TRANSCODE_DURATION.clone()),
        Box::new(TRANSCODES_ACTIVE.clone()),
    ]
}

/// Records the outcome of one transcode request.
pub fn record_transcode(result: &str, duration_secs: f64) {
    TRANSCODES_TOTAL.with_label_values(&[result]).inc();
    TRANSCODE_DURATION
        .with_label_values(&[result])
        .observe(duration_secs);
}

/// Counts one running transcode for as long as it is alive.
pub(crate) struct ActiveTranscode;

impl ActiveTranscode {
    pub(crate) fn start() -> Self {
        TRANSCODES_ACTIVE.inc();
        Self
    }
}

impl Drop for ActiveTranscode {
    fn drop(&mut self) {
        TRANSCODES_ACTIVE.dec();
    }
}
