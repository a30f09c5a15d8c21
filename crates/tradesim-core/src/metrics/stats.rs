use serde::{Deserialize, Serialize};

use super::window::RollingWindow;

/// Latency summary of one metric key.
///
/// `count` is the lifetime number of samples; the other fields are computed
/// over the `window_len` samples still retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub count: u64,
    pub window_len: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

impl LatencyStats {
    /// `None` when the window holds no samples.
    pub fn from_window(count: u64, window: &RollingWindow) -> Option<Self> {
        let sorted = window.sorted();
        let (&min_ms, &max_ms) = (sorted.first()?, sorted.last()?);
        let mean_ms = sorted.iter().sum::<f64>() / sorted.len() as f64;

        Some(Self {
            count,
            window_len: sorted.len(),
            mean_ms,
            min_ms,
            max_ms,
            p50_ms: percentile(&sorted, 50.0),
            p95_ms: percentile(&sorted, 95.0),
            p99_ms: percentile(&sorted, 99.0),
        })
    }
}

/// Nearest-rank percentile of ascending `sorted` values.
///
/// The index is `floor(len * pct / 100)` clamped to the last element; no
/// interpolation is done. Returns 0 for an empty slice.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return 0.0;
    };
    let index = (sorted.len() as f64 * pct / 100.0).floor() as usize;
    sorted[index.min(last)]
}
