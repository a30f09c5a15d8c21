//! # Metrics Aggregation
//!
//! Hand-rolled request and service-call metrics: per-key rolling windows of
//! durations, success/failure counters, and a handful of business counters.
//! [`MetricsCollector::snapshot`] computes mean, min, max and nearest-rank
//! p50/p95/p99 from the retained samples on every call.
//!
//! ```rust
//! use tradesim_core::metrics::{MetricKey, MetricsCollector};
//!
//! let metrics = MetricsCollector::default();
//! let key = MetricKey::endpoint("GET", "/x");
//! metrics.record_sample(&key, 50.0);
//! metrics.record_sample(&key, 150.0);
//!
//! let snapshot = metrics.snapshot();
//! let stats = snapshot.get(&key).unwrap();
//! assert_eq!(stats.latency.count, 2);
//! assert_eq!(stats.latency.mean_ms, 100.0);
//! ```

mod collector;
mod stats;
mod timer;
mod window;

pub use collector::{
    KeyStats, MetricKey, MetricScope, MetricsCollector, MetricsSnapshot, RecentError,
    SummaryStats,
};
pub use stats::{percentile, LatencyStats};
pub use timer::{timed, Stopwatch};
pub use window::RollingWindow;
