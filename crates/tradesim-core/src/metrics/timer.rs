//! Timing helpers for instrumenting service calls.

use std::time::Instant;

use super::collector::MetricsCollector;

/// Wall-clock timer reporting elapsed time in fractional milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

/// Run `operation` and record it as a `service.operation` call.
///
/// The call counts as a success when `operation` returns `Ok`.
pub fn timed<T, E>(
    collector: &MetricsCollector,
    service: &str,
    operation: &str,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let stopwatch = Stopwatch::start();
    let result = f();
    collector.record_service_call(service, operation, stopwatch.elapsed_ms(), result.is_ok());
    result
}
