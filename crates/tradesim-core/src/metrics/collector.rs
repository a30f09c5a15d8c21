use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use super::stats::LatencyStats;
use super::window::RollingWindow;
use crate::{CorrelationId, MetricsConfig};

/// Which table of the snapshot a key is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricScope {
    /// Inbound requests; these feed the global error rate.
    Endpoint,
    /// Internal service calls.
    Service,
}

/// Composite metric key such as `GET:/api/stocks` or `MarketService.tick`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricKey {
    pub scope: MetricScope,
    pub name: String,
}

impl MetricKey {
    pub fn new(scope: MetricScope, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    pub fn endpoint(method: &str, path: &str) -> Self {
        Self::new(MetricScope::Endpoint, format!("{method}:{path}"))
    }

    pub fn service(service: &str, operation: &str) -> Self {
        Self::new(MetricScope::Service, format!("{service}.{operation}"))
    }
}

impl Display for MetricKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Statistics reported for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyStats {
    #[serde(flatten)]
    pub latency: LatencyStats,
    pub successes: u64,
    pub failures: u64,
    pub status_codes: BTreeMap<u16, u64>,
}

/// Platform-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_requests: u64,
    pub total_errors: u64,
    pub error_rate_percent: f64,
    pub trades_processed: u64,
    pub trades_total_value: f64,
    pub emails_sent: u64,
    pub auth_attempts: u64,
    pub auth_failure_rate_percent: f64,
}

/// Point-in-time view of everything the collector holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub uptime_seconds: f64,
    pub summary: SummaryStats,
    pub endpoints: BTreeMap<String, KeyStats>,
    pub services: BTreeMap<String, KeyStats>,
    /// Error counts keyed by `path:error_type`.
    pub errors: BTreeMap<String, u64>,
}

impl MetricsSnapshot {
    pub fn get(&self, key: &MetricKey) -> Option<&KeyStats> {
        match key.scope {
            MetricScope::Endpoint => self.endpoints.get(&key.name),
            MetricScope::Service => self.services.get(&key.name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty() && self.services.is_empty() && self.errors.is_empty()
    }
}

/// An error report kept for debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentError {
    pub error_id: CorrelationId,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub path: String,
    pub error_type: String,
}

#[derive(Debug)]
struct KeyState {
    window: RollingWindow,
    total: u64,
    successes: u64,
    failures: u64,
    status_codes: BTreeMap<u16, u64>,
}

impl KeyState {
    fn new(capacity: usize) -> Self {
        Self {
            window: RollingWindow::new(capacity),
            total: 0,
            successes: 0,
            failures: 0,
            status_codes: BTreeMap::new(),
        }
    }

    fn record_sample(&mut self, duration_ms: f64) {
        self.window.push(duration_ms);
        self.total += 1;
    }

    fn record_outcome(&mut self, success: bool) {
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    fn stats(&self) -> Option<KeyStats> {
        LatencyStats::from_window(self.total, &self.window).map(|latency| KeyStats {
            latency,
            successes: self.successes,
            failures: self.failures,
            status_codes: self.status_codes.clone(),
        })
    }
}

#[derive(Debug, Default)]
struct BusinessCounters {
    trades_processed: u64,
    trades_total_value: f64,
    emails_sent: u64,
    auth_attempts: u64,
    auth_failures: u64,
}

#[derive(Debug)]
struct MetricsInner {
    keys: HashMap<MetricKey, KeyState>,
    errors: BTreeMap<String, u64>,
    recent_errors: VecDeque<RecentError>,
    business: BusinessCounters,
    started_at: Instant,
}

impl MetricsInner {
    fn new() -> Self {
        Self {
            keys: HashMap::new(),
            errors: BTreeMap::new(),
            recent_errors: VecDeque::new(),
            business: BusinessCounters::default(),
            started_at: Instant::now(),
        }
    }

    fn key_mut(&mut self, key: &MetricKey, capacity: usize) -> &mut KeyState {
        self.keys
            .entry(key.clone())
            .or_insert_with(|| KeyState::new(capacity))
    }
}

/// Thread-safe in-memory latency and counter store.
///
/// One mutex covers every window and counter, and [`snapshot`](Self::snapshot)
/// holds it for the whole computation. Durations are stored as given,
/// negative values included.
#[derive(Debug)]
pub struct MetricsCollector {
    config: MetricsConfig,
    inner: Mutex<MetricsInner>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(MetricsConfig::default())
    }
}

impl MetricsCollector {
    pub fn new(config: MetricsConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(MetricsInner::new()),
        }
    }

    pub fn config(&self) -> MetricsConfig {
        self.config
    }

    /// Append a duration to the key's rolling window and bump its total.
    pub fn record_sample(&self, key: &MetricKey, duration_ms: f64) {
        let mut inner = self.lock();
        inner
            .key_mut(key, self.config.window_capacity)
            .record_sample(duration_ms);
    }

    pub fn record_outcome(&self, key: &MetricKey, success: bool) {
        let mut inner = self.lock();
        inner
            .key_mut(key, self.config.window_capacity)
            .record_outcome(success);
    }

    /// Record a served request; responses with status >= 500 count as failures.
    pub fn record_request(&self, method: &str, path: &str, status_code: u16, duration_ms: f64) {
        let key = MetricKey::endpoint(method, path);
        let mut inner = self.lock();
        let state = inner.key_mut(&key, self.config.window_capacity);
        state.record_sample(duration_ms);
        state.record_outcome(status_code < 500);
        *state.status_codes.entry(status_code).or_default() += 1;
    }

    pub fn record_service_call(
        &self,
        service: &str,
        operation: &str,
        duration_ms: f64,
        success: bool,
    ) {
        let key = MetricKey::service(service, operation);
        let mut inner = self.lock();
        let state = inner.key_mut(&key, self.config.window_capacity);
        state.record_sample(duration_ms);
        state.record_outcome(success);
    }

    /// Count an error by path and type and keep it in the recent error log.
    pub fn record_error(&self, path: &str, error_type: &str) -> CorrelationId {
        let error_id = CorrelationId::new();
        warn!(%error_id, path, error_type, "recorded error");

        let mut inner = self.lock();
        *inner.errors.entry(format!("{path}:{error_type}")).or_default() += 1;
        if self.config.recent_error_capacity > 0 {
            if inner.recent_errors.len() == self.config.recent_error_capacity {
                inner.recent_errors.pop_front();
            }
            inner.recent_errors.push_back(RecentError {
                error_id: error_id.clone(),
                timestamp: OffsetDateTime::now_utc(),
                path: path.to_owned(),
                error_type: error_type.to_owned(),
            });
        }
        error_id
    }

    pub fn record_trade(&self, value: f64) {
        let mut inner = self.lock();
        inner.business.trades_processed += 1;
        inner.business.trades_total_value += value;
    }

    pub fn record_email_sent(&self) {
        self.lock().business.emails_sent += 1;
    }

    pub fn record_auth_attempt(&self, success: bool) {
        let mut inner = self.lock();
        inner.business.auth_attempts += 1;
        if !success {
            inner.business.auth_failures += 1;
        }
    }

    /// Recent errors, oldest first.
    pub fn recent_errors(&self) -> Vec<RecentError> {
        self.lock().recent_errors.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.lock();

        let mut endpoints = BTreeMap::new();
        let mut services = BTreeMap::new();
        let mut total_requests = 0;
        let mut total_errors = 0;

        for (key, state) in &inner.keys {
            if key.scope == MetricScope::Endpoint {
                total_requests += state.successes + state.failures;
                total_errors += state.failures;
            }
            let Some(stats) = state.stats() else {
                continue;
            };
            match key.scope {
                MetricScope::Endpoint => endpoints.insert(key.name.clone(), stats),
                MetricScope::Service => services.insert(key.name.clone(), stats),
            };
        }

        let business = &inner.business;
        MetricsSnapshot {
            uptime_seconds: inner.started_at.elapsed().as_secs_f64(),
            summary: SummaryStats {
                total_requests,
                total_errors,
                error_rate_percent: rate_percent(total_errors, total_requests),
                trades_processed: business.trades_processed,
                trades_total_value: business.trades_total_value,
                emails_sent: business.emails_sent,
                auth_attempts: business.auth_attempts,
                auth_failure_rate_percent: rate_percent(
                    business.auth_failures,
                    business.auth_attempts,
                ),
            },
            endpoints,
            services,
            errors: inner.errors.clone(),
        }
    }

    /// Drop every window, counter and recent error, and restart the uptime clock.
    pub fn reset(&self) {
        *self.lock() = MetricsInner::new();
        info!("metrics reset");
    }

    fn lock(&self) -> MutexGuard<'_, MetricsInner> {
        self.inner.lock().expect("metrics lock is not poisoned")
    }
}

fn rate_percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
