//! # TradeSim Core
//!
//! Market simulation and hand-rolled metrics for the TradeSim demo trading
//! platform.
//!
//! ## Overview
//!
//! - **Price simulator**: back-fills a daily OHLCV history per instrument that
//!   drifts from a seed price toward the configured price, then moves each
//!   instrument once per tick with trend plus Gaussian noise
//! - **Metrics aggregator**: rolling latency windows, nearest-rank
//!   percentiles, outcome counters and business counters behind one lock
//! - **Correlation IDs** for tying error reports to log lines
//!
//! Both components are synchronous, in-memory and `Send + Sync`; share them
//! across request handlers with an `Arc`.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Simulator and metrics settings, environment overrides |
//! | [`correlation`] | Short request/error identifiers |
//! | [`domain`] | Symbols, instrument configs, price points and series |
//! | [`error`] | Validation errors |
//! | [`market`] | Price path generation and the market simulator |
//! | [`metrics`] | Metrics collector, rolling windows, percentile math |
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tradesim_core::{
//!     MarketSimulator, MetricsCollector, MetricsConfig, SimulatorConfig, Symbol,
//! };
//!
//! let market = Arc::new(MarketSimulator::with_default_catalog(SimulatorConfig::default())?);
//! let metrics = Arc::new(MetricsCollector::new(MetricsConfig::default()));
//!
//! let stopwatch = tradesim_core::metrics::Stopwatch::start();
//! market.tick();
//! metrics.record_service_call("MarketService", "tick", stopwatch.elapsed_ms(), true);
//!
//! let price = market.current_price(&Symbol::parse("DDOG")?);
//! assert!(price.is_some_and(|p| p >= 1.0));
//! # Ok::<(), tradesim_core::ValidationError>(())
//! ```
//!
//! ## Logging
//!
//! Events are emitted through `tracing`; installing a subscriber is left to
//! the embedding application.

pub mod config;
pub mod correlation;
pub mod domain;
pub mod error;
pub mod market;
pub mod metrics;

pub use config::{MetricsConfig, SimulatorConfig};
pub use correlation::CorrelationId;
pub use domain::{InstrumentConfig, PricePoint, PriceSeries, Symbol};
pub use error::ValidationError;
pub use market::{
    default_instruments, InstrumentDetail, InstrumentQuote, MarketHealth, MarketSimulator,
    MarketSummary,
};
pub use metrics::{KeyStats, MetricKey, MetricScope, MetricsCollector, MetricsSnapshot};
