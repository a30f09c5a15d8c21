//! Runtime configuration for the simulator and the metrics collector.
//!
//! Values default to the demo settings and can be overridden from the
//! environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `TRADESIM_LOOKBACK_DAYS` | [`SimulatorConfig::lookback_periods`] |
//! | `TRADESIM_PRICE_FLOOR` | [`SimulatorConfig::price_floor`] |
//! | `TRADESIM_SEED` | [`SimulatorConfig::seed`] |
//! | `TRADESIM_METRICS_WINDOW` | [`MetricsConfig::window_capacity`] |
//! | `TRADESIM_RECENT_ERRORS` | [`MetricsConfig::recent_error_capacity`] |

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Price simulator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Number of daily points generated at startup.
    pub lookback_periods: usize,
    /// Lowest price any generated or ticked value may take.
    pub price_floor: f64,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            lookback_periods: 90,
            price_floor: 1.0,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn with_lookback_periods(mut self, periods: usize) -> Self {
        self.lookback_periods = periods;
        self
    }

    pub fn with_price_floor(mut self, floor: f64) -> Self {
        self.price_floor = floor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Defaults overridden by any `TRADESIM_*` simulator variables that are set.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_vars(process_env)
    }

    /// Like [`from_env`](Self::from_env) reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(periods) = parse_var(&lookup, "TRADESIM_LOOKBACK_DAYS")? {
            config.lookback_periods = periods;
        }
        if let Some(floor) = parse_var(&lookup, "TRADESIM_PRICE_FLOOR")? {
            config.price_floor = floor;
        }
        if let Some(seed) = parse_var(&lookup, "TRADESIM_SEED")? {
            config.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lookback_periods == 0 {
            return Err(ValidationError::ZeroLookback);
        }
        if !self.price_floor.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                field: "price_floor",
            });
        }
        if self.price_floor <= 0.0 {
            return Err(ValidationError::NonPositiveValue {
                field: "price_floor",
            });
        }
        Ok(())
    }
}

/// Metrics collector settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Samples retained per key before the oldest is evicted.
    pub window_capacity: usize,
    /// Recent error records retained for debugging.
    pub recent_error_capacity: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            window_capacity: 1000,
            recent_error_capacity: 100,
        }
    }
}

impl MetricsConfig {
    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }

    pub fn with_recent_error_capacity(mut self, capacity: usize) -> Self {
        self.recent_error_capacity = capacity;
        self
    }

    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_vars(process_env)
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(capacity) = parse_var(&lookup, "TRADESIM_METRICS_WINDOW")? {
            config.window_capacity = capacity;
        }
        if let Some(capacity) = parse_var(&lookup, "TRADESIM_RECENT_ERRORS")? {
            config.recent_error_capacity = capacity;
        }
        config.validate()?;
        Ok(config)
    }

    /// A window must hold at least one sample. A zero error log is allowed
    /// and keeps no records.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.window_capacity == 0 {
            return Err(ValidationError::ZeroCapacity {
                field: "window_capacity",
            });
        }
        Ok(())
    }
}

fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ValidationError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::InvalidEnvValue { name, value: raw })
}
