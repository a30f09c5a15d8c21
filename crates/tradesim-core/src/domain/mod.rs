//! # Domain Models
//!
//! Strongly-typed instruments and price history for the market simulator.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker |
//! | [`InstrumentConfig`] | Seed price, target price, drift and volatility |
//! | [`PricePoint`] | Daily OHLCV observation |
//! | [`PriceSeries`] | Chronological points for one instrument |
//!
//! Constructors validate their invariants and return [`ValidationError`](crate::ValidationError):
//!
//! ```rust
//! use tradesim_core::{InstrumentConfig, Symbol, ValidationError};
//!
//! let symbol = Symbol::parse("ddog").unwrap();
//! let invalid = InstrumentConfig::new(symbol, 135.0, 0.012, 0.004, -1.0);
//! assert!(matches!(invalid, Err(ValidationError::NonPositiveValue { .. })));
//! ```

mod models;
mod symbol;

pub use models::{InstrumentConfig, PricePoint, PriceSeries};
pub use symbol::Symbol;
