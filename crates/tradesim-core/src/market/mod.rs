//! # Market Simulation
//!
//! Random-walk price simulation for the demo instruments.
//!
//! Startup back-fills each instrument with a look-back window whose per-period
//! drift is solved from `history_start` to `base_price`, then adds the
//! instrument's `trend` and Gaussian noise with standard deviation
//! `volatility`. Each tick draws one more return from `Normal(trend,
//! volatility)` and either updates today's point or opens a new one.
//! Every price is floored at [`SimulatorConfig::price_floor`](crate::SimulatorConfig).
//!
//! ```rust
//! use tradesim_core::{MarketSimulator, SimulatorConfig, Symbol};
//!
//! let market = MarketSimulator::with_default_catalog(SimulatorConfig::default().with_seed(7))?;
//! let ddog = Symbol::parse("DDOG")?;
//!
//! market.tick();
//! let last_week = market.history(&ddog, 7).expect("DDOG is in the catalog");
//! assert_eq!(last_week.len(), 7);
//! # Ok::<(), tradesim_core::ValidationError>(())
//! ```

mod catalog;
mod path;
mod simulator;

pub use catalog::default_instruments;
pub use path::{advance, generate_history, InstrumentState};
pub use simulator::{
    InstrumentDetail, InstrumentQuote, MarketHealth, MarketSimulator, MarketSummary,
};
