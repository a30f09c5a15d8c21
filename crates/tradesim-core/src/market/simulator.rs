use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use super::catalog::default_instruments;
use super::path::{advance, InstrumentState};
use crate::{InstrumentConfig, PricePoint, SimulatorConfig, Symbol, ValidationError};

const SUMMARY_MOVERS: usize = 3;

/// Current price and performance of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentQuote {
    pub symbol: Symbol,
    pub name: String,
    pub sector: String,
    pub description: String,
    pub price: f64,
    /// Change against the close of the previous period.
    pub daily_change: f64,
    pub daily_change_pct: f64,
    /// Change against the open of the first period in the series.
    pub total_change: f64,
    pub total_change_pct: f64,
}

/// Quote plus statistics over the whole retained series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentDetail {
    #[serde(flatten)]
    pub quote: InstrumentQuote,
    pub volatility: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub average_volume: u64,
}

/// Advancers and decliners ranked by daily change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub top_gainers: Vec<InstrumentQuote>,
    pub top_losers: Vec<InstrumentQuote>,
    pub total_instruments: usize,
    pub advancing: usize,
    pub declining: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketHealth {
    pub instruments: usize,
    pub tick_count: u64,
}

#[derive(Debug)]
struct MarketInner {
    instruments: BTreeMap<Symbol, InstrumentState>,
    rng: StdRng,
    tick_count: u64,
}

/// Thread-safe market of simulated instruments.
///
/// All state sits behind one mutex, so ticks are serialized and readers
/// never observe a half-applied tick.
#[derive(Debug)]
pub struct MarketSimulator {
    config: SimulatorConfig,
    inner: Mutex<MarketInner>,
}

impl MarketSimulator {
    /// Validate `instruments` and generate their history up to today (UTC).
    pub fn new(
        instruments: Vec<InstrumentConfig>,
        config: SimulatorConfig,
    ) -> Result<Self, ValidationError> {
        Self::new_at(instruments, config, today_utc())
    }

    /// Simulator over the built-in twelve-instrument catalog.
    pub fn with_default_catalog(config: SimulatorConfig) -> Result<Self, ValidationError> {
        Self::new(default_instruments()?, config)
    }

    /// Like [`MarketSimulator::new`] with an explicit current date.
    pub fn new_at(
        instruments: Vec<InstrumentConfig>,
        config: SimulatorConfig,
        today: Date,
    ) -> Result<Self, ValidationError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(instruments, config, today, rng)
    }

    /// Like [`MarketSimulator::new_at`] driven by a caller-supplied RNG.
    ///
    /// `config.seed` is ignored; the same `rng` state always yields the same
    /// history and ticks.
    pub fn with_rng(
        instruments: Vec<InstrumentConfig>,
        config: SimulatorConfig,
        today: Date,
        mut rng: StdRng,
    ) -> Result<Self, ValidationError> {
        config.validate()?;

        let started = Instant::now();
        let mut states = BTreeMap::new();
        for instrument in instruments {
            instrument.validate()?;
            if states.contains_key(&instrument.symbol) {
                return Err(ValidationError::DuplicateSymbol {
                    symbol: instrument.symbol.to_string(),
                });
            }

            let symbol = instrument.symbol.clone();
            let start = instrument.history_start;
            let state = InstrumentState::initialize(
                instrument,
                config.lookback_periods,
                today,
                config.price_floor,
                &mut rng,
            )?;
            debug!(
                symbol = %symbol,
                start,
                end = state.current_price,
                change_pct = (state.current_price - start) / start * 100.0,
                periods = config.lookback_periods,
                "generated price history"
            );
            states.insert(symbol, state);
        }

        info!(
            instruments = states.len(),
            periods = config.lookback_periods,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "market initialized"
        );

        Ok(Self {
            config,
            inner: Mutex::new(MarketInner {
                instruments: states,
                rng,
                tick_count: 0,
            }),
        })
    }

    pub fn config(&self) -> SimulatorConfig {
        self.config
    }

    /// Advance every instrument once, dated today (UTC).
    pub fn tick(&self) -> u64 {
        self.tick_at(today_utc())
    }

    /// Advance every instrument once and return the new tick count.
    pub fn tick_at(&self, today: Date) -> u64 {
        let started = Instant::now();
        let mut inner = self.lock();
        let MarketInner {
            instruments,
            rng,
            tick_count,
        } = &mut *inner;

        *tick_count += 1;
        for state in instruments.values_mut() {
            advance(state, today, self.config.price_floor, rng);
        }

        debug!(
            tick = *tick_count,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "market tick completed"
        );
        *tick_count
    }

    pub fn current_price(&self, symbol: &Symbol) -> Option<f64> {
        self.lock()
            .instruments
            .get(symbol)
            .map(|state| state.current_price)
    }

    /// The most recent `days` points for `symbol`, oldest first.
    pub fn history(&self, symbol: &Symbol, days: usize) -> Option<Vec<PricePoint>> {
        self.lock()
            .instruments
            .get(symbol)
            .map(|state| state.series.tail(days).to_vec())
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.lock().instruments.keys().cloned().collect()
    }

    /// Quotes for every instrument, ordered by symbol.
    pub fn quotes(&self) -> Vec<InstrumentQuote> {
        self.lock().instruments.values().map(quote_for).collect()
    }

    pub fn stock(&self, symbol: &Symbol) -> Option<InstrumentDetail> {
        self.lock().instruments.get(symbol).map(detail_for)
    }

    pub fn market_summary(&self) -> MarketSummary {
        let quotes = self.quotes();
        let total_instruments = quotes.len();

        let mut gainers: Vec<InstrumentQuote> = quotes
            .iter()
            .filter(|quote| quote.daily_change > 0.0)
            .cloned()
            .collect();
        let mut losers: Vec<InstrumentQuote> = quotes
            .into_iter()
            .filter(|quote| quote.daily_change < 0.0)
            .collect();

        gainers.sort_by(|a, b| by_daily_pct(b, a));
        losers.sort_by(by_daily_pct);
        let advancing = gainers.len();
        let declining = losers.len();
        gainers.truncate(SUMMARY_MOVERS);
        losers.truncate(SUMMARY_MOVERS);

        MarketSummary {
            top_gainers: gainers,
            top_losers: losers,
            total_instruments,
            advancing,
            declining,
        }
    }

    pub fn health(&self) -> MarketHealth {
        let inner = self.lock();
        MarketHealth {
            instruments: inner.instruments.len(),
            tick_count: inner.tick_count,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MarketInner> {
        self.inner.lock().expect("market lock is not poisoned")
    }
}

fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

fn by_daily_pct(a: &InstrumentQuote, b: &InstrumentQuote) -> Ordering {
    a.daily_change_pct.total_cmp(&b.daily_change_pct)
}

fn quote_for(state: &InstrumentState) -> InstrumentQuote {
    let price = state.current_price;
    let (daily_change, daily_change_pct) = state
        .series
        .previous_close()
        .map_or((0.0, 0.0), |previous| change_from(previous, price));
    let (total_change, total_change_pct) = state
        .series
        .first()
        .map_or((0.0, 0.0), |first| change_from(first.open, price));

    InstrumentQuote {
        symbol: state.config.symbol.clone(),
        name: state.config.name.clone(),
        sector: state.config.sector.clone(),
        description: state.config.description.clone(),
        price,
        daily_change,
        daily_change_pct,
        total_change,
        total_change_pct,
    }
}

fn detail_for(state: &InstrumentState) -> InstrumentDetail {
    let points = state.series.points();
    let price = state.current_price;
    let period_high = points.iter().map(|p| p.high).fold(price, f64::max);
    let period_low = points.iter().map(|p| p.low).fold(price, f64::min);
    let average_volume = if points.is_empty() {
        0
    } else {
        points.iter().map(|p| p.volume).sum::<u64>() / points.len() as u64
    };

    InstrumentDetail {
        quote: quote_for(state),
        volatility: state.config.volatility,
        period_high,
        period_low,
        average_volume,
    }
}

fn change_from(reference: f64, price: f64) -> (f64, f64) {
    let change = price - reference;
    (change, change / reference * 100.0)
}
