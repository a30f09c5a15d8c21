use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Symbol, ValidationError};

/// Static configuration of one simulated instrument.
///
/// `base_price` is the price the generated history converges on, and
/// `history_start` is the seed price at the beginning of the look-back window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: Symbol,
    pub name: String,
    pub sector: String,
    pub description: String,
    pub base_price: f64,
    /// Standard deviation of the per-period return.
    pub volatility: f64,
    /// Per-period drift added on top of the back-solved drift.
    pub trend: f64,
    pub history_start: f64,
}

impl InstrumentConfig {
    /// Build a validated instrument with empty display metadata.
    pub fn new(
        symbol: Symbol,
        base_price: f64,
        volatility: f64,
        trend: f64,
        history_start: f64,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            symbol,
            name: String::new(),
            sector: String::new(),
            description: String::new(),
            base_price,
            volatility,
            trend,
            history_start,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_metadata(
        mut self,
        name: impl Into<String>,
        sector: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.sector = sector.into();
        self.description = description.into();
        self
    }

    /// Check the numeric invariants the price generator relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_positive("base_price", self.base_price)?;
        validate_positive("history_start", self.history_start)?;
        validate_finite("trend", self.trend)?;
        validate_finite("volatility", self.volatility)?;
        if self.volatility < 0.0 {
            return Err(ValidationError::NegativeValue {
                field: "volatility",
            });
        }
        Ok(())
    }
}

/// One daily OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub change: f64,
    pub change_pct: f64,
}

impl PricePoint {
    pub fn new(
        date: Date,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_positive("open", open)?;
        validate_positive("high", high)?;
        validate_positive("low", low)?;
        validate_positive("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidPointRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidPointBounds);
        }

        Ok(Self::from_parts(date, open, high, low, close, volume))
    }

    /// Assemble a point whose bounds hold by construction.
    pub(crate) fn from_parts(
        date: Date,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        let change = close - open;
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            change,
            change_pct: change / open * 100.0,
        }
    }

    /// Move the close to `price`, widening the high/low range if needed.
    pub(crate) fn update_close(&mut self, price: f64) {
        self.close = price;
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.change = price - self.open;
        self.change_pct = self.change / self.open * 100.0;
    }
}

/// Chronological price history of a single instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol) -> Self {
        Self::with_capacity(symbol, 0)
    }

    pub fn with_capacity(symbol: Symbol, capacity: usize) -> Self {
        Self {
            symbol,
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The most recent `periods` points, or the whole series if shorter.
    pub fn tail(&self, periods: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(periods);
        &self.points[start..]
    }

    /// Close of the point before the latest one.
    pub fn previous_close(&self) -> Option<f64> {
        self.points
            .len()
            .checked_sub(2)
            .map(|index| self.points[index].close)
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut PricePoint> {
        self.points.last_mut()
    }

    pub(crate) fn push(&mut self, point: PricePoint) {
        debug_assert!(self.last().map_or(true, |last| last.date < point.date));
        self.points.push(point);
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn symbol() -> Symbol {
        Symbol::parse("DDOG").expect("valid symbol")
    }

    #[test]
    fn rejects_non_positive_seed_price() {
        let err = InstrumentConfig::new(symbol(), 135.0, 0.012, 0.004, 0.0).expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::NonPositiveValue {
                field: "history_start"
            }
        );
    }

    #[test]
    fn rejects_negative_volatility() {
        let err =
            InstrumentConfig::new(symbol(), 135.0, -0.1, 0.004, 98.5).expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { .. }));
    }

    #[test]
    fn rejects_invalid_point_bounds() {
        let err = PricePoint::new(date!(2024 - 01 - 02), 10.0, 12.0, 9.0, 12.5, 10)
            .expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidPointBounds);
    }

    #[test]
    fn update_close_widens_range_and_recomputes_change() {
        let mut point =
            PricePoint::new(date!(2024 - 01 - 02), 100.0, 102.0, 99.0, 101.0, 10).expect("valid");

        point.update_close(97.5);

        assert_eq!(point.low, 97.5);
        assert_eq!(point.high, 102.0);
        assert_eq!(point.change, -2.5);
        assert!((point.change_pct + 2.5).abs() < 1e-9);
    }

    #[test]
    fn tail_and_previous_close() {
        let mut series = PriceSeries::new(symbol());
        assert_eq!(series.previous_close(), None);
        series.push(PricePoint::from_parts(date!(2024 - 01 - 01), 10.0, 11.0, 9.0, 10.5, 1));
        series.push(PricePoint::from_parts(date!(2024 - 01 - 02), 10.5, 12.0, 10.0, 11.5, 1));

        assert_eq!(series.previous_close(), Some(10.5));
        assert_eq!(series.tail(1).len(), 1);
        assert_eq!(series.tail(1)[0].close, 11.5);
        assert_eq!(series.tail(30).len(), 2);
    }
}
