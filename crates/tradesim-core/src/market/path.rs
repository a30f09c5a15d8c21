//! Price path generation.
//!
//! [`generate_history`] back-fills a look-back window whose drift is solved
//! so the path ends near the configured base price, and [`advance`] moves an
//! instrument forward by one tick.

use rand::Rng;
use rand_distr::StandardNormal;
use time::{Date, Duration};

use crate::{InstrumentConfig, PricePoint, PriceSeries, ValidationError};

const BASE_VOLUME_MIN: u64 = 5_000_000;
const BASE_VOLUME_MAX: u64 = 15_000_000;
/// Extra volume per unit of absolute daily return.
const VOLUME_MOVE_FACTOR: f64 = 10.0;

/// Mutable per-instrument simulation state.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentState {
    pub config: InstrumentConfig,
    pub current_price: f64,
    pub series: PriceSeries,
}

impl InstrumentState {
    /// Generate the look-back history ending the day before `today`.
    pub fn initialize<R: Rng + ?Sized>(
        config: InstrumentConfig,
        lookback_periods: usize,
        today: Date,
        floor: f64,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        let series = generate_history(&config, lookback_periods, today, floor, rng)?;
        let current_price = series.last().map_or(config.base_price, |point| point.close);
        Ok(Self {
            config,
            current_price,
            series,
        })
    }
}

/// Back-fill `lookback_periods` daily points for `config`.
///
/// Point `i` is dated `today - (lookback_periods - i)` days. The caller must
/// have validated `config`; a non-positive `history_start` gives meaningless
/// prices. Fails when the first date would fall before [`Date::MIN`].
pub fn generate_history<R: Rng + ?Sized>(
    config: &InstrumentConfig,
    lookback_periods: usize,
    today: Date,
    floor: f64,
    rng: &mut R,
) -> Result<PriceSeries, ValidationError> {
    if lookback_periods == 0 {
        return Ok(PriceSeries::new(config.symbol.clone()));
    }
    let out_of_range = ValidationError::LookbackOutOfRange {
        periods: lookback_periods,
    };
    days_before(today, lookback_periods).ok_or_else(|| out_of_range.clone())?;

    let mut series = PriceSeries::with_capacity(config.symbol.clone(), lookback_periods);

    let total_return = (config.base_price - config.history_start) / config.history_start;
    let period_drift = total_return / lookback_periods as f64;
    let mut price = config.history_start.max(floor);

    for days_back in (1..=lookback_periods).rev() {
        let date = days_before(today, days_back).ok_or_else(|| out_of_range.clone())?;

        let period_return = period_drift + config.trend + noise(rng, 0.0, config.volatility);
        let next = (price * (1.0 + period_return)).max(floor);

        let open = price;
        let close = next;
        let intraday_range = (close - open).abs() + open * config.volatility * 0.5;
        let high = open.max(close) + rng.gen::<f64>() * intraday_range * 0.5;
        let low = (open.min(close) - rng.gen::<f64>() * intraday_range * 0.5).max(floor);

        let base_volume = rng.gen_range(BASE_VOLUME_MIN..=BASE_VOLUME_MAX) as f64;
        let volume = (base_volume * (1.0 + period_return.abs() * VOLUME_MOVE_FACTOR)) as u64;

        series.push(PricePoint::from_parts(date, open, high, low, close, volume));
        price = next;
    }

    Ok(series)
}

/// `today` minus `days`, or `None` when that leaves the supported date range.
pub(crate) fn days_before(today: Date, days: usize) -> Option<Date> {
    let seconds = i64::try_from(days).ok()?.checked_mul(86_400)?;
    today.checked_sub(Duration::seconds(seconds))
}

/// Apply one tick of trend plus noise to `state` and return the new price.
///
/// A latest point dated `today` or later is updated in place, so a clock
/// that steps backwards never reorders the series. Otherwise a new point
/// opening at the previous close is appended.
pub fn advance<R: Rng + ?Sized>(
    state: &mut InstrumentState,
    today: Date,
    floor: f64,
    rng: &mut R,
) -> f64 {
    let previous = state.current_price;
    let change = noise(rng, state.config.trend, state.config.volatility);
    let price = (previous * (1.0 + change)).max(floor);
    state.current_price = price;

    if let Some(point) = state.series.last_mut().filter(|point| point.date >= today) {
        point.update_close(price);
        return price;
    }

    let open = state.series.last().map_or(previous, |point| point.close);
    let volume = rng.gen_range(BASE_VOLUME_MIN..=BASE_VOLUME_MAX);
    state.series.push(PricePoint::from_parts(
        today,
        open,
        open.max(price),
        open.min(price),
        price,
        volume,
    ));

    price
}

fn noise<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std_dev * z
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use time::macros::date;

    use super::*;
    use crate::Symbol;

    fn config(volatility: f64, trend: f64) -> InstrumentConfig {
        InstrumentConfig::new(
            Symbol::parse("DDOG").expect("valid symbol"),
            135.0,
            volatility,
            trend,
            98.5,
        )
        .expect("valid config")
    }

    #[test]
    fn history_is_daily_and_ends_yesterday() {
        let mut rng = StdRng::seed_from_u64(11);
        let series = generate_history(&config(0.012, 0.004), 5, date!(2024 - 03 - 10), 1.0, &mut rng)
            .expect("history fits the date range");

        let dates: Vec<Date> = series.points().iter().map(|point| point.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 03 - 05),
                date!(2024 - 03 - 06),
                date!(2024 - 03 - 07),
                date!(2024 - 03 - 08),
                date!(2024 - 03 - 09),
            ]
        );
    }

    #[test]
    fn zero_volatility_without_trend_hits_target() {
        let mut rng = StdRng::seed_from_u64(3);
        let series = generate_history(&config(0.0, 0.0), 90, date!(2024 - 03 - 10), 1.0, &mut rng)
            .expect("history fits the date range");

        let close = series.last().expect("non-empty").close;
        let expected = 98.5 * (1.0 + (135.0 - 98.5) / 98.5 / 90.0_f64).powi(90);
        assert!((close - expected).abs() < 1e-6, "close={close}, expected={expected}");
        // Compounding the arithmetic drift overshoots slightly.
        assert!(close > 135.0 && close < 145.0);
    }

    #[test]
    fn opens_chain_from_previous_close() {
        let mut rng = StdRng::seed_from_u64(5);
        let series = generate_history(&config(0.03, 0.0), 30, date!(2024 - 03 - 10), 1.0, &mut rng)
            .expect("history fits the date range");

        assert_eq!(series.first().expect("non-empty").open, 98.5);
        for pair in series.points().windows(2) {
            assert_eq!(pair[1].open, pair[0].close);
        }
    }

    #[test]
    fn seed_below_floor_starts_at_floor() {
        let low_seed = InstrumentConfig::new(
            Symbol::parse("PENNY").expect("valid symbol"),
            2.0,
            0.05,
            0.0,
            0.25,
        )
        .expect("valid config");
        let mut rng = StdRng::seed_from_u64(9);
        let series = generate_history(&low_seed, 20, date!(2024 - 03 - 10), 1.0, &mut rng)
            .expect("history fits the date range");

        for point in series.points() {
            assert!(point.low >= 1.0);
            assert!(point.low <= point.open.min(point.close));
        }
    }

    #[test]
    fn tick_updates_same_day_point_in_place() {
        let mut rng = StdRng::seed_from_u64(21);
        let today = date!(2024 - 03 - 10);
        let mut state = InstrumentState::initialize(config(0.02, 0.0), 10, today, 1.0, &mut rng)
            .expect("history fits the date range");

        advance(&mut state, today, 1.0, &mut rng);
        assert_eq!(state.series.len(), 11);
        let opened = state.series.last().expect("non-empty").clone();
        assert_eq!(opened.date, today);
        assert_eq!(opened.open, state.series.previous_close().expect("has previous"));

        for _ in 0..25 {
            let price = advance(&mut state, today, 1.0, &mut rng);
            let latest = state.series.last().expect("non-empty");
            assert_eq!(latest.close, price);
            assert_eq!(latest.open, opened.open);
            assert!(latest.high >= opened.high && latest.low <= opened.low);
        }
        assert_eq!(state.series.len(), 11);
    }

    #[test]
    fn tick_on_new_day_appends_point() {
        let mut rng = StdRng::seed_from_u64(22);
        let today = date!(2024 - 03 - 10);
        let mut state = InstrumentState::initialize(config(0.02, 0.0), 3, today, 1.0, &mut rng)
            .expect("history fits the date range");

        advance(&mut state, today, 1.0, &mut rng);
        advance(&mut state, date!(2024 - 03 - 11), 1.0, &mut rng);

        let points = state.series.points();
        assert_eq!(points.len(), 5);
        assert_eq!(points[4].date, date!(2024 - 03 - 11));
        assert_eq!(points[4].open, points[3].close);
    }

    #[test]
    fn tick_respects_floor_under_crash() {
        let crash = InstrumentConfig::new(
            Symbol::parse("NEWR").expect("valid symbol"),
            1.5,
            0.4,
            -0.5,
            2.0,
        )
        .expect("valid config");
        let mut rng = StdRng::seed_from_u64(1);
        let today = date!(2024 - 03 - 10);
        let mut state = InstrumentState::initialize(crash, 5, today, 1.0, &mut rng)
            .expect("history fits the date range");

        for _ in 0..200 {
            assert!(advance(&mut state, today, 1.0, &mut rng) >= 1.0);
        }
        assert!(state.series.last().expect("non-empty").low >= 1.0);
    }

    #[test]
    fn tick_dated_before_latest_point_updates_it_in_place() {
        let mut rng = StdRng::seed_from_u64(23);
        let today = date!(2024 - 06 - 10);
        let mut state = InstrumentState::initialize(config(0.02, 0.0), 5, today, 1.0, &mut rng)
            .expect("history fits the date range");
        let latest_date = state.series.last().expect("non-empty").date;

        let price = advance(&mut state, date!(2024 - 06 - 01), 1.0, &mut rng);

        assert_eq!(state.series.len(), 5);
        let latest = state.series.last().expect("non-empty");
        assert_eq!(latest.date, latest_date);
        assert_eq!(latest.close, price);
        assert!(latest.low <= price && price <= latest.high);
        for pair in state.series.points().windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn lookback_before_earliest_date_is_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let today = date!(2024 - 06 - 10);
        let err = generate_history(&config(0.01, 0.0), 5_000_000, today, 1.0, &mut rng)
            .expect_err("history cannot start before Date::MIN");

        assert_eq!(err, ValidationError::LookbackOutOfRange { periods: 5_000_000 });
        assert_eq!(days_before(date!(2024 - 06 - 10), usize::MAX), None);
        assert_eq!(days_before(date!(2024 - 06 - 10), 9), Some(date!(2024 - 06 - 01)));
    }
}
