//! Deterministic synthetic price series.
//!
//! Developer-only data for offline runs, tests and benches. A linear
//! congruential generator drives a multiplicative random walk, so the same
//! seed always yields the same bars. Two series built with a shared `market`
//! seed move together, which gives the rolling correlation something to find.

use crate::domain::{Bar, PriceSeries};
use chrono::{Datelike, NaiveDate, Weekday};

/// Parameters for a synthetic series.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSpec {
    pub start: NaiveDate,
    pub days: usize,
    pub start_price: f64,
    /// Seed of the shared market component.
    pub market_seed: u64,
    /// Seed of the instrument's own component.
    pub idio_seed: u64,
    /// Weight of the market component in daily returns (0..=1).
    pub beta: f64,
    /// Whether bars carry an adjusted close.
    pub adjusted: bool,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2015, 1, 2).unwrap_or(NaiveDate::MIN),
            days: 2520,
            start_price: 100.0,
            market_seed: 7,
            idio_seed: 11,
            beta: 0.7,
            adjusted: true,
        }
    }
}

struct Lcg(u64);

impl Lcg {
    /// Uniform value in [-1, 1).
    fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }
}

/// Build `spec.days` weekday bars starting at `spec.start`.
pub fn synthetic_series(symbol: &str, spec: SyntheticSpec) -> PriceSeries {
    let mut market = Lcg(spec.market_seed);
    let mut idio = Lcg(spec.idio_seed);
    let mut bars = Vec::with_capacity(spec.days);
    let mut date = spec.start;
    let mut close = spec.start_price;

    while bars.len() < spec.days {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            date = date.succ_opt().unwrap_or(date);
            continue;
        }

        let ret = 0.02 * (spec.beta * market.next_unit() + (1.0 - spec.beta) * idio.next_unit())
            + 0.0003;
        let open = close;
        close = (close * (1.0 + ret)).max(1.0);
        let spread = close * 0.01 * (1.0 + idio.next_unit().abs());

        bars.push(Bar {
            date,
            open,
            high: open.max(close) + spread,
            low: (open.min(close) - spread).max(0.5),
            close,
            adj_close: spec.adjusted.then_some(close * 0.98),
            volume: 1_000_000 + (market.next_unit().abs() * 500_000.0) as u64,
        });

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    PriceSeries::new(symbol, bars)
}

/// A correlated target/factor pair sharing the same market seed.
pub fn synthetic_pair(target: &str, factor: &str, days: usize) -> (PriceSeries, PriceSeries) {
    let base = SyntheticSpec {
        days,
        ..SyntheticSpec::default()
    };
    let t = synthetic_series(target, base);
    let f = synthetic_series(
        factor,
        SyntheticSpec {
            idio_seed: 23,
            beta: 0.85,
            start_price: 250.0,
            adjusted: false,
            ..base
        },
    );
    (t, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize::is_strictly_increasing;

    #[test]
    fn same_seed_same_series() {
        let a = synthetic_series("A", SyntheticSpec::default());
        let b = synthetic_series("A", SyntheticSpec::default());
        assert_eq!(a, b);
    }

    #[test]
    fn produces_sane_weekday_bars() {
        let spec = SyntheticSpec {
            days: 300,
            ..Default::default()
        };
        let series = synthetic_series("A", spec);
        assert_eq!(series.len(), 300);
        assert!(is_strictly_increasing(&series.bars));
        for bar in &series.bars {
            assert!(bar.is_sane(), "insane bar on {}", bar.date);
            assert!(!matches!(bar.date.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn pair_shares_calendar() {
        let (t, f) = synthetic_pair("AAPL", "SMH", 100);
        assert_eq!(t.dates(), f.dates());
        assert!(t.has_adj_close());
        assert!(!f.has_adj_close());
    }
}
