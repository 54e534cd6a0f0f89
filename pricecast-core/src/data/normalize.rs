//! Daily date normalization.
//!
//! Providers hand back bars keyed by exchange timestamps or CSV dates in
//! whatever order they arrive. Everything downstream joins on plain dates, so
//! every provider funnels its output through here:
//! - timestamps become local exchange dates (time of day and zone dropped)
//! - bars are sorted by date
//! - duplicate dates collapse to the last quote seen
//! - bars failing the OHLC sanity check (`Bar::is_sane`) are dropped

use crate::domain::Bar;
use chrono::{DateTime, NaiveDate};

/// Convert a UNIX timestamp to the exchange-local calendar date.
///
/// `gmt_offset_secs` is the exchange's offset from UTC (e.g. -14400 for New
/// York in summer). Without it a late-evening UTC stamp could roll over into
/// the next day.
pub fn exchange_date(timestamp: i64, gmt_offset_secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmt_offset_secs, 0).map(|dt| dt.naive_utc().date())
}

/// Sort, de-duplicate and clean a batch of bars.
pub fn normalize_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    let before = bars.len();
    bars.retain(Bar::is_sane);
    if bars.len() < before {
        tracing::debug!(dropped = before - bars.len(), "dropped insane bars");
    }
    // Stable sort keeps arrival order within a date, so the last one wins below.
    bars.sort_by_key(|b| b.date);

    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => out.push(bar),
        }
    }
    out
}

/// True if dates are strictly increasing.
pub fn is_strictly_increasing(bars: &[Bar]) -> bool {
    bars.windows(2).all(|w| w[0].date < w[1].date)
}
