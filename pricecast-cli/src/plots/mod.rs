//! PNG charts rendered with plotters.
//!
//! Every chart takes its data and an output path and writes one PNG. The
//! x axis of date-based charts is the row index; tick labels are mapped back
//! to dates so gaps (weekends, holidays) do not show as empty space.

pub mod candles;
pub mod confusion;
pub mod importance;
pub mod overlay;

pub use candles::draw_candles;
pub use confusion::draw_confusion;
pub use importance::draw_importance;
pub use overlay::draw_overlay;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub type PlotResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub(crate) const SIZE: (u32, u32) = (1280, 720);

/// `<dir>/<name>.png`, creating `dir` if needed.
pub fn png_path(dir: &Path, name: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.join(format!("{name}.png")))
}

/// Tick label for row `idx` of `dates`.
pub(crate) fn date_label(dates: &[NaiveDate], idx: usize) -> String {
    dates
        .get(idx)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Min and max of the finite values, padded by 5% of the span.
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(hi.abs() * 0.01).max(1e-9);
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_skips_nan() {
        let (lo, hi) = padded_range([f64::NAN, 10.0, 20.0]);
        assert!(lo < 10.0 && lo > 9.0);
        assert!(hi > 20.0 && hi < 21.0);
    }

    #[test]
    fn padded_range_of_nothing() {
        assert_eq!(padded_range([]), (0.0, 1.0));
        assert_eq!(padded_range([f64::NAN]), (0.0, 1.0));
    }

    #[test]
    fn flat_series_still_has_height() {
        let (lo, hi) = padded_range([5.0, 5.0]);
        assert!(hi > lo);
    }

    #[test]
    fn date_label_out_of_range_is_blank() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(date_label(&[d], 0), "2024-01-02");
        assert_eq!(date_label(&[d], 3), "");
    }
}
