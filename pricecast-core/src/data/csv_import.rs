//! CSV import provider for offline use.
//!
//! Reads `<dir>/<SYMBOL>.csv` files in the layout most download tools export:
//! `Date,Open,High,Low,Close,Adj Close,Volume`. `Adj Close` is optional. Dates
//! may carry a time and zone suffix (`2024-01-02 00:00:00-05:00`); only the
//! calendar date is kept.
//!
//! Descriptive info is read from an optional `<dir>/<SYMBOL>.json` holding a
//! serialized `TickerInfo`.

use super::normalize::normalize_bars;
use super::provider::{DataError, DataProvider, Lookback};
use crate::domain::{Bar, PriceSeries, TickerInfo};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", alias = "date")]
    date: String,
    #[serde(rename = "Open", alias = "open")]
    open: f64,
    #[serde(rename = "High", alias = "high")]
    high: f64,
    #[serde(rename = "Low", alias = "low")]
    low: f64,
    #[serde(rename = "Close", alias = "close")]
    close: f64,
    #[serde(rename = "Adj Close", alias = "adj_close", default)]
    adj_close: Option<f64>,
    #[serde(rename = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

/// Provider backed by a directory of per-symbol CSV files.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    fn info_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.json"))
    }

    /// Read every bar in a CSV file, normalized.
    pub fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
        let io_err = |reason: String| DataError::Io {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = csv::Reader::from_path(path).map_err(|e| io_err(e.to_string()))?;
        let mut bars = Vec::new();

        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| DataError::Parse(format!("{}: {e}", path.display())))?;
            let date = parse_date(&row.date).ok_or_else(|| {
                DataError::Parse(format!(
                    "{}: bad date '{}' on row {}",
                    path.display(),
                    row.date,
                    line + 1
                ))
            })?;
            bars.push(Bar {
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                adj_close: row.adj_close.filter(|v| v.is_finite()),
                volume: row.volume.map_or(0, |v| v.max(0.0) as u64),
            });
        }

        Ok(normalize_bars(bars))
    }
}

/// Keep the calendar date of `2024-01-02`, `2024-01-02 00:00:00-05:00` or
/// `2024-01-02T00:00:00Z`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    /// The window ends at the file's last bar rather than today, so stale
    /// exports still yield a full lookback.
    fn fetch(&self, symbol: &str, lookback: Lookback) -> Result<PriceSeries, DataError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let mut bars = Self::read_bars(&path)?;
        let Some(last) = bars.last().map(|b| b.date) else {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        };
        let start = lookback.start_from(last);
        bars.retain(|b| b.date >= start);

        Ok(PriceSeries::new(symbol, bars))
    }

    fn info(&self, symbol: &str) -> Result<TickerInfo, DataError> {
        let path = self.info_path(symbol);
        if !path.exists() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|e| DataError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content)
            .map_err(|e| DataError::Parse(format!("{}: {e}", path.display())))
    }
}
