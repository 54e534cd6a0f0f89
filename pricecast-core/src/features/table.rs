//! Feature table (X), label column (y) and the dataset bundling them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Date-indexed table of finite feature values, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            dates: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_features(&self) -> usize {
        self.columns.len()
    }

    pub fn push(&mut self, date: NaiveDate, row: Vec<f64>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.dates.push(date);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one named column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Row index of `date`, if present.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Copy of the rows in `range`, same columns.
    pub fn slice(&self, range: Range<usize>) -> FeatureTable {
        FeatureTable {
            columns: self.columns.clone(),
            dates: self.dates[range.clone()].to_vec(),
            rows: self.rows[range].to_vec(),
        }
    }

    pub fn last(&self) -> Option<(NaiveDate, &[f64])> {
        let date = *self.dates.last()?;
        self.rows.last().map(|r| (date, r.as_slice()))
    }
}

/// Binary labels aligned row-for-row with a `FeatureTable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelColumn {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<u8>,
}

impl LabelColumn {
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, date: NaiveDate, value: u8) {
        self.dates.push(date);
        self.values.push(value);
    }

    pub fn slice(&self, range: Range<usize>) -> LabelColumn {
        LabelColumn {
            dates: self.dates[range.clone()].to_vec(),
            values: self.values[range].to_vec(),
        }
    }

    /// Share of rows labelled 1.
    pub fn positive_rate(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().filter(|&&v| v == 1).count() as f64 / self.values.len() as f64
    }
}

/// Output of the feature pipeline for one horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub horizon: usize,
    /// Complete, labelled rows (X).
    pub features: FeatureTable,
    /// Labels for `features` (y).
    pub labels: LabelColumn,
    /// Complete feature rows whose forward window runs past the data; never
    /// part of X or y.
    pub pending: FeatureTable,
    /// Target close on each labelled row. Reference only; not a feature.
    pub target_close: Vec<f64>,
}

impl Dataset {
    /// True when no labelled row survived cleaning (insufficient history).
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Most recent complete feature row, labelled or not.
    pub fn latest_row(&self) -> Option<(NaiveDate, &[f64])> {
        self.pending.last().or_else(|| self.features.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn table(days: &[u32]) -> FeatureTable {
        let mut t = FeatureTable::empty(vec!["a".into(), "b".into()]);
        for &d in days {
            t.push(date(d), vec![d as f64, -(d as f64)]);
        }
        t
    }

    #[test]
    fn column_lookup() {
        let t = table(&[2, 3]);
        assert_eq!(t.column("b"), Some(vec![-2.0, -3.0]));
        assert_eq!(t.column("zzz"), None);
        assert_eq!(t.position(date(3)), Some(1));
    }

    #[test]
    fn slice_keeps_columns() {
        let t = table(&[2, 3, 4, 5]);
        let s = t.slice(1..3);
        assert_eq!(s.columns, t.columns);
        assert_eq!(s.dates, vec![date(3), date(4)]);
    }

    #[test]
    fn latest_row_prefers_pending() {
        let features = table(&[2, 3]);
        let mut labels = LabelColumn::empty();
        labels.push(date(2), 1);
        labels.push(date(3), 0);
        let ds = Dataset {
            horizon: 1,
            features: features.clone(),
            labels: labels.clone(),
            pending: table(&[4]),
            target_close: vec![10.0, 11.0],
        };
        assert_eq!(ds.latest_row().unwrap().0, date(4));

        let ds = Dataset {
            horizon: 1,
            features,
            labels,
            pending: table(&[]),
            target_close: vec![10.0, 11.0],
        };
        assert_eq!(ds.latest_row().unwrap().0, date(3));
    }

    #[test]
    fn positive_rate_counts_ones() {
        let mut labels = LabelColumn::empty();
        assert_eq!(labels.positive_rate(), 0.0);
        labels.push(date(2), 1);
        labels.push(date(3), 0);
        labels.push(date(4), 1);
        labels.push(date(5), 1);
        assert_eq!(labels.positive_rate(), 0.75);
    }
}
