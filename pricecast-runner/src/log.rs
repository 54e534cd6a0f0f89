//! Append-only CSV log of prediction runs.
//!
//! Columns: `prediction_date`, `last_close_date`, `last_close_price`, then
//! `pred_{h}d` and `conf_{h}d` for every horizon in run order. The first
//! write creates the file (and its directory) with a header; later writes
//! append one row each.

use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("prediction log {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("prediction log {path}: existing header '{found}' does not match '{expected}'")]
    HeaderMismatch {
        path: String,
        expected: String,
        found: String,
    },
}

/// One horizon's verdict on the latest trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonPrediction {
    pub horizon: usize,
    pub class: u8,
    /// Probability of the predicted class, 0..=1.
    pub confidence: f64,
}

/// One row of the log.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub prediction_date: NaiveDate,
    pub last_close_date: NaiveDate,
    pub last_close_price: f64,
    pub horizons: Vec<HorizonPrediction>,
}

impl PredictionRecord {
    pub fn header(&self) -> Vec<String> {
        let mut cols = vec![
            "prediction_date".to_string(),
            "last_close_date".to_string(),
            "last_close_price".to_string(),
        ];
        for h in &self.horizons {
            cols.push(format!("pred_{}d", h.horizon));
            cols.push(format!("conf_{}d", h.horizon));
        }
        cols
    }

    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.prediction_date.format("%Y-%m-%d").to_string(),
            self.last_close_date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", self.last_close_price),
        ];
        for h in &self.horizons {
            fields.push(h.class.to_string());
            fields.push(format_confidence(h.confidence));
        }
        fields
    }
}

/// `0.5732` → `57.32%`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

#[derive(Debug, Clone)]
pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, e: impl std::fmt::Display) -> LogError {
        LogError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }

    /// First line of the existing log, if the file exists and is non-empty.
    fn existing_header(&self) -> Result<Option<String>, LogError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = std::fs::File::open(&self.path).map_err(|e| self.io_err(e))?;
        let mut first = String::new();
        BufReader::new(file)
            .read_line(&mut first)
            .map_err(|e| self.io_err(e))?;
        let first = first.trim_end().to_string();
        Ok((!first.is_empty()).then_some(first))
    }

    /// Append one record, writing the header first when the log is new.
    pub fn append(&self, record: &PredictionRecord) -> Result<(), LogError> {
        let header = record.header();
        let existing = self.existing_header()?;

        if let Some(found) = &existing {
            let expected = header.join(",");
            if *found != expected {
                return Err(LogError::HeaderMismatch {
                    path: self.path.display().to_string(),
                    expected,
                    found: found.clone(),
                });
            }
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if existing.is_none() {
            writer.write_record(&header).map_err(|e| self.io_err(e))?;
        }
        writer
            .write_record(record.fields())
            .map_err(|e| self.io_err(e))?;
        writer.flush().map_err(|e| self.io_err(e))?;

        tracing::info!(path = %self.path.display(), "prediction logged");
        Ok(())
    }
}
