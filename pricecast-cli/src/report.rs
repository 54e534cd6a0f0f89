//! Console printers shared by the menu and the one-shot commands.

use pricecast_core::domain::TickerInfo;
use pricecast_core::model::CLASS_NAMES;
use pricecast_runner::{format_confidence, LogOutcome, PredictionReport, TrainedModel};
use std::io::{self, Write};

fn class_name(class: u8) -> &'static str {
    CLASS_NAMES.get(class as usize).copied().unwrap_or("?")
}

pub fn write_training(out: &mut impl Write, model: &TrainedModel) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}-day model: {} training rows, {} hold-out rows, {} trees",
        model.horizon,
        model.train_rows,
        model.holdout.len(),
        model.classifier.num_trees()
    )?;
    writeln!(out, "{}", model.report)
}

pub fn write_prediction(out: &mut impl Write, report: &PredictionReport) -> io::Result<()> {
    let record = &report.record;
    writeln!(out)?;
    writeln!(
        out,
        "Prediction date {}  last close {} at {:.2}  (features from {})",
        record.prediction_date, record.last_close_date, record.last_close_price, report.feature_date
    )?;
    for p in &record.horizons {
        let accuracy = report
            .accuracies
            .iter()
            .find(|(h, _)| *h == p.horizon)
            .map(|(_, a)| format!("  hold-out accuracy {:.1}%", a * 100.0))
            .unwrap_or_default();
        writeln!(
            out,
            "  {:>3}d: {:<8} confidence {}{accuracy}",
            p.horizon,
            class_name(p.class),
            format_confidence(p.confidence)
        )?;
    }
    match &report.log_outcome {
        LogOutcome::Written(path) => writeln!(out, "Logged to {}", path.display()),
        LogOutcome::Failed(reason) => writeln!(out, "Prediction not logged: {reason}"),
    }
}

pub fn write_info(out: &mut impl Write, info: &TickerInfo) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", info.symbol)?;
    let fields = info.fields();
    if fields.is_empty() {
        return writeln!(out, "  (no details available)");
    }
    for (label, value) in fields {
        writeln!(out, "  {label:<12} {value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lists_populated_fields() {
        let info = TickerInfo {
            symbol: "AAPL".into(),
            long_name: Some("Apple Inc.".into()),
            sector: Some("Technology".into()),
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_info(&mut buf, &info).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("AAPL"));
        assert!(text.contains("Apple Inc."));
        assert!(text.contains("Technology"));
        assert!(!text.contains("Exchange"));
    }

    #[test]
    fn info_without_details() {
        let info = TickerInfo {
            symbol: "XYZ".into(),
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_info(&mut buf, &info).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("no details"));
    }

    #[test]
    fn unknown_class_has_placeholder_name() {
        assert_eq!(class_name(1), "Rise");
        assert_eq!(class_name(7), "?");
    }
}
