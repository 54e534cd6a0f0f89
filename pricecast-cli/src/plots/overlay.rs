//! Prediction overlay: target price across the test window with one marker
//! per row showing how the model's call compared with what happened.
//!
//! Up markers where the model predicted a rise, down markers where it did
//! not; green/blue when right, yellow/red when wrong.

use super::{date_label, padded_range, PlotResult, SIZE};
use chrono::NaiveDate;
use plotters::prelude::*;
use std::path::Path;

/// Outcome of one prediction against the realised label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TruePositive,
    TrueNegative,
    FalsePositive,
    FalseNegative,
}

impl Outcome {
    pub fn classify(actual: u8, predicted: u8) -> Self {
        match (actual, predicted) {
            (1, 1) => Outcome::TruePositive,
            (0, 0) => Outcome::TrueNegative,
            (0, _) => Outcome::FalsePositive,
            _ => Outcome::FalseNegative,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Outcome::TruePositive => "Rise predicted, rose",
            Outcome::TrueNegative => "No rise predicted, no rise",
            Outcome::FalsePositive => "Rise predicted, no rise",
            Outcome::FalseNegative => "No rise predicted, rose",
        }
    }

    fn color(self) -> RGBColor {
        match self {
            Outcome::TruePositive => GREEN,
            Outcome::TrueNegative => BLUE,
            Outcome::FalsePositive => YELLOW,
            Outcome::FalseNegative => RED,
        }
    }

    fn points_up(self) -> bool {
        matches!(self, Outcome::TruePositive | Outcome::FalsePositive)
    }
}

/// Input rows for the overlay, aligned by index.
pub struct OverlayData<'a> {
    pub dates: &'a [NaiveDate],
    pub prices: &'a [f64],
    pub actual: &'a [u8],
    pub predicted: &'a [u8],
}

const MARKER: i32 = 6;

pub fn draw_overlay(
    data: &OverlayData<'_>,
    symbol: &str,
    horizon: usize,
    path: &Path,
) -> PlotResult {
    let n = data.prices.len();
    if n == 0 {
        return Err("no test rows to chart".into());
    }
    let outcomes: Vec<Outcome> = data
        .actual
        .iter()
        .zip(data.predicted)
        .map(|(&a, &p)| Outcome::classify(a, p))
        .collect();

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (lo, hi) = padded_range(data.prices.iter().copied());
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{symbol} - {horizon}-day predictions on the test window"),
            ("sans-serif", 28).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..n, lo..hi)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|i| date_label(data.dates, *i))
        .y_desc("Price")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            data.prices.iter().enumerate().map(|(i, p)| (i, *p)),
            &BLACK,
        ))?
        .label("Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));

    for outcome in [
        Outcome::TruePositive,
        Outcome::TrueNegative,
        Outcome::FalsePositive,
        Outcome::FalseNegative,
    ] {
        let color = outcome.color();
        let points: Vec<(usize, f64)> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| **o == outcome)
            .map(|(i, _)| (i, data.prices[i]))
            .collect();

        if outcome.points_up() {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&c| TriangleMarker::new(c, MARKER, color.filled())),
                )?
                .label(outcome.label())
                .legend(move |(x, y)| TriangleMarker::new((x, y), MARKER, color.filled()));
        } else {
            chart
                .draw_series(points.iter().map(|&c| {
                    EmptyElement::at(c)
                        + Polygon::new(
                            vec![(-MARKER, -MARKER / 2), (MARKER, -MARKER / 2), (0, MARKER)],
                            color.filled(),
                        )
                }))?
                .label(outcome.label())
                .legend(move |(x, y)| {
                    Polygon::new(
                        vec![
                            (x - MARKER, y - MARKER / 2),
                            (x + MARKER, y - MARKER / 2),
                            (x, y + MARKER),
                        ],
                        color.filled(),
                    )
                });
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    tracing::info!(path = %path.display(), "prediction overlay written");
    Ok(())
}
