//! Confusion-matrix heatmap, row-normalized.
//!
//! Rows are the actual class, columns the predicted class. Each cell shows
//! the share of its actual class and the raw count.

use super::{PlotResult, SIZE};
use plotters::prelude::*;
use pricecast_core::model::{ConfusionMatrix, CLASS_NAMES};
use std::path::Path;

/// White (0%) to deep blue (100%).
fn cell_color(share: f64) -> RGBColor {
    let s = share.clamp(0.0, 1.0);
    let fade = |full: f64| (255.0 - (255.0 - full) * s).round() as u8;
    RGBColor(fade(8.0), fade(48.0), fade(107.0))
}

pub fn draw_confusion(matrix: &ConfusionMatrix, horizon: usize, path: &Path) -> PlotResult {
    let shares = matrix.row_normalized();
    let side = SIZE.1;
    let root = BitMapBackend::new(path, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Confusion matrix - {horizon}-day model"),
            ("sans-serif", 28).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(110)
        .build_cartesian_2d((0usize..2).into_segmented(), (0usize..2).into_segmented())?;

    // Actual "no rise" is the top row.
    let row_of = |actual: usize| 1 - actual;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(2)
        .y_labels(2)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) if *i < 2 => format!("Predicted {}", CLASS_NAMES[*i]),
            _ => String::new(),
        })
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) if *i < 2 => format!("Actual {}", CLASS_NAMES[row_of(*i)]),
            _ => String::new(),
        })
        .draw()?;

    let cells: Vec<(usize, usize)> = (0..2).flat_map(|a| (0..2).map(move |p| (a, p))).collect();

    chart.draw_series(cells.iter().map(|&(actual, predicted)| {
        let y = row_of(actual);
        Rectangle::new(
            [
                (SegmentValue::Exact(predicted), SegmentValue::Exact(y)),
                (SegmentValue::Exact(predicted + 1), SegmentValue::Exact(y + 1)),
            ],
            cell_color(shares[actual][predicted]).filled(),
        )
    }))?;

    chart.draw_series(cells.iter().map(|&(actual, predicted)| {
        let share = shares[actual][predicted];
        let color = if share > 0.5 { WHITE } else { BLACK };
        Text::new(
            format!("{:.1}% ({})", share * 100.0, matrix.counts[actual][predicted]),
            (SegmentValue::CenterOf(predicted), SegmentValue::CenterOf(row_of(actual))),
            ("sans-serif", 26).into_font().color(&color),
        )
    }))?;

    root.present()?;
    tracing::info!(path = %path.display(), "confusion matrix written");
    Ok(())
}
