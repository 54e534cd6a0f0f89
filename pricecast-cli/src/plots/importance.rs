//! Horizontal bar chart of per-feature importance (average split gain).

use super::{PlotResult, SIZE};
use plotters::prelude::*;
use std::path::Path;

/// Bars sorted so the most important feature is on top.
pub fn draw_importance(importance: &[(String, f64)], horizon: usize, path: &Path) -> PlotResult {
    if importance.is_empty() {
        return Err("no feature importance to chart".into());
    }
    let mut sorted = importance.to_vec();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
    let n = sorted.len();
    let max = sorted.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1e-9);

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Feature importance (gain) - {horizon}-day model"),
            ("sans-serif", 28).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(200)
        .build_cartesian_2d(0.0..max * 1.1, (0usize..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => sorted
                .get(*i)
                .map(|(name, _)| name.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Average gain")
        .draw()?;

    chart.draw_series(sorted.iter().enumerate().map(|(i, (_, gain))| {
        let mut bar = Rectangle::new(
            [(0.0, SegmentValue::Exact(i)), (*gain, SegmentValue::Exact(i + 1))],
            BLUE.mix(0.7).filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))?;

    root.present()?;
    tracing::info!(path = %path.display(), "importance chart written");
    Ok(())
}
