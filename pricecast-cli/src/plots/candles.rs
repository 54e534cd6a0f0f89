//! Candlestick chart with SMA 20/50 overlays and a volume panel.

use super::{date_label, padded_range, PlotResult, SIZE};
use plotters::prelude::*;
use pricecast_core::domain::PriceSeries;
use pricecast_core::window::rolling_mean;
use std::path::Path;

const SMA_FAST: usize = 20;
const SMA_SLOW: usize = 50;

/// Draw the last `days` calendar days of `series` to `path`.
///
/// Moving averages are computed over the whole series so the first visible
/// candles already carry a value.
pub fn draw_candles(series: &PriceSeries, days: i64, path: &Path) -> PlotResult {
    let visible = series.recent(days);
    if visible.is_empty() {
        return Err(format!("no bars to chart for {}", series.symbol).into());
    }
    let offset = series.len() - visible.len();

    let closes: Vec<f64> = series.bars.iter().map(|b| b.close).collect();
    let sma_fast = rolling_mean(&closes, SMA_FAST);
    let sma_slow = rolling_mean(&closes, SMA_SLOW);
    let dates: Vec<_> = visible.iter().map(|b| b.date).collect();
    let n = visible.len();

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically((SIZE.1 * 3 / 4) as i32);

    let (lo, hi) = padded_range(
        visible
            .iter()
            .flat_map(|b| [b.low, b.high])
            .chain(sma_fast[offset..].iter().copied())
            .chain(sma_slow[offset..].iter().copied()),
    );

    let mut chart = ChartBuilder::on(&upper)
        .caption(
            format!("{} - last {days} days", series.symbol),
            ("sans-serif", 28).into_font(),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..n, lo..hi)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|i| date_label(&dates, *i))
        .y_desc("Price")
        .draw()?;

    chart.draw_series(visible.iter().enumerate().map(|(i, b)| {
        CandleStick::new(i, b.open, b.high, b.low, b.close, GREEN.filled(), RED.filled(), 4)
    }))?;

    for (values, color, label) in [
        (&sma_fast, BLUE, "SMA 20"),
        (&sma_slow, MAGENTA, "SMA 50"),
    ] {
        chart
            .draw_series(LineSeries::new(
                values[offset..]
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.is_finite())
                    .map(|(i, v)| (i, *v)),
                &color,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    let max_volume = visible.iter().map(|b| b.volume).max().unwrap_or(0).max(1) as f64;
    let mut volume = ChartBuilder::on(&lower)
        .margin(10)
        .x_label_area_size(20)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..n, 0.0..max_volume * 1.05)?;

    volume
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_labels(3)
        .y_desc("Volume")
        .draw()?;

    volume.draw_series(visible.iter().enumerate().map(|(i, b)| {
        let color = if b.close >= b.open { GREEN } else { RED };
        Rectangle::new([(i, 0.0), (i + 1, b.volume as f64)], color.mix(0.6).filled())
    }))?;

    root.present()?;
    tracing::info!(symbol = %series.symbol, path = %path.display(), "candlestick chart written");
    Ok(())
}
