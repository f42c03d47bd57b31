//! Sweep and rate-distribution plots.

use std::error::Error;
use std::path::Path;

use domeff_core::SweepReport;
use plotters::prelude::*;

/// Mean corrected intensity rate against the detection threshold, with the
/// low-loss control mean as a horizontal reference.
pub fn sweep_plot(report: &SweepReport, path: &Path) -> Result<(), Box<dyn Error>> {
    let points: Vec<(f64, f64)> = report
        .points
        .iter()
        .filter(|p| p.mean.is_finite())
        .map(|p| (p.threshold, p.mean))
        .collect();
    if points.is_empty() {
        return Ok(());
    }

    let x_min = points[0].0;
    let x_max = points[points.len() - 1].0;
    let mut y_max = points.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    if report.low_loss_mean.is_finite() {
        y_max = y_max.max(report.low_loss_mean);
    }
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Mean intensity rate vs detection threshold",
            ("sans-serif", 24),
        )
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;
    chart
        .configure_mesh()
        .x_desc("threshold factor")
        .y_desc("mean intensity rate")
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))?
        .label("windowed sample")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLUE));
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
    )?;

    if report.low_loss_mean.is_finite() {
        let m = report.low_loss_mean;
        chart
            .draw_series(LineSeries::new([(x_min, m), (x_max, m)], &RED))?
            .label("low-loss control")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Histogram of per-track intensity rates.
pub fn rate_histogram(rates: &[f64], title: &str, path: &Path) -> Result<(), Box<dyn Error>> {
    let finite: Vec<f64> = rates.iter().copied().filter(|r| r.is_finite()).collect();
    if finite.is_empty() {
        return Ok(());
    }

    const BINS: usize = 40;
    let max = finite.iter().copied().fold(0.0, f64::max);
    let width = if max > 0.0 { max / BINS as f64 } else { 1.0 };
    let mut counts = [0u32; BINS];
    for &rate in &finite {
        let bin = ((rate / width) as usize).min(BINS - 1);
        counts[bin] += 1;
    }
    let count_max = counts.iter().copied().max().unwrap_or(0);

    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..width * BINS as f64, 0u32..count_max + 1)?;
    chart
        .configure_mesh()
        .x_desc("intensity rate")
        .y_desc("tracks")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        let x0 = i as f64 * width;
        Rectangle::new([(x0, 0), (x0 + width, count)], BLUE.mix(0.5).filled())
    }))?;

    root.present()?;
    Ok(())
}
