use std::fs;
use std::path::Path;
use std::process;

use domeff_core::{AnalysisConfig, load_tracks, threshold_sweep};

use crate::plot;

pub fn run(
    tracks_path: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
    plots: Option<&Path>,
) {
    let config: AnalysisConfig = super::load_config(config_path);

    let tracks = match load_tracks(tracks_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let report = threshold_sweep(&tracks, &config);

    println!(
        "Tracks: {} ({} in the low-loss control bucket)",
        tracks.len(),
        report.low_loss.len()
    );
    println!();
    println!(
        "{:>9}  {:>6}  {:>9}  {:>12}",
        "threshold", "tracks", "corrected", "mean rate"
    );
    for point in &report.points {
        let mean = if point.mean.is_finite() {
            format!("{:.4}", point.mean)
        } else {
            "-".to_string()
        };
        println!(
            "{:>9.1}  {:>6}  {:>9}  {:>12}",
            point.threshold,
            point.rates.len(),
            point.corrected_tracks,
            mean
        );
    }
    println!();
    if report.low_loss_mean.is_finite() {
        println!(
            "Low-loss control mean rate: {:.4} ({} tracks)",
            report.low_loss_mean,
            report.low_loss.len()
        );
    } else {
        println!("Low-loss control bucket is empty");
    }

    if let Some(path) = output {
        let json = match serde_json::to_string_pretty(&report) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error: cannot serialize report: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = fs::write(path, json) {
            eprintln!("Error: cannot write {}: {e}", path.display());
            process::exit(1);
        }
        println!("Wrote {}", path.display());
    }

    if let Some(dir) = plots {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Error: cannot create {}: {e}", dir.display());
            process::exit(1);
        }
        let sweep_png = dir.join("sweep.png");
        if let Err(e) = plot::sweep_plot(&report, &sweep_png) {
            eprintln!("Error: cannot render {}: {e}", sweep_png.display());
            process::exit(1);
        }
        let hist_png = dir.join("low_loss_rates.png");
        if let Err(e) = plot::rate_histogram(
            &report.low_loss,
            "Low-loss control intensity rates",
            &hist_png,
        ) {
            eprintln!("Error: cannot render {}: {e}", hist_png.display());
            process::exit(1);
        }
        for point in &report.points {
            let path = dir.join(format!("rates_t{:.1}.png", point.threshold));
            let title = format!("Corrected intensity rates, threshold {:.1}", point.threshold);
            if let Err(e) = plot::rate_histogram(&point.rates, &title, &path) {
                eprintln!("Error: cannot render {}: {e}", path.display());
                process::exit(1);
            }
        }
        println!("Wrote plots to {}", dir.display());
    }
}
