//! Windowed stochastic-loss bias correction.
//!
//! A bright burst along the track pulls the whole-track intensity rate up.
//! The correction finds the densest fixed-count emission window and, when its
//! rate exceeds the whole-track rate by more than a threshold factor,
//! recomputes the rate with that window removed.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::model::{Emission, Track};

/// Peak sliding window over a track's emissions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakWindow {
    /// Index of the first emission in the window (sorted order).
    pub start: usize,
    /// Summed intensity of the window.
    pub intensity: f64,
    /// Track distance from the first to the last emission in the window.
    pub span: f64,
    /// Intensity per unit span.
    pub rate: f64,
}

/// Scan all `window_size`-emission windows and return the one with the
/// highest intensity rate. Windows with non-positive span are skipped; None
/// when no window has positive span.
pub fn peak_window(emissions: &[Emission], window_size: usize) -> Option<PeakWindow> {
    if window_size < 2 || emissions.len() < window_size {
        return None;
    }
    let mut best: Option<PeakWindow> = None;
    for start in 0..=(emissions.len() - window_size) {
        let window = &emissions[start..start + window_size];
        let span = window[window_size - 1].track_distance - window[0].track_distance;
        if span <= 0.0 {
            continue;
        }
        let intensity: f64 = window.iter().map(|e| e.intensity).sum();
        let rate = intensity / span;
        if best.is_none_or(|b| rate > b.rate) {
            best = Some(PeakWindow {
                start,
                intensity,
                span,
                rate,
            });
        }
    }
    best
}

/// Outcome of assessing one track at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Correction {
    /// Track could not be assessed; it contributes to no mean.
    Excluded,
    /// Peak window within threshold of the whole-track rate.
    Unchanged { rate: f64 },
    /// Peak window removed from the rate.
    Corrected { rate: f64 },
}

impl Correction {
    /// The usable rate, None when excluded.
    pub fn rate(&self) -> Option<f64> {
        match *self {
            Correction::Excluded => None,
            Correction::Unchanged { rate } | Correction::Corrected { rate } => Some(rate),
        }
    }
}

/// Assess one track at one threshold factor.
pub fn assess(track: &Track, config: &AnalysisConfig, threshold: f64) -> Correction {
    if track.emissions.len() < config.min_emissions() {
        return Correction::Excluded;
    }
    let whole = track.intensity_per_length();
    if !whole.is_finite() || whole <= 0.0 {
        return Correction::Excluded;
    }
    let emissions = track.sorted_emissions();
    let Some(peak) = peak_window(&emissions, config.window_size) else {
        return Correction::Excluded;
    };
    if peak.rate <= threshold * whole {
        return Correction::Unchanged { rate: whole };
    }
    let remaining_length = track.length - peak.span;
    if remaining_length <= 0.0 {
        return Correction::Excluded;
    }
    let remaining_intensity = track.total_intensity() - peak.intensity;
    Correction::Corrected {
        rate: remaining_intensity / remaining_length,
    }
}

/// Per-threshold aggregate of the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPoint {
    pub threshold: f64,
    /// Usable rates, one per non-excluded track.
    pub rates: Vec<f64>,
    pub mean: f64,
    pub corrected_tracks: usize,
}

/// Full sweep output over one track set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub points: Vec<ThresholdPoint>,
    /// Whole-track rates of the low-loss control bucket.
    pub low_loss: Vec<f64>,
    pub low_loss_mean: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Run the threshold sweep. Low-loss tracks are split off once up front;
/// their whole-track rates form the threshold-independent control sample.
pub fn threshold_sweep(tracks: &[Track], config: &AnalysisConfig) -> SweepReport {
    let mut low_loss = Vec::new();
    let mut sweep_tracks = Vec::new();
    for track in tracks {
        if track.loss_energy_per_length() < config.low_loss_cutoff {
            let rate = track.intensity_per_length();
            if rate.is_finite() && rate > 0.0 {
                low_loss.push(rate);
            }
        } else {
            sweep_tracks.push(track);
        }
    }

    let points = config
        .sweep
        .thresholds()
        .into_iter()
        .map(|threshold| {
            let mut rates = Vec::new();
            let mut corrected_tracks = 0;
            for track in &sweep_tracks {
                match assess(track, config, threshold) {
                    Correction::Excluded => {}
                    Correction::Unchanged { rate } => rates.push(rate),
                    Correction::Corrected { rate } => {
                        rates.push(rate);
                        corrected_tracks += 1;
                    }
                }
            }
            let mean = mean(&rates);
            ThresholdPoint {
                threshold,
                rates,
                mean,
                corrected_tracks,
            }
        })
        .collect();

    let low_loss_mean = mean(&low_loss);
    SweepReport {
        points,
        low_loss,
        low_loss_mean,
    }
}
