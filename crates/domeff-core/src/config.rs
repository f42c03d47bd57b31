//! Tunable analysis parameters.
//!
//! Every cutoff the reference analysis hard-coded as a module constant is an
//! explicit field here, so parameter sweeps and tests can vary them without
//! process-wide state. `Default` impls reproduce the reference values.

use serde::{Deserialize, Serialize};

use crate::geometry::DustLayer;

/// Parameters of the track extraction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Near-field Cherenkov distance cutoff, meters.
    pub near_cutoff: f64,
    /// Far-field Cherenkov distance cutoff, meters.
    pub far_cutoff: f64,
    /// Tolerance added to the track length when testing whether an emission
    /// or loss lies on the track. Negative: the last stretch of the track is
    /// not trusted.
    pub track_end_padding: f64,
    /// Dust layer z-range; photon paths crossing it are rejected.
    pub dust_layer: DustLayer,
    /// Reject sensors hit above this impact angle, degrees. None disables
    /// the gate.
    pub max_impact_angle_deg: Option<f64>,
    /// Half-width of the accepted time-residual window, ns. Pulses outside
    /// it are treated as noise or afterpulses.
    pub time_residual_window: f64,
    /// Scale constant of the intensity attenuation model, meters.
    pub stochastic_length: f64,
    /// Padding applied to the bounding cylinder for the single-track gate,
    /// meters.
    pub detector_padding: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            near_cutoff: 20.0,
            far_cutoff: 100.0,
            track_end_padding: -50.0,
            dust_layer: DustLayer {
                z_min: -150.0,
                z_max: -50.0,
            },
            max_impact_angle_deg: Some(135.0),
            time_residual_window: 100.0,
            stochastic_length: 100.0,
            detector_padding: 100.0,
        }
    }
}

/// Detection-threshold sweep grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 1.0,
            end: 10.0,
            step: 0.2,
        }
    }
}

impl SweepConfig {
    /// Threshold values, computed by index so the grid stays stable under
    /// floating-point accumulation.
    pub fn thresholds(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.end < self.start {
            return vec![self.start];
        }
        let n = ((self.end - self.start) / self.step).round() as usize;
        (0..=n).map(|i| self.start + i as f64 * self.step).collect()
    }
}

/// Parameters of the windowed bias-correction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of emissions per sliding window.
    pub window_size: usize,
    /// Tracks need at least `min_window_factor * window_size` emissions to
    /// enter windowed analysis at all.
    pub min_window_factor: usize,
    /// Tracks whose loss-energy-per-length falls below this cutoff are
    /// routed to the low-loss bucket, bypassing windowing.
    pub low_loss_cutoff: f64,
    pub sweep: SweepConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            min_window_factor: 4,
            low_loss_cutoff: 0.5,
            sweep: SweepConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Minimum emission count for windowed analysis.
    pub fn min_emissions(&self) -> usize {
        self.min_window_factor * self.window_size
    }
}
