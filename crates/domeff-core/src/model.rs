//! Track data model: per-sensor Cherenkov emissions and stochastic losses.
//!
//! A [`Track`] is created once per qualifying event during extraction and is
//! immutable afterwards. All distances are measured from the track's start
//! position, in meters.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Cherenkov photon detection at one sensor, indexed by position along the
/// track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    /// Distance of the photon emission point from the track start.
    pub track_distance: f64,
    /// Model-corrected light yield; zero when the sensor saw no pulses.
    pub intensity: f64,
}

/// Discrete stochastic energy-loss event along the track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loss {
    pub track_distance: f64,
    pub energy: f64,
}

/// One reconstructed muon track with its emission and loss records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track length inside the event record, meters.
    pub length: f64,
    pub emissions: Vec<Emission>,
    pub losses: Vec<Loss>,
}

impl Track {
    pub fn new(length: f64) -> Self {
        Self {
            length,
            emissions: Vec::new(),
            losses: Vec::new(),
        }
    }

    /// Emissions ordered by distance along the track. Extraction appends
    /// them in sensor iteration order, so windowed analysis sorts first.
    pub fn sorted_emissions(&self) -> Vec<Emission> {
        let mut emissions = self.emissions.clone();
        emissions.sort_by(|a, b| {
            a.track_distance
                .partial_cmp(&b.track_distance)
                .unwrap_or(Ordering::Equal)
        });
        emissions
    }

    pub fn total_intensity(&self) -> f64 {
        self.emissions.iter().map(|e| e.intensity).sum()
    }

    /// Uncorrected intensity per unit track length. NaN for a zero-length
    /// track; callers guard before aggregating.
    pub fn intensity_per_length(&self) -> f64 {
        self.total_intensity() / self.length
    }

    pub fn total_loss_energy(&self) -> f64 {
        self.losses.iter().map(|l| l.energy).sum()
    }

    pub fn loss_energy_per_length(&self) -> f64 {
        self.total_loss_energy() / self.length
    }
}
