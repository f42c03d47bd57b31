//! Track extraction: raw event records to bias-correctable [`Track`]s.
//!
//! Per event: resolve the single candidate crossing the padded detector
//! cylinder, collect stochastic-loss records from the daughter tree, then
//! evaluate every sensor for a Cherenkov emission record. Events failing the
//! single-track gate are discarded, never retried.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::event::{DetectorGeometry, EventRecord, TrackCandidate};
use crate::geometry::{Cylinder, is_defined};
use crate::model::{Emission, Loss, Track};
use crate::physics::{CherenkovModel, TrackGeometry};
use crate::response::{dom_angle_acceptance, intensity};

/// Counters reported after an extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub events: u64,
    /// Events with no candidate crossing the padded cylinder.
    pub no_candidate: u64,
    /// Events with more than one crossing candidate.
    pub ambiguous: u64,
    pub tracks: u64,
}

/// Drives extraction over a sensor geometry with a Cherenkov model.
pub struct Extractor<'a, M> {
    geometry: &'a DetectorGeometry,
    model: M,
    config: ExtractionConfig,
    padded: Cylinder,
}

impl<'a, M: CherenkovModel> Extractor<'a, M> {
    pub fn new(geometry: &'a DetectorGeometry, model: M, config: ExtractionConfig) -> Self {
        let padded = geometry.cylinder.padded(config.detector_padding);
        Self {
            geometry,
            model,
            config,
            padded,
        }
    }

    fn crosses(&self, candidate: &TrackCandidate) -> bool {
        let delta = candidate.end - candidate.start;
        if delta.length_squared() < 1e-12 {
            return false;
        }
        self.padded
            .intersects_line(candidate.start, delta / delta.length())
    }

    /// Extract a track from one event, or None when the event fails the
    /// single-track gate.
    pub fn extract_event(
        &self,
        event: &EventRecord,
        stats: &mut ExtractionStats,
    ) -> Option<Track> {
        stats.events += 1;

        let mut crossing = event.candidates.iter().filter(|c| self.crosses(c));
        let Some(candidate) = crossing.next() else {
            stats.no_candidate += 1;
            return None;
        };
        if crossing.next().is_some() {
            stats.ambiguous += 1;
            return None;
        }

        let track_geom = TrackGeometry {
            start: candidate.start,
            end: candidate.end,
            time: candidate.time,
        };
        let length = track_geom.length();
        let on_track_limit = length + self.config.track_end_padding;
        let mut track = Track::new(length);

        for daughter in &event.daughters {
            // The primary's own segments are steady ionization, not losses.
            if daughter.particle_type == candidate.particle_type {
                continue;
            }
            let distance = (daughter.position - candidate.start).length();
            if distance > on_track_limit {
                continue;
            }
            track.losses.push(Loss {
                track_distance: distance,
                energy: daughter.energy,
            });
        }

        let pulse_map = event.pulse_map();
        for sensor in &self.geometry.sensors {
            let cherenkov_distance = self.model.cherenkov_distance(&track_geom, sensor.position);
            if !is_defined(cherenkov_distance) {
                continue;
            }
            if cherenkov_distance < self.config.near_cutoff
                || cherenkov_distance > self.config.far_cutoff
            {
                continue;
            }

            let emission_point = self.model.emission_point(&track_geom, sensor.position);
            let emission_distance = (emission_point - candidate.start).length();
            if emission_distance > on_track_limit {
                continue;
            }
            if self
                .config
                .dust_layer
                .blocks(emission_point, sensor.position)
            {
                continue;
            }

            let angle =
                self.model
                    .approach_angle_deg(&track_geom, sensor.position, sensor.orientation);
            if let Some(ceiling) = self.config.max_impact_angle_deg {
                if angle > ceiling {
                    continue;
                }
            }

            let Some(series) = pulse_map.get(&sensor.sensor) else {
                track.emissions.push(Emission {
                    track_distance: emission_distance,
                    intensity: 0.0,
                });
                continue;
            };

            let mut charge = 0.0;
            for pulse in series.iter() {
                let residual = self
                    .model
                    .time_residual(&track_geom, sensor.position, pulse.time);
                if residual.abs() < self.config.time_residual_window {
                    charge += pulse.charge;
                }
            }
            charge /= dom_angle_acceptance(angle);

            track.emissions.push(Emission {
                track_distance: emission_distance,
                intensity: intensity(charge, cherenkov_distance, self.config.stochastic_length),
            });
        }

        stats.tracks += 1;
        Some(track)
    }

    /// Run extraction over a full event sequence. Unreadable events are
    /// skipped; the counters tell the story afterwards.
    pub fn run<I>(&self, events: I) -> (Vec<Track>, ExtractionStats)
    where
        I: IntoIterator<Item = Result<EventRecord>>,
    {
        let mut stats = ExtractionStats::default();
        let mut tracks = Vec::new();
        for event in events {
            match event {
                Ok(event) => {
                    if let Some(track) = self.extract_event(&event, &mut stats) {
                        tracks.push(track);
                    }
                }
                Err(e) => warn!("skipping unreadable event: {e}"),
            }
        }
        info!(
            "extracted {} tracks from {} events ({} without candidate, {} ambiguous)",
            stats.tracks, stats.events, stats.no_candidate, stats.ambiguous
        );
        (tracks, stats)
    }
}
