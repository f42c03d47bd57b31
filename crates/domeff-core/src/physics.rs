//! Cherenkov geometry calculations.
//!
//! The calculators are a narrow trait seam so analysis code can substitute
//! deterministic synthetic geometry in tests. The production model assumes a
//! relativistic muon on a straight line emitting at the fixed Cherenkov
//! angle of deep glacial ice.

use glam::DVec3;

/// Speed of light in vacuum, m/ns.
pub const C_VACUUM: f64 = 0.299_792_458;

/// Straight-line muon trajectory with a start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub start: DVec3,
    pub end: DVec3,
    /// Time at which the particle is at `start`, ns.
    pub time: f64,
}

impl TrackGeometry {
    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }

    pub fn direction(&self) -> DVec3 {
        (self.end - self.start).normalize()
    }
}

/// Physics seam between track geometry and per-sensor quantities.
pub trait CherenkovModel {
    /// Distance the Cherenkov photon travels from its emission point on the
    /// track to the sensor. NaN when no valid emission point exists.
    fn cherenkov_distance(&self, track: &TrackGeometry, sensor: DVec3) -> f64;

    /// Photon emission point on the track line.
    fn emission_point(&self, track: &TrackGeometry, sensor: DVec3) -> DVec3;

    /// Photon impact angle against the sensor's optical axis, degrees.
    fn approach_angle_deg(&self, track: &TrackGeometry, sensor: DVec3, sensor_axis: DVec3) -> f64;

    /// Observed hit time minus the expected unscattered Cherenkov arrival
    /// time.
    fn time_residual(&self, track: &TrackGeometry, sensor: DVec3, hit_time: f64) -> f64;
}

/// Production Cherenkov model for deep ice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardIce {
    /// Phase index of refraction (sets the Cherenkov angle).
    pub n_phase: f64,
    /// Group index of refraction (sets the photon propagation speed).
    pub n_group: f64,
}

impl Default for StandardIce {
    fn default() -> Self {
        Self {
            n_phase: 1.3195,
            n_group: 1.35634,
        }
    }
}

impl StandardIce {
    fn cherenkov_angle(&self) -> f64 {
        (1.0 / self.n_phase).acos()
    }

    /// (distance along the track to the emission point, photon path length).
    fn emission(&self, track: &TrackGeometry, sensor: DVec3) -> (f64, f64) {
        let dir = track.direction();
        let rel = sensor - track.start;
        let s_closest = rel.dot(dir);
        let d_closest = (rel - s_closest * dir).length();
        let theta = self.cherenkov_angle();
        let s_emission = s_closest - d_closest / theta.tan();
        let path = d_closest / theta.sin();
        (s_emission, path)
    }
}

impl CherenkovModel for StandardIce {
    fn cherenkov_distance(&self, track: &TrackGeometry, sensor: DVec3) -> f64 {
        let (s_emission, path) = self.emission(track, sensor);
        if s_emission < 0.0 {
            // The photon would have to leave before the track starts.
            return f64::NAN;
        }
        path
    }

    fn emission_point(&self, track: &TrackGeometry, sensor: DVec3) -> DVec3 {
        let (s_emission, _) = self.emission(track, sensor);
        track.start + s_emission * track.direction()
    }

    fn approach_angle_deg(&self, track: &TrackGeometry, sensor: DVec3, sensor_axis: DVec3) -> f64 {
        let photon = sensor - self.emission_point(track, sensor);
        if photon.length_squared() < 1e-12 {
            return 0.0;
        }
        let cos = photon
            .normalize()
            .dot(sensor_axis.normalize())
            .clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }

    fn time_residual(&self, track: &TrackGeometry, sensor: DVec3, hit_time: f64) -> f64 {
        let (s_emission, path) = self.emission(track, sensor);
        let expected = track.time + s_emission / C_VACUUM + path * self.n_group / C_VACUUM;
        hit_time - expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_defined;

    fn track() -> TrackGeometry {
        TrackGeometry {
            start: DVec3::ZERO,
            end: DVec3::new(1000.0, 0.0, 0.0),
            time: 0.0,
        }
    }

    #[test]
    fn test_cherenkov_distance_perpendicular() {
        let ice = StandardIce::default();
        let theta = (1.0 / ice.n_phase).acos();
        // Sensor 50 m off the track, well past the start.
        let sensor = DVec3::new(500.0, 0.0, 50.0);
        let d = ice.cherenkov_distance(&track(), sensor);
        assert!((d - 50.0 / theta.sin()).abs() < 1e-9);
    }

    #[test]
    fn test_cherenkov_distance_undefined_before_start() {
        let ice = StandardIce::default();
        // Sensor behind the start: the emission point would be at s < 0.
        let sensor = DVec3::new(-500.0, 0.0, 50.0);
        assert!(!is_defined(ice.cherenkov_distance(&track(), sensor)));
    }

    #[test]
    fn test_emission_point_precedes_closest_approach() {
        let ice = StandardIce::default();
        let theta = (1.0 / ice.n_phase).acos();
        let sensor = DVec3::new(500.0, 0.0, 50.0);
        let point = ice.emission_point(&track(), sensor);
        assert!((point.x - (500.0 - 50.0 / theta.tan())).abs() < 1e-9);
        assert!(point.y.abs() < 1e-12);
        assert!(point.z.abs() < 1e-12);
    }

    #[test]
    fn test_time_residual_zero_for_expected_arrival() {
        let ice = StandardIce::default();
        let sensor = DVec3::new(500.0, 0.0, 50.0);
        let t = track();
        let (s_emission, path) = ice.emission(&t, sensor);
        let arrival = s_emission / C_VACUUM + path * ice.n_group / C_VACUUM;
        assert!(ice.time_residual(&t, sensor, arrival).abs() < 1e-9);
        assert!((ice.time_residual(&t, sensor, arrival + 75.0) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_approach_angle_head_on() {
        let ice = StandardIce::default();
        let sensor = DVec3::new(500.0, 0.0, 50.0);
        let t = track();
        let photon = (sensor - ice.emission_point(&t, sensor)).normalize();
        // Axis aligned with the photon: zero impact angle.
        let angle = ice.approach_angle_deg(&t, sensor, photon);
        assert!(angle.abs() < 1e-9);
        // Axis opposing the photon: 180 degrees.
        let angle = ice.approach_angle_deg(&t, sensor, -photon);
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_track_geometry_helpers() {
        let t = track();
        assert_eq!(t.length(), 1000.0);
        assert_eq!(t.direction(), DVec3::new(1.0, 0.0, 0.0));
    }
}
