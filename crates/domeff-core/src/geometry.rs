//! Detector geometry primitives: bounding cylinder, dust layer, NaN guard.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Explicit is-defined predicate for geometric quantities that signal
/// "undefined" with NaN (e.g. a Cherenkov distance with no valid emission
/// point).
#[inline]
pub fn is_defined(x: f64) -> bool {
    !x.is_nan()
}

/// Vertical cylinder enclosing the instrumented volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    pub center: DVec3,
    pub length: f64,
    pub radius: f64,
}

impl Cylinder {
    /// Smallest vertical cylinder around the given sensor positions: the z
    /// extent sets the length, the largest |x - cx| or |y - cy| sets the
    /// radius. Returns None for an empty position set.
    pub fn bounding(positions: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        let mut any = false;
        for p in positions {
            min = min.min(p);
            max = max.max(p);
            any = true;
        }
        if !any {
            return None;
        }
        let center = (min + max) * 0.5;
        let radius = (max.x - center.x)
            .abs()
            .max((min.x - center.x).abs())
            .max((max.y - center.y).abs())
            .max((min.y - center.y).abs());
        Some(Self {
            center,
            length: max.z - min.z,
            radius,
        })
    }

    /// Cylinder grown by `padding` on every side.
    pub fn padded(&self, padding: f64) -> Self {
        Self {
            center: self.center,
            length: self.length + 2.0 * padding,
            radius: self.radius + padding,
        }
    }

    /// Whether the infinite line through `start` with unit direction `dir`
    /// passes through the cylinder volume (mantle or caps).
    pub fn intersects_line(&self, start: DVec3, dir: DVec3) -> bool {
        let half = self.length * 0.5;
        let q = start - self.center;
        let a = dir.x * dir.x + dir.y * dir.y;
        let radial = q.x * q.x + q.y * q.y - self.radius * self.radius;

        if a < 1e-12 {
            // Vertical line: hits iff it lies within the radius.
            return radial <= 0.0;
        }

        let b = 2.0 * (q.x * dir.x + q.y * dir.y);
        let disc = b * b - 4.0 * a * radial;
        if disc < 0.0 {
            return false;
        }
        let sqrt_disc = disc.sqrt();
        let t0 = (-b - sqrt_disc) / (2.0 * a);
        let t1 = (-b + sqrt_disc) / (2.0 * a);

        // z interval covered while the line is radially inside.
        let z0 = q.z + t0 * dir.z;
        let z1 = q.z + t1 * dir.z;
        z0.min(z1) <= half && z0.max(z1) >= -half
    }
}

/// Horizontal layer of dust-laden ice that scatters Cherenkov light away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DustLayer {
    pub z_min: f64,
    pub z_max: f64,
}

impl DustLayer {
    fn contains(&self, z: f64) -> bool {
        self.z_min < z && z < self.z_max
    }

    /// True when the straight photon path from `emission` to `sensor` crosses
    /// the layer: either endpoint inside it, or the endpoints on opposite
    /// sides with the layer strictly between them.
    pub fn blocks(&self, emission: DVec3, sensor: DVec3) -> bool {
        let lo = emission.z.min(sensor.z);
        let hi = emission.z.max(sensor.z);
        self.contains(emission.z) || self.contains(sensor.z) || (lo < self.z_min && self.z_max < hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> DustLayer {
        DustLayer {
            z_min: -150.0,
            z_max: -50.0,
        }
    }

    #[test]
    fn test_is_defined() {
        assert!(is_defined(0.0));
        assert!(is_defined(f64::INFINITY));
        assert!(!is_defined(f64::NAN));
    }

    #[test]
    fn test_bounding_cylinder() {
        let positions = vec![
            DVec3::new(-100.0, -50.0, -500.0),
            DVec3::new(100.0, 50.0, 500.0),
            DVec3::new(0.0, 0.0, 0.0),
        ];
        let cyl = Cylinder::bounding(positions).unwrap();
        assert_eq!(cyl.center, DVec3::ZERO);
        assert_eq!(cyl.length, 1000.0);
        assert_eq!(cyl.radius, 100.0);
    }

    #[test]
    fn test_bounding_cylinder_empty() {
        assert!(Cylinder::bounding(std::iter::empty()).is_none());
    }

    #[test]
    fn test_padded() {
        let cyl = Cylinder {
            center: DVec3::ZERO,
            length: 1000.0,
            radius: 500.0,
        };
        let p = cyl.padded(100.0);
        assert_eq!(p.length, 1200.0);
        assert_eq!(p.radius, 600.0);
        assert_eq!(p.center, cyl.center);
    }

    #[test]
    fn test_line_through_center() {
        let cyl = Cylinder {
            center: DVec3::ZERO,
            length: 1000.0,
            radius: 500.0,
        };
        let dir = DVec3::new(1.0, 0.0, 0.0);
        assert!(cyl.intersects_line(DVec3::new(-2000.0, 0.0, 0.0), dir));
    }

    #[test]
    fn test_line_misses_radially() {
        let cyl = Cylinder {
            center: DVec3::ZERO,
            length: 1000.0,
            radius: 500.0,
        };
        let dir = DVec3::new(1.0, 0.0, 0.0);
        assert!(!cyl.intersects_line(DVec3::new(-2000.0, 600.0, 0.0), dir));
    }

    #[test]
    fn test_line_misses_above_caps() {
        let cyl = Cylinder {
            center: DVec3::ZERO,
            length: 1000.0,
            radius: 500.0,
        };
        let dir = DVec3::new(1.0, 0.0, 0.0);
        assert!(!cyl.intersects_line(DVec3::new(-2000.0, 0.0, 700.0), dir));
    }

    #[test]
    fn test_vertical_line() {
        let cyl = Cylinder {
            center: DVec3::ZERO,
            length: 1000.0,
            radius: 500.0,
        };
        let dir = DVec3::new(0.0, 0.0, 1.0);
        assert!(cyl.intersects_line(DVec3::new(100.0, 100.0, -5000.0), dir));
        assert!(!cyl.intersects_line(DVec3::new(600.0, 0.0, -5000.0), dir));
    }

    #[test]
    fn test_diagonal_line_through_cap() {
        let cyl = Cylinder {
            center: DVec3::ZERO,
            length: 1000.0,
            radius: 500.0,
        };
        // Steep line entering through the top cap.
        let dir = DVec3::new(0.1, 0.0, -1.0).normalize();
        assert!(cyl.intersects_line(DVec3::new(-100.0, 0.0, 2000.0), dir));
    }

    #[test]
    fn test_dust_layer_endpoint_inside() {
        let l = layer();
        assert!(l.blocks(DVec3::new(0.0, 0.0, -100.0), DVec3::new(0.0, 0.0, 0.0)));
        assert!(l.blocks(DVec3::new(0.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -100.0)));
    }

    #[test]
    fn test_dust_layer_straddle() {
        let l = layer();
        assert!(l.blocks(
            DVec3::new(0.0, 0.0, -300.0),
            DVec3::new(50.0, 50.0, 100.0)
        ));
    }

    #[test]
    fn test_dust_layer_clear() {
        let l = layer();
        // Both above.
        assert!(!l.blocks(DVec3::new(0.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 200.0)));
        // Both below.
        assert!(!l.blocks(
            DVec3::new(0.0, 0.0, -200.0),
            DVec3::new(0.0, 0.0, -400.0)
        ));
    }

    #[test]
    fn test_dust_layer_boundary_is_exclusive() {
        let l = layer();
        // Endpoints exactly on the boundary do not count as inside.
        assert!(!l.blocks(
            DVec3::new(0.0, 0.0, -50.0),
            DVec3::new(0.0, 0.0, 100.0)
        ));
    }
}
