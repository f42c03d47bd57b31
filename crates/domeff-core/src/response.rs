//! DOM angular acceptance and the intensity model.

/// Degree-6 polynomial fit of the DOM angular response, lowest order first.
/// Evaluated in degrees over [0, 135].
pub const ACCEPTANCE_COEFFS: [f64; 7] = [
    1.0, -3.59e-3, 5.11e-5, -4.27e-6, 5.56e-8, -2.73e-10, 4.76e-13,
];

/// Relative sensor sensitivity at the given photon impact angle (degrees).
/// Applied as a divisor to the summed charge.
pub fn dom_angle_acceptance(angle_deg: f64) -> f64 {
    ACCEPTANCE_COEFFS
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * angle_deg + c)
}

/// Light-yield estimate for a corrected charge observed at the given
/// Cherenkov distance: `charge * exp(d / stochastic_length) * d`. The
/// exponential compensates attenuation, the linear factor geometric
/// spreading.
pub fn intensity(charge: f64, cherenkov_distance: f64, stochastic_length: f64) -> f64 {
    charge * (cherenkov_distance / stochastic_length).exp() * cherenkov_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Direct power-sum evaluation, for cross-checking Horner.
    fn acceptance_naive(x: f64) -> f64 {
        ACCEPTANCE_COEFFS
            .iter()
            .enumerate()
            .map(|(i, &c)| c * x.powi(i as i32))
            .sum()
    }

    #[test]
    fn test_acceptance_reference_values() {
        assert!((dom_angle_acceptance(0.0) - 1.0).abs() < 1e-12);
        assert!((dom_angle_acceptance(45.0) - 0.7343949143125).abs() < 1e-9);
        assert!((dom_angle_acceptance(90.0) - 0.266824216).abs() < 1e-9);
        assert!((dom_angle_acceptance(135.0) - 0.0484496025625).abs() < 1e-9);
    }

    #[test]
    fn test_acceptance_matches_naive_evaluation() {
        for i in 0..=135 {
            let x = i as f64;
            assert!((dom_angle_acceptance(x) - acceptance_naive(x)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_acceptance_finite_positive_over_domain() {
        // Fine grid over the valid impact-angle range.
        let mut x = 0.0;
        while x <= 135.0 {
            let a = dom_angle_acceptance(x);
            assert!(a.is_finite());
            assert!(a > 0.0, "acceptance non-positive at {x}: {a}");
            x += 0.25;
        }
    }

    #[test]
    fn test_intensity_monotonic_in_charge() {
        let mut rng = StdRng::seed_from_u64(0x0d0e);
        for _ in 0..200 {
            let d = rng.random_range(1.0..150.0);
            let q = rng.random_range(0.0..50.0);
            let dq = rng.random_range(0.01..5.0);
            assert!(intensity(q + dq, d, 100.0) > intensity(q, d, 100.0));
        }
    }

    #[test]
    fn test_intensity_monotonic_in_distance() {
        let mut rng = StdRng::seed_from_u64(0xeff0);
        for _ in 0..200 {
            let q = rng.random_range(0.01..50.0);
            let d = rng.random_range(0.1..150.0);
            let dd = rng.random_range(0.01..10.0);
            assert!(intensity(q, d + dd, 100.0) > intensity(q, d, 100.0));
        }
    }

    #[test]
    fn test_intensity_zero_charge() {
        assert_eq!(intensity(0.0, 80.0, 100.0), 0.0);
    }

    #[test]
    fn test_intensity_reference_value() {
        // 2.5 * e^(50/100) * 50
        let expected = 2.5 * 0.5f64.exp() * 50.0;
        assert!((intensity(2.5, 50.0, 100.0) - expected).abs() < 1e-12);
    }
}
