//! Procedural gradient noise driving the ripple displacement.
//!
//! [`NoiseField`] wraps 2D OpenSimplex noise. It is a pure function of its
//! seed and inputs, so two fields built with the same seed produce
//! bit-identical output.

use glam::DVec2;
use noise::{NoiseFn, OpenSimplex};
use serde::{Deserialize, Serialize};

/// How a noise sample is turned into a 2D displacement vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplacementPolicy {
    /// One sample at `p * f + t * s`, reused for both axes. Displacement is
    /// always along the diagonal.
    #[default]
    Shared,
    /// Two samples with opposite time phase: `p * f + t * s` for x and
    /// `p * f - t * s` for y.
    PhaseShifted,
}

/// Deterministic 2D gradient noise with a frequency and a time drift speed.
#[derive(Clone)]
pub struct NoiseField {
    noise: OpenSimplex,
    frequency: f64,
    speed: f64,
    policy: DisplacementPolicy,
}

impl NoiseField {
    pub fn new(seed: u32, frequency: f64, speed: f64, policy: DisplacementPolicy) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
            frequency,
            speed,
            policy,
        }
    }

    /// Raw noise at `p`, roughly in [-1, 1]. No frequency scaling applied.
    pub fn noise(&self, p: DVec2) -> f64 {
        self.noise.get([p.x, p.y])
    }

    /// Displacement direction at `p` and `time`, each component roughly in [-1, 1].
    ///
    /// The caller scales this by the displacement strength.
    pub fn displacement(&self, p: DVec2, time: f64) -> DVec2 {
        let base = p * self.frequency;
        let phase = DVec2::splat(time * self.speed);
        match self.policy {
            DisplacementPolicy::Shared => DVec2::splat(self.noise(base + phase)),
            DisplacementPolicy::PhaseShifted => {
                DVec2::new(self.noise(base + phase), self.noise(base - phase))
            }
        }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn policy(&self) -> DisplacementPolicy {
        self.policy
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("frequency", &self.frequency)
            .field("speed", &self.speed)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(policy: DisplacementPolicy) -> NoiseField {
        NoiseField::new(7, 5.0, 0.5, policy)
    }

    #[test]
    fn same_seed_same_output() {
        let a = field(DisplacementPolicy::Shared);
        let b = field(DisplacementPolicy::Shared);
        for i in 0..64 {
            let p = DVec2::new(i as f64 * 0.037, 1.0 - i as f64 * 0.011);
            assert_eq!(a.noise(p).to_bits(), b.noise(p).to_bits());
            assert_eq!(a.displacement(p, 1.25), b.displacement(p, 1.25));
        }
    }

    #[test]
    fn output_is_bounded() {
        let f = field(DisplacementPolicy::Shared);
        for y in 0..40 {
            for x in 0..40 {
                let v = f.noise(DVec2::new(x as f64 * 0.13, y as f64 * 0.17));
                assert!(v.abs() <= 1.1, "noise out of range: {v}");
            }
        }
    }

    #[test]
    fn output_is_not_constant() {
        let f = field(DisplacementPolicy::Shared);
        let samples: Vec<f64> = (0..32)
            .map(|i| f.noise(DVec2::new(i as f64 * 0.31, i as f64 * 0.19)))
            .collect();
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(max - min > 0.1, "noise looks flat: [{min}, {max}]");
    }

    #[test]
    fn small_input_change_gives_small_output_change() {
        let f = field(DisplacementPolicy::Shared);
        for i in 0..50 {
            let p = DVec2::new(i as f64 * 0.21, i as f64 * 0.07);
            let q = p + DVec2::splat(1e-4);
            assert!((f.noise(p) - f.noise(q)).abs() < 1e-2);
        }
    }

    #[test]
    fn shared_policy_uses_one_sample_for_both_axes() {
        let f = field(DisplacementPolicy::Shared);
        let d = f.displacement(DVec2::new(0.3, 0.6), 2.0);
        assert_eq!(d.x, d.y);
    }

    #[test]
    fn phase_shifted_policy_samples_opposite_phases() {
        let f = field(DisplacementPolicy::PhaseShifted);
        let p = DVec2::new(0.3, 0.6);
        let t = 2.0;
        let d = f.displacement(p, t);
        let base = p * 5.0;
        assert_eq!(d.x, f.noise(base + DVec2::splat(1.0)));
        assert_eq!(d.y, f.noise(base - DVec2::splat(1.0)));
    }

    #[test]
    fn displacement_drifts_with_time() {
        let f = field(DisplacementPolicy::Shared);
        let p = DVec2::new(0.42, 0.58);
        let moved = (0..10).any(|i| f.displacement(p, i as f64) != f.displacement(p, 0.0));
        assert!(moved);
    }
}
