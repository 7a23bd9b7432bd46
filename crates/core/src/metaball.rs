//! Metaball energy field over the trail and the two masks derived from it.
//!
//! Each trail point adds a compactly supported falloff kernel whose radius
//! shrinks toward the tail. The contributions sum into a single energy value
//! per point, so nearby trail points merge into one blob. Thresholding the
//! energy gives the reveal mask; a band around the threshold gives the
//! distortion ring.

use crate::trail::TrailBuffer;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// GLSL-style Hermite step between `edge0` and `edge1`.
///
/// Reversed edges (`edge0 > edge1`) give a falling step. Equal edges give a
/// hard step at that edge instead of dividing by zero.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Shape of a single trail point's contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalloffKernel {
    /// `1 - smoothstep(0, r, |d|)`: soft shoulder, cusp-free centre.
    Distance,
    /// `1 - smoothstep(0, r², |d|²)`: flatter core, steeper edge.
    #[default]
    SquaredDistance,
}

impl FalloffKernel {
    /// Kernel value for displacement `d` and radius `radius`.
    ///
    /// Zero outside the radius, and zero everywhere when `radius <= 0`.
    pub fn weight(self, d: DVec2, radius: f64) -> f64 {
        if radius <= 0.0 || !radius.is_finite() {
            return 0.0;
        }
        match self {
            FalloffKernel::Distance => 1.0 - smoothstep(0.0, radius, d.length()),
            FalloffKernel::SquaredDistance => {
                1.0 - smoothstep(0.0, radius * radius, d.length_squared())
            }
        }
    }
}

/// Energy and masks evaluated at one point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Masks {
    /// Clamped metaball energy in [0, 1].
    pub energy: f64,
    /// Where the background replaces the overlay, in [0, 1].
    pub reveal: f64,
    /// Thin ring around the blob edge where ripples are drawn, in [0, 1].
    pub distortion: f64,
}

impl Masks {
    /// True when neither mask has any effect.
    pub fn is_inert(&self) -> bool {
        self.reveal == 0.0 && self.distortion == 0.0
    }
}

/// Evaluates the metaball energy field and derives the reveal and
/// distortion masks from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldEvaluator {
    /// Energy level of the blob boundary.
    pub threshold: f64,
    /// Half-width of the distortion ring, in energy units.
    pub edge_thickness: f64,
    /// Half-width of the reveal transition. Zero gives a hard edge.
    pub reveal_softness: f64,
    pub kernel: FalloffKernel,
}

impl Default for FieldEvaluator {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            edge_thickness: 0.15,
            reveal_softness: 0.02,
            kernel: FalloffKernel::default(),
        }
    }
}

impl FieldEvaluator {
    /// Contribution of one trail point at `p`.
    ///
    /// The x offset is multiplied by `aspect` (surface width / height) so the
    /// influence region is round on screen rather than in UV space.
    pub fn contribution(&self, p: DVec2, point: DVec2, radius: f64, aspect: f64) -> f64 {
        let mut d = p - point;
        d.x *= aspect;
        self.kernel.weight(d, radius)
    }

    /// Unclamped sum of all trail contributions at `p`.
    ///
    /// Point `i` of `N` uses radius `radius * (1 - i / N)`.
    pub fn raw_energy_at(&self, p: DVec2, trail: &TrailBuffer, radius: f64, aspect: f64) -> f64 {
        let n = trail.len() as f64;
        trail
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let falloff = 1.0 - i as f64 / n;
                self.contribution(p, point, radius * falloff, aspect)
            })
            .sum()
    }

    /// Metaball energy at `p`, clamped to [0, 1].
    pub fn energy_at(&self, p: DVec2, trail: &TrailBuffer, radius: f64, aspect: f64) -> f64 {
        self.raw_energy_at(p, trail, radius, aspect).clamp(0.0, 1.0)
    }

    /// Soft threshold of `energy` around the blob boundary, scaled by `intensity`.
    pub fn reveal_mask(&self, energy: f64, intensity: f64) -> f64 {
        let s = self.reveal_softness;
        smoothstep(self.threshold - s, self.threshold + s, energy) * intensity
    }

    /// Band straddling the threshold, zero more than `edge_thickness` away
    /// from it on either side, scaled by `intensity`.
    pub fn distortion_mask(&self, energy: f64, intensity: f64) -> f64 {
        let t = self.threshold;
        let e = self.edge_thickness;
        let ring = smoothstep(t - e, t, energy) - smoothstep(t, t + e, energy);
        ring.max(0.0) * intensity
    }

    /// Energy and both masks at `p`.
    pub fn masks(
        &self,
        p: DVec2,
        trail: &TrailBuffer,
        radius: f64,
        intensity: f64,
        aspect: f64,
    ) -> Masks {
        if intensity == 0.0 {
            return Masks::default();
        }
        let energy = self.energy_at(p, trail, radius, aspect);
        Masks {
            energy,
            reveal: self.reveal_mask(energy, intensity),
            distortion: self.distortion_mask(energy, intensity),
        }
    }
}
