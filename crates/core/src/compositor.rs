//! Per-pixel compositing of the overlay, the background and its rippled copy.

use crate::color::Rgba;
use crate::metaball::Masks;
use crate::noise_field::NoiseField;
use crate::texture::ImagePair;
use glam::DVec2;

/// Combines the two images under the reveal and distortion masks.
///
/// Outside the trail blob the overlay shows. Inside it the background shows
/// undistorted. Along the blob edge the background is sampled through a
/// noise displacement, which reads as a liquid ripple.
#[derive(Debug, Clone)]
pub struct Compositor {
    noise: NoiseField,
    displacement_scale: f64,
}

impl Compositor {
    pub fn new(noise: NoiseField, displacement_scale: f64) -> Self {
        Self {
            noise,
            displacement_scale,
        }
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn displacement_scale(&self) -> f64 {
        self.displacement_scale
    }

    /// Offset applied to the background sample at `p`.
    ///
    /// Zero wherever the distortion mask is zero.
    pub fn displacement(&self, p: DVec2, distortion: f64, time: f64) -> DVec2 {
        if distortion == 0.0 {
            return DVec2::ZERO;
        }
        self.noise.displacement(p, time) * self.displacement_scale * distortion
    }

    /// Final opaque color at `p`.
    pub fn color_at(&self, p: DVec2, images: &ImagePair, masks: &Masks, time: f64) -> Rgba {
        let top = images.overlay.sample(p);
        if masks.is_inert() {
            return top.opaque();
        }
        let clear = images.background.sample(p);
        let base = top.mix(clear, masks.reveal);
        if masks.distortion == 0.0 {
            return base.opaque();
        }
        let offset = self.displacement(p, masks.distortion, time);
        let rippled = images.background.sample(p + offset);
        base.mix(rippled, masks.distortion).opaque()
    }
}
