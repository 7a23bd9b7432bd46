//! Image sources sampled by the compositor.
//!
//! Sampling happens at normalized coordinates with `v` pointing up, the same
//! space pointer samples and trail points live in. Any coordinate is valid:
//! values outside [0, 1] clamp to the edge and non-finite values fall back
//! to the centre of the image.

use std::sync::Arc;

use crate::color::Rgba;
use crate::error::EffectError;
use glam::DVec2;

/// A 2D color source addressable at normalized coordinates.
///
/// Implementations must be pure and must not panic for any input.
pub trait ImageSource: Send + Sync {
    /// Color at `uv`, with (0, 0) the bottom-left and (1, 1) the top-right corner.
    fn sample(&self, uv: DVec2) -> Rgba;
}

/// A single color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor(pub Rgba);

impl ImageSource for SolidColor {
    fn sample(&self, _uv: DVec2) -> Rgba {
        self.0
    }
}

/// An RGBA8 bitmap with bilinear filtering and clamp-to-edge addressing.
///
/// Rows are stored top first, as decoded image files are.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl Texture {
    /// Wraps a tightly packed RGBA8 buffer of `width * height * 4` bytes.
    ///
    /// Returns `EffectError::InvalidDimensions` for a zero or overflowing size,
    /// and `EffectError::DimensionMismatch` when the byte count is wrong.
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, EffectError> {
        if width == 0 || height == 0 {
            return Err(EffectError::InvalidDimensions);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EffectError::InvalidDimensions)?;
        if bytes.len() != expected {
            return Err(EffectError::DimensionMismatch {
                expected,
                got: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a texture by evaluating `f(x, y)` for every texel, top row first.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Rgba,
    ) -> Result<Self, EffectError> {
        if width == 0 || height == 0 {
            return Err(EffectError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(EffectError::InvalidDimensions)?;
        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y).to_rgba8());
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Texel at integer coordinates, clamped to the edge.
    pub fn texel(&self, x: isize, y: isize) -> Rgba {
        let xi = x.clamp(0, self.width as isize - 1) as usize;
        let yi = y.clamp(0, self.height as isize - 1) as usize;
        Rgba::from_rgba8(self.pixels[yi * self.width + xi])
    }
}

impl ImageSource for Texture {
    fn sample(&self, uv: DVec2) -> Rgba {
        let uv = if uv.is_finite() {
            uv.clamp(DVec2::ZERO, DVec2::ONE)
        } else {
            DVec2::splat(0.5)
        };
        // texel centres sit at half-integer positions
        let fx = uv.x * self.width as f64 - 0.5;
        let fy = (1.0 - uv.y) * self.height as f64 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = self.texel(x0, y0).mix(self.texel(x0 + 1, y0), tx);
        let bottom = self.texel(x0, y0 + 1).mix(self.texel(x0 + 1, y0 + 1), tx);
        top.mix(bottom, ty)
    }
}

/// The two images the effect composites.
#[derive(Clone)]
pub struct ImagePair {
    /// Revealed inside the trail blob and refracted along its edge.
    pub background: Arc<dyn ImageSource>,
    /// Shown everywhere the trail has not reached.
    pub overlay: Arc<dyn ImageSource>,
}

impl ImagePair {
    pub fn new(background: Arc<dyn ImageSource>, overlay: Arc<dyn ImageSource>) -> Self {
        Self {
            background,
            overlay,
        }
    }
}

impl std::fmt::Debug for ImagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePair").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: top row red, green; bottom row blue, white
        let bytes = [
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        Texture::from_rgba8(2, 2, &bytes).unwrap()
    }

    #[test]
    fn from_rgba8_validates_length() {
        assert!(matches!(
            Texture::from_rgba8(2, 2, &[0; 12]),
            Err(EffectError::DimensionMismatch {
                expected: 16,
                got: 12
            })
        ));
    }

    #[test]
    fn from_rgba8_rejects_zero_size() {
        assert!(matches!(
            Texture::from_rgba8(0, 2, &[]),
            Err(EffectError::InvalidDimensions)
        ));
    }

    #[test]
    fn texel_centres_sample_exactly() {
        let tex = checker();
        assert_eq!(tex.sample(DVec2::new(0.25, 0.75)).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(tex.sample(DVec2::new(0.75, 0.75)).to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(tex.sample(DVec2::new(0.25, 0.25)).to_rgba8(), [0, 0, 255, 255]);
        assert_eq!(tex.sample(DVec2::new(0.75, 0.25)).to_rgba8(), [255, 255, 255, 255]);
    }

    #[test]
    fn centre_sample_blends_all_four() {
        let c = checker().sample(DVec2::new(0.5, 0.5));
        assert!((c.r - 0.5).abs() < 1e-12);
        assert!((c.g - 0.5).abs() < 1e-12);
        assert!((c.b - 0.5).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_clamps_to_edge() {
        let tex = checker();
        assert_eq!(tex.sample(DVec2::new(-3.0, 5.0)), tex.sample(DVec2::new(0.0, 1.0)));
        assert_eq!(tex.sample(DVec2::new(-3.0, 5.0)).to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn non_finite_coordinates_do_not_panic() {
        let tex = checker();
        let c = tex.sample(DVec2::new(f64::NAN, f64::INFINITY));
        assert_eq!(c, tex.sample(DVec2::splat(0.5)));
    }

    #[test]
    fn solid_color_ignores_coordinates() {
        let s = SolidColor(Rgba::rgb(0.2, 0.4, 0.6));
        assert_eq!(s.sample(DVec2::new(-1.0, 9.0)), Rgba::rgb(0.2, 0.4, 0.6));
    }

    #[test]
    fn from_fn_matches_row_order() {
        let tex = Texture::from_fn(3, 2, |x, y| {
            Rgba::rgb(x as f64 / 2.0, y as f64, 0.0)
        })
        .unwrap();
        assert_eq!(tex.texel(2, 0).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(tex.texel(0, 1).to_rgba8(), [0, 255, 0, 255]);
        assert!((tex.aspect() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn image_source_is_object_safe() {
        let pair = ImagePair::new(
            Arc::new(SolidColor(Rgba::BLACK)),
            Arc::new(checker()),
        );
        assert_eq!(pair.background.sample(DVec2::ZERO), Rgba::BLACK);
    }
}
