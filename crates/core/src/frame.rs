//! Destination frame buffer for rendered frames.

use crate::color::Rgba;
use crate::error::EffectError;
use glam::DVec2;

/// A `width * height` grid of colors, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Framebuffer {
    /// Creates a frame filled with `color`.
    ///
    /// Returns `EffectError::InvalidDimensions` if either dimension is zero
    /// or `width * height` overflows.
    pub fn filled(width: usize, height: usize, color: Rgba) -> Result<Self, EffectError> {
        if width == 0 || height == 0 {
            return Err(EffectError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(EffectError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color; len],
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

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the frame.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Normalized coordinate of the centre of pixel `(x, y)`, `v` pointing up.
    pub fn uv_of(&self, x: usize, y: usize) -> DVec2 {
        pixel_center(x, y, self.width, self.height)
    }
}

/// Normalized centre of pixel `(x, y)` in a `width * height` frame stored
/// top row first.
pub fn pixel_center(x: usize, y: usize, width: usize, height: usize) -> DVec2 {
    DVec2::new(
        (x as f64 + 0.5) / width as f64,
        1.0 - (y as f64 + 0.5) / height as f64,
    )
}
