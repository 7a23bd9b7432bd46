//! Scalar grid used to snapshot the energy field and masks for inspection.
//!
//! A `Field` stores `width * height` f64 values in row-major order, top row
//! first, matching [`Framebuffer`](crate::frame::Framebuffer) layout.
//! Reads outside the grid clamp to the nearest edge cell.

use crate::error::EffectError;

/// A 2D grid of scalar values.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    /// Creates a zero-filled field.
    ///
    /// Returns `EffectError::InvalidDimensions` if either dimension is zero
    /// or `width * height` overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, EffectError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Creates a field from row-major data.
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, EffectError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(EffectError::DimensionMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Value at `(x, y)`, clamped to the grid edge.
    pub fn get(&self, x: isize, y: isize) -> f64 {
        let xi = x.clamp(0, self.width as isize - 1) as usize;
        let yi = y.clamp(0, self.height as isize - 1) as usize;
        self.data[yi * self.width + xi]
    }

    /// Sets the value at `(x, y)`. Out-of-grid writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    /// Smallest and largest value in the grid.
    pub fn range(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Iterates over all cells yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, v)
        })
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, EffectError> {
    if width == 0 || height == 0 {
        return Err(EffectError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(EffectError::InvalidDimensions)
}
