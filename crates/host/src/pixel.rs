//! Pixel buffer conversion from [`Framebuffer`] and [`Field`].
//!
//! Always available (no feature gate) so that hosts without the `png`
//! feature can still hand raw RGBA8 buffers to their own display path.

use liquid_reveal_core::{Field, Framebuffer};

/// Quantizes a frame to an RGBA8 buffer, top row first.
///
/// The buffer length is `width * height * 4`.
pub fn framebuffer_to_rgba(frame: &Framebuffer) -> Vec<u8> {
    frame.pixels().iter().flat_map(|px| px.to_rgba8()).collect()
}

/// Maps field values in [0, 1] to opaque gray levels.
///
/// Values outside [0, 1] are clamped; NaN maps to black.
pub fn field_to_rgba(field: &Field) -> Vec<u8> {
    field
        .data()
        .iter()
        .flat_map(|&t| {
            let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
            let v = (t * 255.0).round() as u8;
            [v, v, v, 255u8]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use liquid_reveal_core::Rgba;

    #[test]
    fn framebuffer_to_rgba_correct_length() {
        let frame = Framebuffer::filled(8, 4, Rgba::WHITE).unwrap();
        assert_eq!(framebuffer_to_rgba(&frame).len(), 8 * 4 * 4);
    }

    #[test]
    fn framebuffer_to_rgba_keeps_channel_order() {
        let frame = Framebuffer::filled(1, 1, Rgba::rgb(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(framebuffer_to_rgba(&frame), vec![255, 0, 0, 255]);
    }

    #[test]
    fn field_to_rgba_alpha_always_255() {
        let field = Field::from_data(2, 2, vec![0.0, 0.3, 0.7, 1.0]).unwrap();
        let buf = field_to_rgba(&field);
        for (i, &byte) in buf.iter().enumerate() {
            if i % 4 == 3 {
                assert_eq!(byte, 255, "alpha at pixel {} should be 255", i / 4);
            }
        }
    }

    #[test]
    fn field_to_rgba_clamps_out_of_range_values() {
        let field = Field::from_data(3, 1, vec![-2.0, 7.0, f64::NAN]).unwrap();
        let buf = field_to_rgba(&field);
        assert_eq!(&buf[0..3], &[0, 0, 0]);
        assert_eq!(&buf[4..7], &[255, 255, 255]);
        assert_eq!(&buf[8..11], &[0, 0, 0]);
    }
}
