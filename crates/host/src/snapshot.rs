//! PNG input and output for the offline host.
//!
//! Feature-gated behind `png` (default on) so that hosts bringing their own
//! image decoding can skip the `image` crate. The pixel conversion itself
//! lives in [`crate::pixel`].

use liquid_reveal_core::{EffectError, Field, Framebuffer, Texture};
use std::path::Path;

use crate::pixel::{field_to_rgba, framebuffer_to_rgba};

/// Decodes an image file into a [`Texture`].
///
/// The top row of the file becomes the top of the texture (v = 1).
pub fn load_texture(path: &Path) -> Result<Texture, EffectError> {
    let img = image::open(path)
        .map_err(|e| EffectError::Io(format!("{}: {e}", path.display())))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    log::debug!("loaded {} ({w}x{h})", path.display());
    Texture::from_rgba8(w as usize, h as usize, img.as_raw())
}

/// Writes a rendered frame as a PNG image.
///
/// Returns `EffectError::InvalidDimensions` if the frame dimensions overflow
/// `u32`, or `EffectError::Io` on write failure.
pub fn write_png(frame: &Framebuffer, path: &Path) -> Result<(), EffectError> {
    save_rgba(frame.width(), frame.height(), framebuffer_to_rgba(frame), path)
}

/// Writes a scalar field as a grayscale PNG image.
pub fn write_field_png(field: &Field, path: &Path) -> Result<(), EffectError> {
    save_rgba(field.width(), field.height(), field_to_rgba(field), path)
}

fn save_rgba(width: usize, height: usize, rgba: Vec<u8>, path: &Path) -> Result<(), EffectError> {
    let w = u32::try_from(width).map_err(|_| EffectError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| EffectError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EffectError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EffectError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use liquid_reveal_core::{ImageSource, Rgba};

    #[test]
    fn write_png_then_load_texture() {
        let frame = Framebuffer::filled(16, 8, Rgba::rgb(1.0, 0.0, 0.0)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_png(&frame, &path).unwrap();

        let tex = load_texture(&path).unwrap();
        assert_eq!(tex.width(), 16);
        assert_eq!(tex.height(), 8);
        assert_eq!(tex.sample(liquid_reveal_core::DVec2::splat(0.5)), Rgba::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn write_field_png_is_grayscale() {
        let field = Field::from_data(2, 1, vec![0.0, 1.0]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy.png");

        write_field_png(&field, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn load_texture_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_texture(&dir.path().join("absent.png"));
        assert!(matches!(result, Err(EffectError::Io(_))));
    }
}
