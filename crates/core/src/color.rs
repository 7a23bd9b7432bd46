//! RGBA color type used by images, the compositor and frame buffers.
//!
//! Components are `f64` in [0, 1]. Mixing is plain linear interpolation in
//! whatever space the source images are stored in, which is what a texture
//! sampler followed by `mix` does on the GPU.

use crate::error::EffectError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An RGBA color with components in [0, 1].
///
/// Serializes as `"#rrggbb"` when opaque and `"#rrggbbaa"` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    /// Creates a color from all four components.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color from 8-bit channels.
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self {
            r: px[0] as f64 / 255.0,
            g: px[1] as f64 / 255.0,
            b: px[2] as f64 / 255.0,
            a: px[3] as f64 / 255.0,
        }
    }

    /// Quantizes to 8-bit channels, clamping out-of-range components.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// Linear interpolation `self * (1 - t) + other * t`, per channel.
    ///
    /// `t = 0` returns `self` exactly and `t = 1` returns `other` exactly.
    pub fn mix(self, other: Rgba, t: f64) -> Rgba {
        Rgba {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
            a: lerp(self.a, other.a, t),
        }
    }

    /// Returns the same color with alpha forced to 1.
    pub fn opaque(self) -> Rgba {
        Rgba { a: 1.0, ..self }
    }

    /// Parses `"#rrggbb"`, `"#rrggbbaa"` or the same without the `#`.
    pub fn from_hex(hex: &str) -> Result<Rgba, EffectError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(EffectError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got {}",
                hex.len()
            )));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EffectError::InvalidColor(format!("invalid hex color '{hex}'")));
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| EffectError::InvalidColor(format!("invalid hex color '{hex}'")))
        };
        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;
        let a = if hex.len() == 8 { channel(6..8)? } else { 255 };
        Ok(Rgba::from_rgba8([r, g, b, a]))
    }

    /// Formats as `"#rrggbb"`, or `"#rrggbbaa"` when not fully opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

fn quantize(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_at_zero_is_exactly_self() {
        let a = Rgba::new(0.1, 0.2, 0.3, 0.4);
        let b = Rgba::new(0.9, 0.8, 0.7, 1.0);
        assert_eq!(a.mix(b, 0.0), a);
    }

    #[test]
    fn mix_at_one_is_exactly_other() {
        let a = Rgba::new(0.3, 0.1, 0.7, 0.2);
        let b = Rgba::new(0.9, 0.5, 0.25, 1.0);
        assert_eq!(a.mix(b, 1.0), b);
    }

    #[test]
    fn mix_midpoint() {
        let m = Rgba::BLACK.mix(Rgba::WHITE, 0.5);
        assert!((m.r - 0.5).abs() < 1e-12);
        assert!((m.a - 1.0).abs() < 1e-12);
    }

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        let a = Rgba::from_hex("#ff8000").unwrap();
        let b = Rgba::from_hex("FF8000").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_rgba8(), [255, 128, 0, 255]);
    }

    #[test]
    fn from_hex_parses_alpha() {
        let c = Rgba::from_hex("#00000080").unwrap();
        assert_eq!(c.to_rgba8()[3], 128);
        assert_eq!(c.to_hex(), "#00000080");
    }

    #[test]
    fn from_hex_rejects_bad_length() {
        assert!(matches!(
            Rgba::from_hex("#fff"),
            Err(EffectError::InvalidColor(_))
        ));
    }

    #[test]
    fn from_hex_rejects_non_hex_digits() {
        assert!(Rgba::from_hex("#gg0000").is_err());
        assert!(Rgba::from_hex("#+f+f+f").is_err());
        assert!(Rgba::from_hex("+f+f+f+f").is_err());
    }

    #[test]
    fn to_rgba8_clamps_out_of_range() {
        let c = Rgba::new(-0.5, 1.5, 0.5, 2.0);
        assert_eq!(c.to_rgba8(), [0, 255, 128, 255]);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c = Rgba::rgb(1.0, 0.0, 0.0);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn opaque_forces_alpha() {
        assert_eq!(Rgba::new(0.2, 0.2, 0.2, 0.1).opaque().a, 1.0);
    }
}
