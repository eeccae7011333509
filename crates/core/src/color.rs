//! sRGB colors for canvas fills and strokes.

use crate::error::FlowError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex round-trip has 8-bit
/// quantization, which is all the rasterizer keeps anyway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);
    /// Warm grey used for windowed compositions.
    pub const ASH: Srgb = Srgb::new(0.38, 0.37, 0.32);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, FlowError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(FlowError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|e| FlowError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Components quantized to 8 bits with rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        let a = Srgb::from_hex("#ff8000").unwrap();
        let b = Srgb::from_hex("FF8000").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.r, 1.0);
        assert!((a.g - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(a.b, 0.0);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(matches!(Srgb::from_hex("#fff"), Err(FlowError::InvalidColor(_))));
        assert!(matches!(Srgb::from_hex("zz0000"), Err(FlowError::InvalidColor(_))));
        assert!(Srgb::from_hex("ééé").is_err());
    }

    #[test]
    fn ash_quantizes_to_expected_hex() {
        assert_eq!(Srgb::ASH.to_hex(), "#615e52");
    }

    #[test]
    fn to_rgb8_clamps_out_of_range() {
        assert_eq!(Srgb::new(1.5, -0.2, 0.5).to_rgb8(), [255, 0, 128]);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Srgb::WHITE).unwrap();
        assert_eq!(json, "\"#ffffff\"");
        let back: Srgb = serde_json::from_str("\"#000000\"").unwrap();
        assert_eq!(back, Srgb::BLACK);
    }
}
