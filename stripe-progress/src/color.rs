/// 8-bit RGBA colour, parsed from `#RRGGBB` / `#AARRGGBB` style strings.

use serde::Deserialize;

use crate::error::StyleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// Linear mix towards `other`; `t` is clamped to [0, 1].
    pub fn blend(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Parse `#RRGGBB` or `#AARRGGBB` (alpha first).
    pub fn from_hex(s: &str) -> Result<Self, StyleError> {
        let invalid = || StyleError::InvalidColor(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => Err(invalid()),
        }
    }

    /// Premultiplied form, as stored in a tiny-skia pixmap.
    pub fn premultiplied(self) -> tiny_skia::PremultipliedColorU8 {
        self.to_skia().premultiply().to_color_u8()
    }
}

impl TryFrom<String> for Color {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_argb() {
        assert_eq!(Color::from_hex("#3F51B5").unwrap(), Color::rgb(0x3F, 0x51, 0xB5));
        assert_eq!(
            Color::from_hex("#80FF0000").unwrap(),
            Color::rgba(0xFF, 0x00, 0x00, 0x80)
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["3F51B5", "#3F51B", "#GG0000", "#", "#+1+1+1"] {
            assert!(
                matches!(Color::from_hex(bad), Err(StyleError::InvalidColor(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn deserializes_from_string() {
        let c: Color = serde_json::from_str("\"#00FF00\"").unwrap();
        assert_eq!(c, Color::rgb(0, 255, 0));
        assert!(serde_json::from_str::<Color>("\"green\"").is_err());
    }

    #[test]
    fn blend_mixes_channels() {
        let black = Color::rgb(0, 0, 0);
        let ink = Color::rgba(200, 100, 50, 155);
        assert_eq!(black.blend(ink, 0.0), black);
        assert_eq!(black.blend(ink, 1.0), ink);
        assert_eq!(black.blend(ink, 0.5), Color::rgba(100, 50, 25, 205));
        assert_eq!(black.blend(ink, 7.0), ink);
    }
}
