//! 8-bit RGBA colors.

use serde::{Deserialize, Serialize};

/// An unpremultiplied RGBA color with 8 bits per channel.
///
/// ```
/// use vellum_paint::Color;
///
/// let c = Color::from_hex("#ff8000").unwrap();
/// assert_eq!(c, Color::from_rgb8(255, 128, 0));
/// assert_eq!(c.to_argb(), 0xffff8000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a color from 8-bit RGBA components.
    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit RGB components.
    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 0xff)
    }

    /// Create a color from a packed `0xAARRGGBB` value.
    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack into a `0xAARRGGBB` value.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Create a color from hue (degrees), saturation and lightness (percent).
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32, alpha: u8) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        if s.abs() <= 0.001 {
            let v = channel(l);
            return Self::from_rgba8(v, v, v, alpha);
        }

        let v2 = if l < 0.5 { l * (1.0 + s) } else { (l + s) - s * l };
        let v1 = 2.0 * l - v2;
        Self::from_rgba8(
            channel(hue_to_rgb(v1, v2, h + 1.0 / 3.0)),
            channel(hue_to_rgb(v1, v2, h)),
            channel(hue_to_rgb(v1, v2, h - 1.0 / 3.0)),
            alpha,
        )
    }

    /// Create a color from a hex string: `#rgb`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            3 => {
                let nibble = |i: usize| byte(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::from_rgb8(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 | 8 => {
                let r = byte(&hex[0..2])?;
                let g = byte(&hex[2..4])?;
                let b = byte(&hex[4..6])?;
                let a = if hex.len() == 8 { byte(&hex[6..8])? } else { 0xff };
                Some(Self::from_rgba8(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Return a new color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { a: alpha, ..self }
    }

    /// Return a new color with alpha scaled by `opacity` (0.0-1.0).
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        self.with_alpha(channel(self.a as f32 / 255.0 * opacity.clamp(0.0, 1.0)))
    }

    /// Whether the color is fully opaque.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 0xff
    }

    /// Linear interpolation between two colors.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let mix = |a: u8, b: u8| channel((a as f32 + (b as f32 - a as f32) * t) / 255.0);
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Convert to normalized `[r, g, b, a]`, not premultiplied.
    #[inline]
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    // Common colors
    pub const TRANSPARENT: Self = Self::from_rgba8(0, 0, 0, 0);
    pub const BLACK: Self = Self::from_rgb8(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb8(255, 255, 255);
    pub const RED: Self = Self::from_rgb8(255, 0, 0);
    pub const GREEN: Self = Self::from_rgb8(0, 255, 0);
    pub const BLUE: Self = Self::from_rgb8(0, 0, 255);
    pub const YELLOW: Self = Self::from_rgb8(255, 255, 0);
    pub const CYAN: Self = Self::from_rgb8(0, 255, 255);
    pub const MAGENTA: Self = Self::from_rgb8(255, 0, 255);
    pub const GRAY: Self = Self::from_rgb8(128, 128, 128);
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Self::from_argb(argb)
    }
}

/// Round a normalized channel value to 8 bits.
#[inline]
fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hue_to_rgb(v1: f32, v2: f32, mut h: f32) -> f32 {
    if h < 0.0 {
        h += 1.0;
    }
    if h > 1.0 {
        h -= 1.0;
    }
    if 6.0 * h < 1.0 {
        return v1 + (v2 - v1) * 6.0 * h;
    }
    if 2.0 * h < 1.0 {
        return v2;
    }
    if 3.0 * h < 2.0 {
        return v1 + (v2 - v1) * (2.0 / 3.0 - h) * 6.0;
    }
    v1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_round_trip() {
        let c = Color::from_argb(0x80112233);
        assert_eq!(c, Color::from_rgba8(0x11, 0x22, 0x33, 0x80));
        assert_eq!(c.to_argb(), 0x80112233);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("00ff0080"), Some(Color::GREEN.with_alpha(0x80)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
        assert_eq!(Color::from_hex("#+f+f+f"), None);
        assert_eq!(Color::from_hex("+fff"), None);
    }

    #[test]
    fn test_from_hsl() {
        assert_eq!(Color::from_hsl(0.0, 100.0, 50.0, 255), Color::RED);
        assert_eq!(Color::from_hsl(120.0, 100.0, 50.0, 255), Color::GREEN);
        assert_eq!(Color::from_hsl(240.0, 100.0, 50.0, 255), Color::BLUE);
        assert_eq!(Color::from_hsl(0.0, 0.0, 100.0, 10), Color::WHITE.with_alpha(10));
    }

    #[test]
    fn test_opacity_and_lerp() {
        assert_eq!(Color::BLACK.with_opacity(0.5).a, 128);
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 0.5), Color::from_rgb8(128, 128, 128));
        assert!(Color::RED.is_opaque());
        assert!(!Color::TRANSPARENT.is_opaque());
    }

    #[test]
    fn test_to_f32_array() {
        assert_eq!(Color::RED.to_f32_array(), [1.0, 0.0, 0.0, 1.0]);
    }
}
