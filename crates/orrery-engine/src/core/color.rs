use serde::{Deserialize, Serialize};

/// Linear RGB color, components nominally in 0..1 (HDR values may exceed 1).
///
/// Deserializes from `"#rrggbb"`, `"0xrrggbb"`, a packed integer, or `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "[f32; 3]")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Color from hue, saturation and lightness.
    /// Hue wraps modulo 1; saturation and lightness are clamped to 0..1.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Self::new(l, l, l);
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self {
            r: hue_to_rgb(p, q, h + 1.0 / 3.0),
            g: hue_to_rgb(p, q, h),
            b: hue_to_rgb(p, q, h - 1.0 / 3.0),
        }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    /// RGBA quad for vertex writers.
    pub fn with_alpha(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Packed(u32),
    Triple([f32; 3]),
}

impl TryFrom<ColorRepr> for Rgb {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Packed(v) => Ok(Rgb::from_hex(v)),
            ColorRepr::Triple(c) => Ok(Rgb::from(c)),
            ColorRepr::Hex(s) => {
                let digits = s
                    .strip_prefix('#')
                    .or_else(|| s.strip_prefix("0x"))
                    .unwrap_or(&s);
                if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(format!("expected 6 hex digits, got {s:?}"));
                }
                u32::from_str_radix(digits, 16)
                    .map(Rgb::from_hex)
                    .map_err(|e| format!("bad hex color {s:?}: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_hex_unpacks_channels() {
        let c = Rgb::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert_relative_eq!(c.g, 128.0 / 255.0);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn hsl_primaries() {
        let red = Rgb::from_hsl(0.0, 1.0, 0.5);
        assert_relative_eq!(red.r, 1.0);
        assert_relative_eq!(red.g, 0.0, epsilon = 1e-5);
        assert_relative_eq!(red.b, 0.0, epsilon = 1e-5);

        let blue = Rgb::from_hsl(2.0 / 3.0, 1.0, 0.5);
        assert_relative_eq!(blue.b, 1.0, epsilon = 1e-5);
        assert_relative_eq!(blue.r, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn hsl_hue_wraps_and_lightness_clamps() {
        let a = Rgb::from_hsl(1.25, 1.0, 0.5);
        let b = Rgb::from_hsl(0.25, 1.0, 0.5);
        assert_relative_eq!(a.r, b.r, epsilon = 1e-5);
        assert_relative_eq!(a.g, b.g, epsilon = 1e-5);

        let white = Rgb::from_hsl(0.3, 1.0, 3.0);
        assert_eq!(white, Rgb::WHITE);
    }

    #[test]
    fn zero_saturation_is_grey() {
        let c = Rgb::from_hsl(0.7, 0.0, 0.4);
        assert_eq!(c, Rgb::new(0.4, 0.4, 0.4));
    }

    #[test]
    fn deserializes_all_forms() {
        let a: Rgb = serde_json::from_str("\"#ff0000\"").unwrap();
        let b: Rgb = serde_json::from_str("\"0xff0000\"").unwrap();
        let c: Rgb = serde_json::from_str("16711680").unwrap();
        let d: Rgb = serde_json::from_str("[1.0, 0.0, 0.0]").unwrap();
        assert_eq!(a, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(serde_json::from_str::<Rgb>("\"#ff00\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#gg0000\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#+12345\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"0x-12345\"").is_err());
    }
}
