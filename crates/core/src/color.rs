//! Color types for scene fills and strokes.
//!
//! Scenes are shaded in HSL: every building face is a fixed lightness offset
//! from a shared per-building hue, which keeps the shading table trivial.
//! [`Hsla`] renders as CSS `hsl(h s% l% / a)`; [`Srgb`] is used for opaque
//! backgrounds and frame borders and renders as `"#rrggbb"`.

use crate::error::SceneError;

/// HSL color with alpha. Hue in degrees, saturation and lightness in percent,
/// alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    pub fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self { h, s, l, a }
    }

    /// Opaque color.
    pub fn opaque(h: f64, s: f64, l: f64) -> Self {
        Self::new(h, s, l, 1.0)
    }

    /// Hue wrapped into [0, 360).
    pub fn hue(&self) -> f64 {
        self.h.rem_euclid(360.0)
    }

    /// Returns the color with its hue rotated by `degrees`.
    pub fn rotate(self, degrees: f64) -> Self {
        Self {
            h: self.h + degrees,
            ..self
        }
    }

    /// Returns the color with alpha multiplied by `factor`, clamped to [0, 1].
    pub fn fade(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS Color 4 notation, e.g. `hsl(204 45% 55% / 0.9)`.
    pub fn to_css(&self) -> String {
        let s = self.s.clamp(0.0, 100.0);
        let l = self.l.clamp(0.0, 100.0);
        let a = self.a.clamp(0.0, 1.0);
        format!("hsl({} {}% {}% / {})", trim(self.hue()), trim(s), trim(l), trim(a))
    }
}

/// Formats with at most three decimals and no trailing zeros.
fn trim(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parses `"#rrggbb"` or `"rrggbb"`, case insensitive.
    pub fn from_hex(hex: &str) -> Result<Srgb, SceneError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(SceneError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| SceneError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// `"#rrggbb"`, components clamped and rounded to 8 bits.
    pub fn to_hex(self) -> String {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn css_wraps_hue_and_trims_decimals() {
        let c = Hsla::new(370.0, 62.0, 38.0, 1.0);
        assert_eq!(c.to_css(), "hsl(10 62% 38% / 1)");
        let c = Hsla::new(-6.0, 45.0, 55.0, 0.18);
        assert_eq!(c.to_css(), "hsl(354 45% 55% / 0.18)");
    }

    #[test]
    fn fade_multiplies_and_clamps_alpha() {
        let c = Hsla::new(0.0, 50.0, 50.0, 0.6).fade(0.5);
        assert!(approx(c.a, 0.3));
        assert!(approx(c.fade(10.0).a, 1.0));
        assert!(approx(c.fade(-1.0).a, 0.0));
    }

    #[test]
    fn rotate_keeps_saturation_and_lightness() {
        let c = Hsla::opaque(350.0, 62.0, 72.0).rotate(12.0);
        assert!(approx(c.hue(), 2.0));
        assert!(approx(c.s, 62.0));
        assert!(approx(c.l, 72.0));
    }

    #[test]
    fn hex_round_trip() {
        let c = Srgb::from_hex("#121212").unwrap();
        assert_eq!(c.to_hex(), "#121212");
        assert_eq!(Srgb::from_hex("FFFFFF").unwrap(), Srgb::WHITE);
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!(Srgb::from_hex("#12345").is_err());
        assert!(Srgb::from_hex("#zz0000").is_err());
    }
}
