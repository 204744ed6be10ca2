//! Colour Model
//!
//! lightningcss parses every CSS colour syntax and converts it to sRGB.
//! This module only decides how the result is written to the output: the
//! shortest hex form or `rgb()`/`rgba()` with a chosen precision.

use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;

/// sRGB colour. Channels are `0..=255`, alpha is `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse any colour syntax lightningcss understands
    pub fn parse(text: &str) -> Option<Self> {
        let color = CssColor::parse_string(text.trim()).ok()?;
        Self::from_css(&color)
    }

    /// Convert a parsed colour to sRGB.
    ///
    /// `currentColor`, system colours and `light-dark()` have no fixed
    /// value and return `None`.
    pub fn from_css(color: &CssColor) -> Option<Self> {
        match color.to_rgb().ok()? {
            CssColor::RGBA(rgba) => Some(Self::rgba(
                f64::from(rgba.red),
                f64::from(rgba.green),
                f64::from(rgba.blue),
                f64::from(rgba.alpha) / 255.0,
            )),
            _ => None,
        }
    }

    fn bytes(&self) -> [u8; 4] {
        [
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
            (self.a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }

    /// Shortest hex form: `#f00`, `#008000`, `#ff000080`
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.bytes();
        let mut channels = vec![r, g, b];
        if a != 255 {
            channels.push(a);
        }
        let short = channels.iter().all(|c| c >> 4 == c & 0xf);
        let mut out = String::from("#");
        for c in channels {
            if short {
                out.push_str(&format!("{:x}", c & 0xf));
            } else {
                out.push_str(&format!("{:02x}", c));
            }
        }
        out
    }

    /// `rgb(r, g, b)` or `rgba(r, g, b, a)` with the given decimal precision
    pub fn to_rgba_string(&self, precision: Option<u32>) -> String {
        let fmt = |value: f64| match precision {
            Some(p) => {
                let factor = 10f64.powi(p as i32);
                crate::value::format_number((value * factor).round() / factor)
            }
            None => crate::value::format_number(value.round()),
        };
        let alpha = |value: f64| crate::value::format_number((value * 1000.0).round() / 1000.0);
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", fmt(self.r), fmt(self.g), fmt(self.b))
        } else {
            format!("rgba({}, {}, {}, {})", fmt(self.r), fmt(self.g), fmt(self.b), alpha(self.a))
        }
    }

    /// Serialize according to the compiler's output settings
    pub fn serialize(&self, hex: bool, precision: Option<u32>) -> String {
        if hex && precision.is_none() {
            self.to_hex()
        } else {
            self.to_rgba_string(precision)
        }
    }
}
