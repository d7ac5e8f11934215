//! Color model.
//!
//! A [`Color`] is three 8-bit sRGB channels. Every textual form (`#rrggbb`,
//! `rgb(...)`, the alpha variants) is derived from the channels, and
//! [`parse_hex`] is the only way text becomes a color.

mod oklch;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

pub use oklch::Oklch;

/// Errors produced by color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color `{0}`: expected 6 hex digits with an optional leading `#`")]
    InvalidHex(String),
}

/// Alpha suffix used by the alpha-carrying hex formats.
const OPAQUE_ALPHA: &str = "ff";

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{}", self.hex_bare())
    }

    /// `rrggbb`
    pub fn hex_bare(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#rrggbbff`
    pub fn hex_alpha(&self) -> String {
        format!("{}{}", self.hex(), OPAQUE_ALPHA)
    }

    /// `rrggbbff`
    pub fn hex_bare_alpha(&self) -> String {
        format!("{}{}", self.hex_bare(), OPAQUE_ALPHA)
    }

    /// `rgb(r, g, b)`
    pub fn rgb(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, 1)`
    pub fn rgba(&self) -> String {
        format!("rgba({}, {}, {}, 1)", self.r, self.g, self.b)
    }

    /// Channels normalized to `0.0..=1.0`.
    pub fn to_unit(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Builds a color from normalized channels, clamping out-of-range input.
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Raises OKLCH lightness by `percent` points.
    pub fn brighten(&self, percent: f64) -> Color {
        self.shift_lightness(percent / 100.0)
    }

    /// Lowers OKLCH lightness by `percent` points.
    pub fn darken(&self, percent: f64) -> Color {
        self.shift_lightness(-percent / 100.0)
    }

    fn shift_lightness(&self, delta: f64) -> Color {
        if delta == 0.0 {
            return *self;
        }
        let mut lch = Oklch::from(*self);
        lch.l = (lch.l + delta).clamp(0.0, 1.0);
        lch.into()
    }
}

/// Parses `#rrggbb` or `rrggbb`.
pub fn parse_hex(s: &str) -> Result<Color, ColorError> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(s.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::InvalidHex(s.to_string()))
    };
    Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

/// A color with text decoration flags, produced for syntax entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Style {
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_hex_accepts_optional_hash() {
        assert_eq!(parse_hex("#191724"), Ok(Color::new(0x19, 0x17, 0x24)));
        assert_eq!(parse_hex("EBBCBA"), Ok(Color::new(0xeb, 0xbc, 0xba)));
    }

    #[test]
    fn test_parse_hex_rejects_malformed() {
        for input in ["", "#", "#12345", "#1234567", "#zzzzzz", "##191724", "#19 724"] {
            assert_eq!(
                parse_hex(input),
                Err(ColorError::InvalidHex(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_formats() {
        let c = Color::new(0x09, 0x0a, 0xff);
        assert_eq!(c.hex(), "#090aff");
        assert_eq!(c.hex_bare(), "090aff");
        assert_eq!(c.hex_alpha(), "#090affff");
        assert_eq!(c.hex_bare_alpha(), "090affff");
        assert_eq!(c.rgb(), "rgb(9, 10, 255)");
        assert_eq!(c.rgba(), "rgba(9, 10, 255, 1)");
        assert_eq!(c.to_string(), "#090aff");
    }

    #[test]
    fn test_brighten_and_darken_extremes() {
        assert_eq!(Color::BLACK.brighten(100.0), Color::WHITE);
        assert_eq!(Color::WHITE.darken(100.0), Color::BLACK);
        assert_eq!(Color::WHITE.brighten(10.0), Color::WHITE);
    }

    #[test]
    fn test_brighten_zero_is_identity() {
        let c = Color::new(0x31, 0x74, 0x8f);
        assert_eq!(c.brighten(0.0), c);
        assert_eq!(c.darken(0.0), c);
    }

    #[test]
    fn test_brighten_raises_lightness() {
        let base = Color::new(0x19, 0x17, 0x24);
        let lighter = base.brighten(10.0);
        let darker = base.darken(5.0);
        assert!(Oklch::from(lighter).l > Oklch::from(base).l);
        assert!(Oklch::from(darker).l < Oklch::from(base).l);
    }

    proptest! {
        #[test]
        fn prop_hex_roundtrip(r: u8, g: u8, b: u8) {
            let c = Color::new(r, g, b);
            prop_assert_eq!(parse_hex(&c.hex()), Ok(c));
            prop_assert_eq!(parse_hex(&c.hex_bare()), Ok(c));
        }

        #[test]
        fn prop_oklch_roundtrip(r: u8, g: u8, b: u8) {
            let c = Color::new(r, g, b);
            prop_assert_eq!(Color::from(Oklch::from(c)), c);
        }
    }
}
