//! sRGB <-> OKLCH conversion.

use super::Color;

/// A color in the OKLCH space: perceptual lightness, chroma and hue
/// (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

impl From<Color> for Oklch {
    fn from(color: Color) -> Self {
        let r = srgb_to_linear(color.r as f64 / 255.0);
        let g = srgb_to_linear(color.g as f64 / 255.0);
        let b = srgb_to_linear(color.b as f64 / 255.0);

        let l = (0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b).cbrt();
        let m = (0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b).cbrt();
        let s = (0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b).cbrt();

        let lightness = 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s;
        let a = 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s;
        let bb = 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s;

        Oklch {
            l: lightness,
            c: (a * a + bb * bb).sqrt(),
            h: bb.atan2(a).to_degrees().rem_euclid(360.0),
        }
    }
}

impl From<Oklch> for Color {
    fn from(lch: Oklch) -> Self {
        let hue = lch.h.to_radians();
        let a = lch.c * hue.cos();
        let b = lch.c * hue.sin();

        let l = (lch.l + 0.3963377774 * a + 0.2158037573 * b).powi(3);
        let m = (lch.l - 0.1055613458 * a - 0.0638541728 * b).powi(3);
        let s = (lch.l - 0.0894841775 * a - 1.2914855480 * b).powi(3);

        let r = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
        let g = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
        let bl = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

        let channel = |v: f64| (linear_to_srgb(v).clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::new(channel(r), channel(g), channel(bl))
    }
}
