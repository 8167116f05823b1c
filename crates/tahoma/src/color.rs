//! Colour conversions between the host's hue/saturation model and the
//! 8-bit RGB channels used by the hub.

use palette::encoding;
use palette::FromColor;
use palette::Hsv;
use palette::Srgb;
use serde::Deserialize;
use serde::Serialize;

/// Hue (0-360 degrees) and saturation (0-100 percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsColor {
    pub hue: f64,
    pub saturation: f64,
}

impl HsColor {
    pub fn new(hue: f64, saturation: f64) -> Self {
        Self { hue, saturation }
    }
}

/// Red, green and blue channels
pub type Rgb = (u8, u8, u8);

/// Convert a hue/saturation pair at full value to RGB.
///
/// Channels are truncated, not rounded.
pub fn hs_to_rgb(color: HsColor) -> Rgb {
    let hsv: Hsv<encoding::Srgb, f64> = Hsv::new(
        color.hue,
        (color.saturation / 100.0).clamp(0.0, 1.0),
        1.0,
    );
    let rgb = Srgb::<f64>::from_color(hsv);
    (channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

/// Convert RGB to hue/saturation, each rounded to three decimals
pub fn rgb_to_hs((r, g, b): Rgb) -> HsColor {
    let rgb: Srgb<f64> = Srgb::new(r, g, b).into_format();
    let hsv: Hsv<encoding::Srgb, f64> = Hsv::from_color(rgb);
    HsColor {
        hue: round3(hsv.hue.into_positive_degrees()),
        saturation: round3(hsv.saturation * 100.0),
    }
}

fn channel(x: f64) -> u8 {
    (x * 255.0).clamp(0.0, 255.0) as u8
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
