use serde::Deserialize;
use serde::Serialize;

use crate::color::HsColor;

/// State of a light entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LightState {
    /// Whether the light is on or off.
    pub on: bool,

    /// Brightness level (0-255), if known.
    pub brightness: Option<u8>,

    /// Hue and saturation, only for lights that can change colour.
    pub hs_color: Option<HsColor>,

    /// Active effect name, if one was requested.
    pub effect: Option<String>,
}

/// State of a siren entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SirenState {
    /// Whether the hub reports the siren as sounding.
    pub on: bool,
}
