use enumset::EnumSet;
use enumset::EnumSetType;
use tracing::debug;
use tracing::info;

use super::device::param;
use super::device::state_key;
use super::device::CommandName;
use super::device::Device;
use super::device::States;
use super::executor::Executor;
use crate::color::hs_to_rgb;
use crate::color::rgb_to_hs;
use crate::color::HsColor;
use crate::color::Rgb;
use crate::engine::Entity;
use crate::engine::LightState;
use crate::error::Result;

/// The only effect the hub offers for lights
pub const EFFECT_WINK: &str = "wink";

/// Argument sent with `wink`
const WINK_INTENSITY: u8 = 100;

/// Optional capabilities of a light, detected from its declared commands
#[derive(EnumSetType, Debug)]
pub enum LightFeature {
    Brightness,
    Effect,
    Color,
}

impl LightFeature {
    /// Capabilities advertised by a device definition
    pub fn detect(device: &Device) -> EnumSet<LightFeature> {
        let mut features = EnumSet::new();
        if device.supports(CommandName::SetIntensity) {
            features |= LightFeature::Brightness;
        }
        if device.supports(CommandName::Wink) {
            features |= LightFeature::Effect;
        }
        if device.supports(CommandName::SetRgb) {
            features |= LightFeature::Color;
        }
        features
    }
}

/// Parameters of a turn-on request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOn {
    pub hs_color: Option<HsColor>,
    /// Host brightness, 0-255
    pub brightness: Option<u8>,
    pub effect: Option<String>,
}

/// Host brightness (0-255) to hub intensity (0-100), rounding down
pub fn to_intensity(brightness: u8) -> u8 {
    (u16::from(brightness) * 100 / 255) as u8
}

/// Hub intensity (0-100) to host brightness (0-255), rounding down
pub fn to_brightness(intensity: u8) -> u8 {
    (u16::from(intensity.min(100)) * 255 / 100) as u8
}

/// Light entity backed by an Overkiz dimmable or colour light
pub struct OverkizLight {
    /// Entity ID (e.g., "light.garden")
    pub id: String,

    /// Human-readable name, the device label
    pub name: String,

    features: EnumSet<LightFeature>,
    executor: Executor,

    on: Option<bool>,
    /// Last known intensity on the hub scale (0-100)
    intensity: Option<u8>,
    rgb: Option<Rgb>,
    effect: Option<String>,
}

impl OverkizLight {
    pub fn new(id: String, device: &Device, executor: Executor) -> Self {
        Self {
            id,
            name: device.label.clone(),
            features: LightFeature::detect(device),
            executor,
            on: None,
            intensity: None,
            rgb: None,
            effect: None,
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn supported_features(&self) -> EnumSet<LightFeature> {
        self.features
    }

    pub fn is_on(&self) -> bool {
        self.on.unwrap_or(false)
    }

    /// Brightness between 0 and 255
    pub fn brightness(&self) -> Option<u8> {
        self.intensity.map(to_brightness)
    }

    /// Hue and saturation, only for lights that can change colour
    pub fn hs_color(&self) -> Option<HsColor> {
        if !self.features.contains(LightFeature::Color) {
            return None;
        }
        self.rgb.map(rgb_to_hs)
    }

    pub fn effect(&self) -> Option<&str> {
        self.effect.as_deref()
    }

    pub fn effect_list(&self) -> &'static [&'static str] {
        &[EFFECT_WINK]
    }

    pub fn state(&self) -> LightState {
        LightState {
            on: self.is_on(),
            brightness: self.brightness(),
            hs_color: self.hs_color(),
            effect: self.effect.clone(),
        }
    }

    /// Turn the light on
    ///
    /// A colour is applied first. Brightness, effect and plain `on` are
    /// exclusive, in that order of precedence.
    pub async fn turn_on(&mut self, req: TurnOn) -> Result<()> {
        self.on = Some(true);
        debug!("{} turn_on {:?}", self.id, req);

        if let Some(hs) = req.hs_color {
            let (r, g, b) = hs_to_rgb(hs);
            self.rgb = Some((r, g, b));
            self.executor
                .execute_and_wait(CommandName::SetRgb.with(vec![r.into(), g.into(), b.into()]))
                .await?;
        }

        if let Some(brightness) = req.brightness {
            let intensity = to_intensity(brightness);
            self.intensity = Some(intensity);
            self.executor
                .execute_and_wait(CommandName::SetIntensity.with(vec![intensity.into()]))
                .await?;
        } else if let Some(effect) = req.effect {
            self.effect = Some(effect);
            self.executor
                .execute_and_wait(CommandName::Wink.with(vec![WINK_INTENSITY.into()]))
                .await?;
        } else {
            self.executor
                .execute_and_wait(CommandName::On.into())
                .await?;
        }

        info!("Turned on light {}", self.id);
        Ok(())
    }

    /// Turn the light off
    pub async fn turn_off(&mut self) -> Result<()> {
        self.on = Some(false);
        self.executor
            .execute_and_wait(CommandName::Off.into())
            .await?;
        info!("Turned off light {}", self.id);
        Ok(())
    }

    /// Refresh the light from the hub
    ///
    /// States missing from the response keep their previous value.
    pub async fn update(&mut self) -> Result<()> {
        let states = self.executor.refresh_states().await?;
        self.apply_states(&states);
        Ok(())
    }

    fn apply_states(&mut self, states: &States) {
        if let Some(intensity) = states
            .get(state_key::LIGHT_INTENSITY)
            .and_then(|v| v.as_clamped_u8(100))
        {
            self.intensity = Some(intensity);
        }

        if let Some(on_off) = states.get(state_key::ON_OFF) {
            self.on = Some(on_off.as_str() == Some(param::ON));
        }

        let channel = |key: &str| states.get(key).and_then(|v| v.as_clamped_u8(255));
        if let (Some(r), Some(g), Some(b)) = (
            channel(state_key::RED_COLOR_INTENSITY),
            channel(state_key::GREEN_COLOR_INTENSITY),
            channel(state_key::BLUE_COLOR_INTENSITY),
        ) {
            self.rgb = Some((r, g, b));
        }
    }
}

impl Entity for OverkizLight {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn state_json(&self) -> serde_json::Value {
        serde_json::json!({
            "entity_id": self.id,
            "name": self.name,
            "platform": "light",
            "state": self.state(),
            "effect_list": self.effect_list(),
        })
    }

    fn platform(&self) -> &'static str {
        "light"
    }
}
