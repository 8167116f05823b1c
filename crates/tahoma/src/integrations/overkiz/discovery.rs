use std::collections::HashSet;

use strum::AsRefStr;
use strum::Display;

use super::device::Device;

/// Host platforms this integration provides entities for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    Light,
    Siren,
}

impl Platform {
    fn lookup(name: &str) -> Option<Platform> {
        match name {
            "Light" => Some(Platform::Light),
            "Siren" => Some(Platform::Siren),
            _ => None,
        }
    }

    /// Platform of a device, by widget first and UI class second
    pub fn for_device(device: &Device) -> Option<Platform> {
        Self::lookup(&device.widget).or_else(|| Self::lookup(&device.ui_class))
    }
}

/// Lower-case `label`, keeping ASCII alphanumerics and collapsing the rest to `_`
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("unnamed");
    }
    slug
}

/// Hands out unique entity ids of the form `<platform>.<slug>`
#[derive(Debug, Default)]
pub struct EntityIds {
    taken: HashSet<String>,
}

impl EntityIds {
    /// Entity id for `label`, suffixed with `_2`, `_3`... when already used
    pub fn assign(&mut self, platform: Platform, label: &str) -> String {
        let base = format!("{}.{}", platform, slugify(label));
        let mut id = base.clone();
        let mut n = 2;
        while self.taken.contains(&id) {
            id = format!("{}_{}", base, n);
            n += 1;
        }
        self.taken.insert(id.clone());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::overkiz::device::Definition;
    use crate::integrations::overkiz::device::DeviceUrl;

    fn device(widget: &str, ui_class: &str) -> Device {
        Device {
            device_url: DeviceUrl::from("io://1234/1"),
            label: "Device".to_string(),
            widget: widget.to_string(),
            ui_class: ui_class.to_string(),
            definition: Definition::default(),
            available: true,
        }
    }

    #[test]
    fn test_platform_mapping() {
        assert_eq!(
            Platform::for_device(&device("DimmerLight", "Light")),
            Some(Platform::Light)
        );
        assert_eq!(
            Platform::for_device(&device("SirenStatus", "Siren")),
            Some(Platform::Siren)
        );
        assert_eq!(
            Platform::for_device(&device("PositionableRollerShutter", "RollerShutter")),
            None
        );
    }

    #[test]
    fn test_widget_takes_precedence() {
        assert_eq!(
            Platform::for_device(&device("Siren", "Light")),
            Some(Platform::Siren)
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Garden light"), "garden_light");
        assert_eq!(slugify("  Salle à manger (RGB) "), "salle_manger_rgb");
        assert_eq!(slugify("---"), "unnamed");
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut ids = EntityIds::default();
        assert_eq!(ids.assign(Platform::Light, "Porch"), "light.porch");
        assert_eq!(ids.assign(Platform::Light, "Porch"), "light.porch_2");
        assert_eq!(ids.assign(Platform::Siren, "Porch"), "siren.porch");
        assert_eq!(ids.assign(Platform::Light, "porch"), "light.porch_3");
    }
}
