//! Type-safe message system between the host and integrations
//!
//! Messages are split by direction to enforce correct usage at compile time:
//! - `FromIntegrationMessage`: Events from integrations to the host
//! - `ToIntegrationMessage`: Commands from the host to integrations

use super::state::LightState;
use super::state::SirenState;
use crate::color::HsColor;
use crate::integrations::overkiz::Parameter;

/// Messages FROM integrations TO the host (events/state updates)
#[derive(Debug, Clone, PartialEq)]
pub enum FromIntegrationMessage {
    /// An entity was discovered and registered
    EntityDiscovered {
        entity_id: String,
        integration_name: String,
    },

    /// An entity was removed (integration unloaded, device gone, etc.)
    EntityRemoved { entity_id: String },

    /// A light's state changed
    LightStateChanged { entity_id: String, state: LightState },

    /// A siren's state changed
    SirenStateChanged { entity_id: String, state: SirenState },
}

/// Messages FROM the host TO integrations (commands)
#[derive(Debug, Clone, PartialEq)]
pub enum ToIntegrationMessage {
    /// Turn a light on, optionally changing colour, brightness or effect
    LightTurnOn {
        entity_id: String,
        hs_color: Option<HsColor>,
        brightness: Option<u8>,
        effect: Option<String>,
    },

    /// Turn a light off
    LightTurnOff { entity_id: String },

    /// Start a siren; `duration` is in seconds
    SirenTurnOn {
        entity_id: String,
        duration: Option<u32>,
    },

    /// Stop a siren
    SirenTurnOff { entity_id: String },

    /// Send an arbitrary vendor command to the device behind an entity
    ExecuteCommand {
        entity_id: String,
        command: String,
        args: Vec<Parameter>,
    },

    /// Write the hub's execution history to the log
    LogExecutionHistory,
}
