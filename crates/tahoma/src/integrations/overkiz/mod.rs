//! Overkiz (Somfy TaHoma) lights and sirens
//!
//! The hub transport is provided by the vendor SDK through [`OverkizClient`].
//! This module turns host intents into vendor commands and vendor states
//! back into entity attributes.

mod client;
mod config;
mod device;
mod discovery;
mod executor;
mod light;
// Private module - allowed by clippy.toml allow-private-module-inception
#[allow(clippy::module_inception)]
mod overkiz;
mod siren;

pub use client::OverkizClient;
pub use config::Config as OverkizConfig;
pub use device::param;
pub use device::state_key;
pub use device::Command;
pub use device::CommandDefinition;
pub use device::CommandName;
pub use device::Definition;
pub use device::Device;
pub use device::DeviceUrl;
pub use device::ExecId;
pub use device::Execution;
pub use device::HistoryExecution;
pub use device::Parameter;
pub use device::State;
pub use device::StateValue;
pub use device::States;
pub use discovery::slugify;
pub use discovery::EntityIds;
pub use discovery::Platform;
pub use executor::ExecutionTiming;
pub use executor::Executor;
pub use light::LightFeature;
pub use light::OverkizLight;
pub use light::TurnOn;
pub use light::EFFECT_WINK;
pub use overkiz::OverkizIntegration;
pub use siren::OverkizSiren;
pub use siren::SirenFeature;
