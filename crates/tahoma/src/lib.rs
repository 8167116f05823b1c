//! Overkiz (Somfy TaHoma) light and siren adapters for a home-automation host.
//!
//! The host drives an [`OverkizIntegration`] through the [`Integration`]
//! trait: it sends [`ToIntegrationMessage`] commands and receives
//! [`FromIntegrationMessage`] events. Hub access goes through an
//! [`OverkizClient`] implementation supplied by the vendor SDK.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod integrations;
pub mod logging;

pub use config::Config;
pub use config::ConfigError;
pub use config::LogLevel;
pub use engine::Entity;
pub use engine::FromIntegrationMessage;
pub use engine::Integration;
pub use engine::LightState;
pub use engine::SirenState;
pub use engine::ToIntegrationMessage;
pub use error::Error;
pub use error::Result;
pub use integrations::overkiz::OverkizClient;
pub use integrations::overkiz::OverkizIntegration;
pub use integrations::overkiz::OverkizLight;
pub use integrations::overkiz::OverkizSiren;
