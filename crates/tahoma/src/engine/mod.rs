mod entity;
mod integration;
mod message;
pub mod state;

pub use entity::Entity;
pub use integration::FromIntegrationReceiver;
pub use integration::FromIntegrationSender;
pub use integration::Integration;
pub use message::FromIntegrationMessage;
pub use message::ToIntegrationMessage;
pub use state::LightState;
pub use state::SirenState;
