/// Entity abstraction shared with the host
///
/// Every light or siren exposed by an integration implements the Entity trait.
///
/// Base trait that all entities must implement
pub trait Entity: Send + Sync {
    /// Host-facing entity id (e.g. "light.garden")
    fn entity_id(&self) -> &str;

    /// Serialize current state to JSON for the host's state store
    fn state_json(&self) -> serde_json::Value;

    /// Return the platform type of this entity (e.g. "light", "siren")
    fn platform(&self) -> &'static str;
}
