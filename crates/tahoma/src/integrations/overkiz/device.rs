use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use strum::AsRefStr;
use strum::Display;
use strum::EnumString;

/// Vendor URL identifying a device, e.g. `io://1234-5678-9012/11223344`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceUrl(pub String);

impl fmt::Display for DeviceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceUrl {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier the hub assigns to a dispatched command
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecId(pub String);

impl fmt::Display for ExecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExecId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Commands this integration knows how to issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum CommandName {
    #[strum(serialize = "setIntensity")]
    SetIntensity,
    #[strum(serialize = "setRGB")]
    SetRgb,
    #[strum(serialize = "wink")]
    Wink,
    #[strum(serialize = "on")]
    On,
    #[strum(serialize = "off")]
    Off,
    #[strum(serialize = "ringWithSingleSimpleSequence")]
    RingWithSingleSimpleSequence,
    #[strum(serialize = "advancedRefresh")]
    AdvancedRefresh,
}

impl CommandName {
    /// Build a command with the given parameters
    pub fn with(self, parameters: Vec<Parameter>) -> Command {
        Command::new(self.as_ref(), parameters)
    }
}

/// Fixed string parameters understood by the hub
pub mod param {
    pub const ON: &str = "on";
    pub const MEMORIZED_VOLUME: &str = "memorizedVolume";
    pub const NORMAL: &str = "normal";
}

/// State keys read by the light and siren entities
pub mod state_key {
    pub const LIGHT_INTENSITY: &str = "core:LightIntensityState";
    pub const ON_OFF: &str = "core:OnOffState";
    pub const RED_COLOR_INTENSITY: &str = "core:RedColorIntensityState";
    pub const GREEN_COLOR_INTENSITY: &str = "core:GreenColorIntensityState";
    pub const BLUE_COLOR_INTENSITY: &str = "core:BlueColorIntensityState";
}

/// A single command parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    Int(i64),
    Str(String),
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Int(i) => write!(f, "{}", i),
            Parameter::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Parameter {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u32> for Parameter {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u8> for Parameter {
    fn from(i: u8) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<&str> for Parameter {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Parameter {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// A command as sent to the hub: a name and its ordered parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Command {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Whether this command carries the given known name
    pub fn is(&self, name: CommandName) -> bool {
        self.name == name.as_ref()
    }
}

impl From<CommandName> for Command {
    fn from(name: CommandName) -> Self {
        name.with(Vec::new())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        f.write_str(")")
    }
}

/// A command the device declares in its definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDefinition {
    pub command_name: String,
    #[serde(default)]
    pub nparams: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

/// A device as reported by the hub setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(rename = "deviceURL")]
    pub device_url: DeviceUrl,
    pub label: String,
    #[serde(default)]
    pub widget: String,
    #[serde(default)]
    pub ui_class: String,
    #[serde(default)]
    pub definition: Definition,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Device {
    /// Whether the device definition lists the given command
    pub fn supports(&self, name: CommandName) -> bool {
        self.definition
            .commands
            .iter()
            .any(|c| c.command_name == name.as_ref())
    }
}

/// A raw state value. The hub reports these as untyped JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl StateValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value clamped into `0..=max`
    pub fn as_clamped_u8(&self, max: u8) -> Option<u8> {
        let v = match self {
            StateValue::Int(i) => *i,
            StateValue::Float(f) if f.is_finite() => *f as i64,
            _ => return None,
        };
        Some(v.clamp(0, i64::from(max)) as u8)
    }
}

/// A named state entry of a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub value: StateValue,
}

impl State {
    pub fn new(name: &str, value: StateValue) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Snapshot of one device's states keyed by state name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct States(HashMap<String, StateValue>);

impl States {
    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<State> for States {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| (s.name, s.value)).collect())
    }
}

/// An execution still running on the hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub id: ExecId,
    #[serde(rename = "deviceURL")]
    pub device_url: DeviceUrl,
    pub commands: Vec<Command>,
}

impl Execution {
    /// Whether this execution targets `device_url` with any of `names`
    pub fn matches(&self, device_url: &DeviceUrl, names: &[CommandName]) -> bool {
        &self.device_url == device_url
            && self
                .commands
                .iter()
                .any(|c| names.iter().any(|n| c.is(*n)))
    }
}

/// A finished execution as listed in the hub history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExecution {
    pub id: ExecId,
    pub label: String,
    pub state: String,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl fmt::Display for HistoryExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.id, self.state, self.label)?;
        for c in &self.commands {
            write!(f, " {}", c)?;
        }
        Ok(())
    }
}
