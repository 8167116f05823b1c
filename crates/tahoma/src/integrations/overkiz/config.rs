use std::time::Duration;

use serde::Deserialize;

use super::executor::ExecutionTiming;

fn default_scan_interval_secs() -> u64 {
    30
}

fn default_command_timeout_secs() -> u64 {
    30
}

fn default_execution_poll_interval_ms() -> u64 {
    500
}

fn default_siren_duration_secs() -> u32 {
    2 * 60
}

fn default_execution_label() -> String {
    "tahoma".to_string()
}

/// Configuration for the Overkiz integration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Seconds between two state refreshes of every entity (default: 30)
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    /// Seconds a light command may stay running before it is reported as timed out
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Milliseconds between two checks of the running executions
    #[serde(default = "default_execution_poll_interval_ms")]
    pub execution_poll_interval_ms: u64,

    /// Ring duration used when the host does not give one (default: 120)
    #[serde(default = "default_siren_duration_secs")]
    pub default_siren_duration_secs: u32,

    /// Label attached to every execution sent to the hub
    #[serde(default = "default_execution_label")]
    pub execution_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval_secs(),
            command_timeout_secs: default_command_timeout_secs(),
            execution_poll_interval_ms: default_execution_poll_interval_ms(),
            default_siren_duration_secs: default_siren_duration_secs(),
            execution_label: default_execution_label(),
        }
    }
}

impl Config {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    pub fn execution_timing(&self) -> ExecutionTiming {
        ExecutionTiming {
            timeout: Duration::from_secs(self.command_timeout_secs),
            poll_interval: Duration::from_millis(self.execution_poll_interval_ms.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.scan_interval(), Duration::from_secs(30));
        assert_eq!(config.default_siren_duration_secs, 120);

        let timing = config.execution_timing();
        assert_eq!(timing.timeout, Duration::from_secs(30));
        assert_eq!(timing.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let config: Config = toml::from_str(
            r#"
            scan_interval_secs = 0
            execution_poll_interval_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.scan_interval(), Duration::from_secs(1));
        assert_eq!(config.execution_timing().poll_interval, Duration::from_millis(1));
    }
}
