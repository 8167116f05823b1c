use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::util::TryInitError;

use crate::config::LoggingConfig;

/// Build the per-target filter described by the logging configuration
pub fn filter(config: &LoggingConfig) -> Targets {
    Targets::new()
        .with_default(LevelFilter::from(config.level))
        .with_targets(
            config
                .overrides
                .iter()
                .map(|(target, level)| (target.clone(), LevelFilter::from(*level))),
        )
}

/// Install a global fmt subscriber filtered by `config`
///
/// Fails if a global subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter(config))
        .try_init()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tracing::Level;

    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_filter_overrides() {
        let config = LoggingConfig {
            level: LogLevel::Warn,
            overrides: HashMap::from([(
                "tahoma::integrations::overkiz".to_string(),
                LogLevel::Debug,
            )]),
        };

        let targets = filter(&config);
        assert!(targets.would_enable("tahoma::integrations::overkiz::light", &Level::DEBUG));
        assert!(!targets.would_enable("tahoma::integrations::overkiz", &Level::TRACE));
        assert!(!targets.would_enable("tahoma::config", &Level::INFO));
        assert!(targets.would_enable("tahoma::config", &Level::WARN));
    }
}
