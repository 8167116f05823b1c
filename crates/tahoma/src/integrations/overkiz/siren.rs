use enumset::EnumSet;
use enumset::EnumSetType;
use tracing::info;

use super::device::param;
use super::device::state_key;
use super::device::CommandName;
use super::device::Device;
use super::device::ExecId;
use super::executor::Executor;
use crate::engine::Entity;
use crate::engine::SirenState;
use crate::error::Result;

/// Sequence code for every ring: 90 s of sound, then 30 s of silence
const RING_SEQUENCE: u8 = 75;

/// Repeat code: the sequence plays three times
const RING_REPEAT: u8 = 2;

#[derive(EnumSetType, Debug)]
pub enum SirenFeature {
    TurnOn,
    TurnOff,
    Duration,
}

/// Siren entity backed by an Overkiz siren
///
/// Ringing is not tracked locally; the hub reports the ring through
/// `core:OnOffState` until it is cancelled or runs out.
pub struct OverkizSiren {
    pub id: String,
    pub name: String,
    executor: Executor,
    default_duration_secs: u32,
    on: Option<bool>,
}

impl OverkizSiren {
    pub fn new(id: String, device: &Device, executor: Executor, default_duration_secs: u32) -> Self {
        Self {
            id,
            name: device.label.clone(),
            executor,
            default_duration_secs,
            on: None,
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn supported_features(&self) -> EnumSet<SirenFeature> {
        SirenFeature::TurnOn | SirenFeature::TurnOff | SirenFeature::Duration
    }

    pub fn is_on(&self) -> bool {
        self.on.unwrap_or(false)
    }

    pub fn state(&self) -> SirenState {
        SirenState { on: self.is_on() }
    }

    /// Start ringing for `duration` seconds, or the default duration
    ///
    /// Returns once the hub accepted the command.
    pub async fn turn_on(&self, duration: Option<u32>) -> Result<ExecId> {
        let secs = match duration {
            Some(d) if d > 0 => d,
            _ => self.default_duration_secs,
        };
        let duration_ms = secs.saturating_mul(1000);

        let exec_id = self
            .executor
            .execute(CommandName::RingWithSingleSimpleSequence.with(vec![
                duration_ms.into(),
                RING_SEQUENCE.into(),
                RING_REPEAT.into(),
                param::MEMORIZED_VOLUME.into(),
            ]))
            .await?;
        info!("Siren {} ringing for {}s", self.id, secs);
        Ok(exec_id)
    }

    /// Stop a ring in progress and ask the siren to refresh its state
    pub async fn turn_off(&self) -> Result<()> {
        self.executor
            .cancel(&[CommandName::RingWithSingleSimpleSequence])
            .await?;
        self.executor
            .execute(CommandName::AdvancedRefresh.with(vec![param::NORMAL.into()]))
            .await?;
        info!("Siren {} stopped", self.id);
        Ok(())
    }

    pub async fn update(&mut self) -> Result<()> {
        let states = self.executor.refresh_states().await?;
        if let Some(value) = states.get(state_key::ON_OFF) {
            self.on = Some(value.as_str() == Some(param::ON));
        }
        Ok(())
    }
}

impl Entity for OverkizSiren {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn state_json(&self) -> serde_json::Value {
        serde_json::json!({
            "entity_id": self.id,
            "name": self.name,
            "platform": "siren",
            "state": self.state(),
        })
    }

    fn platform(&self) -> &'static str {
        "siren"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::integrations::overkiz::client::MockCall;
    use crate::integrations::overkiz::client::MockOverkizClient;
    use crate::integrations::overkiz::device::Command;
    use crate::integrations::overkiz::device::Definition;
    use crate::integrations::overkiz::device::DeviceUrl;
    use crate::integrations::overkiz::device::Execution;
    use crate::integrations::overkiz::device::Parameter;
    use crate::integrations::overkiz::device::State;
    use crate::integrations::overkiz::device::StateValue;
    use crate::integrations::overkiz::executor::ExecutionTiming;

    const URL: &str = "io://1234-5678/7";

    fn siren(mock: &Arc<MockOverkizClient>) -> OverkizSiren {
        let device = Device {
            device_url: DeviceUrl::from(URL),
            label: "Alarm siren".to_string(),
            widget: "Siren".to_string(),
            ui_class: "Siren".to_string(),
            definition: Definition::default(),
            available: true,
        };
        let executor = Executor::new(
            device.device_url.clone(),
            mock.clone(),
            ExecutionTiming {
                timeout: Duration::from_millis(200),
                poll_interval: Duration::from_millis(5),
            },
            "tahoma".to_string(),
        );
        OverkizSiren::new("siren.alarm_siren".to_string(), &device, executor, 120)
    }

    fn ring(duration_ms: i64) -> Command {
        Command::new(
            "ringWithSingleSimpleSequence",
            vec![
                Parameter::Int(duration_ms),
                Parameter::Int(75),
                Parameter::Int(2),
                Parameter::Str("memorizedVolume".to_string()),
            ],
        )
    }

    #[test]
    fn test_supported_features() {
        let mock = Arc::new(MockOverkizClient::new());
        assert_eq!(siren(&mock).supported_features(), EnumSet::all());
    }

    #[tokio::test]
    async fn test_turn_on_default_duration() {
        let mock = Arc::new(MockOverkizClient::new());
        let siren = siren(&mock);

        siren.turn_on(None).await.unwrap();
        assert_eq!(mock.executed(), vec![ring(120_000)]);
    }

    #[tokio::test]
    async fn test_turn_on_zero_duration_uses_default() {
        let mock = Arc::new(MockOverkizClient::new());
        let siren = siren(&mock);

        siren.turn_on(Some(0)).await.unwrap();
        assert_eq!(mock.executed(), vec![ring(120_000)]);
    }

    #[tokio::test]
    async fn test_turn_on_with_duration() {
        let mock = Arc::new(MockOverkizClient::new());
        let siren = siren(&mock);

        siren.turn_on(Some(10)).await.unwrap();
        assert_eq!(mock.executed(), vec![ring(10_000)]);
    }

    #[tokio::test]
    async fn test_turn_on_does_not_wait() {
        let mock = Arc::new(MockOverkizClient::new());
        mock.set_completion_polls(None);
        let siren = siren(&mock);

        siren.turn_on(None).await.unwrap();
        assert!(!mock.calls().contains(&MockCall::CurrentExecutions));
    }

    #[tokio::test]
    async fn test_turn_on_propagates_failure() {
        let mock = Arc::new(MockOverkizClient::new());
        mock.fail_execute("siren unreachable");
        let siren = siren(&mock);

        let err = siren.turn_on(None).await.unwrap_err();
        assert!(matches!(err, crate::error::Error::Client(_)));
    }

    #[tokio::test]
    async fn test_turn_off_cancels_then_refreshes() {
        let mock = Arc::new(MockOverkizClient::new());
        mock.set_completion_polls(None);
        let siren = siren(&mock);
        siren.turn_on(None).await.unwrap();
        mock.clear_calls();

        siren.turn_off().await.unwrap();

        let url = DeviceUrl::from(URL);
        assert_eq!(
            mock.calls(),
            vec![
                MockCall::CurrentExecutions,
                MockCall::Cancel(ExecId::from("exec-1")),
                MockCall::Execute(
                    url,
                    CommandName::AdvancedRefresh.with(vec!["normal".into()])
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_turn_off_without_ring_still_refreshes() {
        let mock = Arc::new(MockOverkizClient::new());
        let siren = siren(&mock);
        mock.add_running(Execution {
            id: ExecId::from("other"),
            device_url: DeviceUrl::from(URL),
            commands: vec![CommandName::AdvancedRefresh.into()],
        });

        siren.turn_off().await.unwrap();

        let calls = mock.calls();
        assert!(!calls.iter().any(|c| matches!(c, MockCall::Cancel(_))));
        assert_eq!(
            mock.executed(),
            vec![CommandName::AdvancedRefresh.with(vec!["normal".into()])]
        );
    }

    #[tokio::test]
    async fn test_update() {
        let mock = Arc::new(MockOverkizClient::new());
        let mut siren = siren(&mock);
        let url = DeviceUrl::from(URL);

        mock.set_states(
            &url,
            vec![State::new(state_key::ON_OFF, StateValue::Str("on".to_string()))],
        );
        siren.update().await.unwrap();
        assert!(siren.is_on());

        // Missing key keeps the last value
        mock.set_states(&url, vec![]);
        siren.update().await.unwrap();
        assert!(siren.is_on());

        mock.set_states(
            &url,
            vec![State::new(state_key::ON_OFF, StateValue::Str("off".to_string()))],
        );
        siren.update().await.unwrap();
        assert!(!siren.is_on());
        assert_eq!(siren.state_json()["state"]["on"], false);
    }
}
