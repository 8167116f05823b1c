use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::client::OverkizClient;
use super::device::Command;
use super::device::Device;
use super::discovery::EntityIds;
use super::discovery::Platform;
use super::executor::Executor;
use super::light::OverkizLight;
use super::light::TurnOn;
use super::siren::OverkizSiren;
use super::OverkizConfig;
use crate::engine::Entity;
use crate::engine::FromIntegrationMessage;
use crate::engine::FromIntegrationSender;
use crate::engine::Integration;
use crate::engine::LightState;
use crate::engine::SirenState;
use crate::engine::ToIntegrationMessage;

/// Type alias for the shared lights map
type LightsMap = Arc<Mutex<HashMap<String, Arc<Mutex<OverkizLight>>>>>;

/// Type alias for the shared sirens map
type SirensMap = Arc<Mutex<HashMap<String, Arc<Mutex<OverkizSiren>>>>>;

fn boxed(e: crate::error::Error) -> Box<dyn Error + Send> {
    Box::new(e)
}

/// Overkiz integration
///
/// Exposes the lights and sirens attached to a TaHoma hub. Devices are
/// discovered once at setup; their states are then refreshed on the scan
/// interval by a background task.
pub struct OverkizIntegration<C: OverkizClient> {
    client: Arc<C>,
    config: OverkizConfig,
    lights: LightsMap,
    sirens: SirensMap,
    to_engine: Option<FromIntegrationSender>,
    /// Handle to the background polling task
    poll_task: Option<JoinHandle<()>>,
}

impl<C: OverkizClient + 'static> OverkizIntegration<C> {
    pub fn new(client: C, config: &OverkizConfig) -> Self {
        Self {
            client: Arc::new(client),
            config: config.clone(),
            lights: Arc::new(Mutex::new(HashMap::new())) as LightsMap,
            sirens: Arc::new(Mutex::new(HashMap::new())) as SirensMap,
            to_engine: None,
            poll_task: None,
        }
    }

    fn executor(&self, device: &Device) -> Executor {
        Executor::new(
            device.device_url.clone(),
            self.client.clone(),
            self.config.execution_timing(),
            self.config.execution_label.clone(),
        )
    }

    /// Snapshot of every entity as the host would store it
    pub async fn entity_states(&self) -> Vec<serde_json::Value> {
        let mut states = Vec::new();
        for light in self.lights.lock().await.values() {
            states.push(light.lock().await.state_json());
        }
        for siren in self.sirens.lock().await.values() {
            states.push(siren.lock().await.state_json());
        }
        states
    }

    /// Fetch the devices from the hub and bind a light or siren to each supported one
    async fn discover(&self, to_engine: &FromIntegrationSender) -> crate::error::Result<()> {
        let devices = self.client.get_devices().await?;
        info!("Hub reported {} devices", devices.len());

        let mut ids = EntityIds::default();
        for device in &devices {
            let Some(platform) = Platform::for_device(device) else {
                debug!(
                    "Ignoring unsupported device {} ({}/{})",
                    device.label, device.widget, device.ui_class
                );
                continue;
            };

            if !device.available {
                info!("Device {} is currently unavailable", device.label);
            }

            let entity_id = ids.assign(platform, &device.label);
            match platform {
                Platform::Light => {
                    let mut light =
                        OverkizLight::new(entity_id.clone(), device, self.executor(device));
                    if let Err(e) = light.update().await {
                        warn!("Initial update of {} failed: {}", entity_id, e);
                    }
                    let state = light.state();
                    info!(
                        "Discovered light entity: {} ({}), features {:?}",
                        light.name,
                        entity_id,
                        light.supported_features()
                    );
                    self.lights
                        .lock()
                        .await
                        .insert(entity_id.clone(), Arc::new(Mutex::new(light)));
                    register_entity(&entity_id, to_engine).await;
                    report_light_state(&entity_id, &state, to_engine).await;
                }
                Platform::Siren => {
                    let mut siren = OverkizSiren::new(
                        entity_id.clone(),
                        device,
                        self.executor(device),
                        self.config.default_siren_duration_secs,
                    );
                    if let Err(e) = siren.update().await {
                        warn!("Initial update of {} failed: {}", entity_id, e);
                    }
                    let state = siren.state();
                    info!("Discovered siren entity: {} ({})", siren.name, entity_id);
                    self.sirens
                        .lock()
                        .await
                        .insert(entity_id.clone(), Arc::new(Mutex::new(siren)));
                    register_entity(&entity_id, to_engine).await;
                    report_siren_state(&entity_id, &state, to_engine).await;
                }
            }
        }

        Ok(())
    }

    /// Refresh every entity, reporting the ones whose state changed
    async fn poll_once(lights: &LightsMap, sirens: &SirensMap, to_engine: &FromIntegrationSender) {
        let lights: Vec<_> = lights.lock().await.values().cloned().collect();
        for light_arc in lights {
            let mut light = light_arc.lock().await;
            let before = light.state();
            if let Err(e) = light.update().await {
                warn!("Failed to update {}: {}", light.id, e);
                continue;
            }
            let after = light.state();
            if after != before {
                debug!("State change for light: {}", light.id);
                report_light_state(&light.id, &after, to_engine).await;
            }
        }

        let sirens: Vec<_> = sirens.lock().await.values().cloned().collect();
        for siren_arc in sirens {
            let mut siren = siren_arc.lock().await;
            let before = siren.state();
            if let Err(e) = siren.update().await {
                warn!("Failed to update {}: {}", siren.id, e);
                continue;
            }
            let after = siren.state();
            if after != before {
                debug!("State change for siren: {}", siren.id);
                report_siren_state(&siren.id, &after, to_engine).await;
            }
        }
    }

    async fn poll_loop(
        lights: LightsMap,
        sirens: SirensMap,
        to_engine: FromIntegrationSender,
        period: std::time::Duration,
    ) {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            Self::poll_once(&lights, &sirens, &to_engine).await;
        }
    }

    async fn light(&self, entity_id: &str) -> Result<Arc<Mutex<OverkizLight>>, Box<dyn Error + Send>> {
        self.lights
            .lock()
            .await
            .get(entity_id)
            .cloned()
            .ok_or_else(|| boxed(crate::error::Error::EntityNotFound(entity_id.to_string())))
    }

    async fn siren(&self, entity_id: &str) -> Result<Arc<Mutex<OverkizSiren>>, Box<dyn Error + Send>> {
        self.sirens
            .lock()
            .await
            .get(entity_id)
            .cloned()
            .ok_or_else(|| boxed(crate::error::Error::EntityNotFound(entity_id.to_string())))
    }

    /// Dispatch a raw vendor command to the device behind `entity_id`
    ///
    /// A command the hub rejects as invalid is logged and swallowed; any
    /// other failure is returned.
    async fn execute_command(
        &self,
        entity_id: &str,
        command: Command,
    ) -> Result<(), Box<dyn Error + Send>> {
        let result = if let Ok(light) = self.light(entity_id).await {
            light.lock().await.executor().execute(command.clone()).await
        } else {
            let siren = self.siren(entity_id).await?;
            let siren = siren.lock().await;
            siren.executor().execute(command.clone()).await
        };

        match result {
            Err(e) if e.is_invalid_command() => {
                warn!("Command {} on {} was rejected: {}", command, entity_id, e);
                Ok(())
            }
            Err(e) => Err(boxed(e)),
            Ok(_) => Ok(()),
        }
    }

    async fn log_execution_history(&self) -> Result<(), Box<dyn Error + Send>> {
        let history = self
            .client
            .execution_history()
            .await
            .map_err(|e| boxed(e.into()))?;
        for item in &history {
            info!("{}", item);
        }
        Ok(())
    }

    fn sender(&self) -> Result<&FromIntegrationSender, Box<dyn Error + Send>> {
        self.to_engine.as_ref().ok_or_else(|| -> Box<dyn Error + Send> {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Overkiz integration is not set up",
            ))
        })
    }
}

/// Register an entity with the host
async fn register_entity(entity_id: &str, to_engine: &FromIntegrationSender) {
    let msg = FromIntegrationMessage::EntityDiscovered {
        entity_id: entity_id.to_string(),
        integration_name: "overkiz".to_string(),
    };
    if let Err(e) = to_engine.send(msg).await {
        warn!("Failed to send EntityDiscovered message: {}", e);
    } else {
        info!("Registered entity: {}", entity_id);
    }
}

/// Notify the host that an entity has been removed
async fn notify_entity_removed(entity_id: &str, to_engine: &FromIntegrationSender) {
    let msg = FromIntegrationMessage::EntityRemoved {
        entity_id: entity_id.to_string(),
    };
    if let Err(e) = to_engine.send(msg).await {
        warn!("Failed to send EntityRemoved message: {}", e);
    } else {
        info!("Notified host of entity removal: {}", entity_id);
    }
}

async fn report_light_state(entity_id: &str, state: &LightState, to_engine: &FromIntegrationSender) {
    let msg = FromIntegrationMessage::LightStateChanged {
        entity_id: entity_id.to_string(),
        state: state.clone(),
    };
    if let Err(e) = to_engine.send(msg).await {
        warn!("Failed to send LightStateChanged message: {}", e);
    }
}

async fn report_siren_state(entity_id: &str, state: &SirenState, to_engine: &FromIntegrationSender) {
    let msg = FromIntegrationMessage::SirenStateChanged {
        entity_id: entity_id.to_string(),
        state: state.clone(),
    };
    if let Err(e) = to_engine.send(msg).await {
        warn!("Failed to send SirenStateChanged message: {}", e);
    }
}

#[async_trait]
impl<C: OverkizClient + 'static> Integration for OverkizIntegration<C> {
    fn name(&self) -> &str {
        "overkiz"
    }

    async fn setup(&mut self, tx: FromIntegrationSender) -> Result<(), Box<dyn Error + Send>> {
        if self.poll_task.is_some() {
            return Err(boxed(crate::error::Error::AlreadySetUp));
        }

        self.to_engine = Some(tx.clone());

        self.discover(&tx).await.map_err(boxed)?;

        let period = self.config.scan_interval();
        info!(
            "Overkiz integration setup complete, polling every {:?}",
            period
        );

        let lights = self.lights.clone();
        let sirens = self.sirens.clone();
        let task = tokio::spawn(async move {
            Self::poll_loop(lights, sirens, tx, period).await;
        });
        self.poll_task = Some(task);

        Ok(())
    }

    async fn handle_message(
        &mut self,
        msg: ToIntegrationMessage,
    ) -> Result<(), Box<dyn Error + Send>> {
        match msg {
            ToIntegrationMessage::LightTurnOn {
                entity_id,
                hs_color,
                brightness,
                effect,
            } => {
                info!(
                    "Handling turn on for {}: hs={:?}, brightness={:?}, effect={:?}",
                    entity_id, hs_color, brightness, effect
                );
                let light = self.light(&entity_id).await?;
                let mut light = light.lock().await;
                let res = light
                    .turn_on(TurnOn {
                        hs_color,
                        brightness,
                        effect,
                    })
                    .await;
                report_light_state(&entity_id, &light.state(), self.sender()?).await;
                res.map_err(boxed)?;
            }
            ToIntegrationMessage::LightTurnOff { entity_id } => {
                info!("Handling turn off for {}", entity_id);
                let light = self.light(&entity_id).await?;
                let mut light = light.lock().await;
                let res = light.turn_off().await;
                report_light_state(&entity_id, &light.state(), self.sender()?).await;
                res.map_err(boxed)?;
            }
            ToIntegrationMessage::SirenTurnOn {
                entity_id,
                duration,
            } => {
                info!("Handling siren on for {}: duration={:?}", entity_id, duration);
                let siren = self.siren(&entity_id).await?;
                let siren = siren.lock().await;
                siren.turn_on(duration).await.map_err(boxed)?;
            }
            ToIntegrationMessage::SirenTurnOff { entity_id } => {
                info!("Handling siren off for {}", entity_id);
                let siren = self.siren(&entity_id).await?;
                let siren = siren.lock().await;
                siren.turn_off().await.map_err(boxed)?;
            }
            ToIntegrationMessage::ExecuteCommand {
                entity_id,
                command,
                args,
            } => {
                self.execute_command(&entity_id, Command::new(command, args))
                    .await?;
            }
            ToIntegrationMessage::LogExecutionHistory => {
                self.log_execution_history().await?;
            }
        }
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), Box<dyn Error + Send>> {
        info!("Overkiz integration shutting down");

        if let Some(task) = self.poll_task.take() {
            task.abort();
        }

        let mut removed: Vec<String> = self.lights.lock().await.drain().map(|(id, _)| id).collect();
        removed.extend(self.sirens.lock().await.drain().map(|(id, _)| id));
        removed.sort();

        if let Some(tx) = self.to_engine.take() {
            for entity_id in &removed {
                notify_entity_removed(entity_id, &tx).await;
            }
        }

        Ok(())
    }
}
