use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use super::client::OverkizClient;
use super::device::Command;
use super::device::CommandName;
use super::device::DeviceUrl;
use super::device::ExecId;
use super::device::States;
use crate::error::Error;
use crate::error::Result;

/// Timing applied to commands that wait for completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionTiming {
    /// Upper bound for a dispatched command to leave the running list
    pub timeout: Duration,
    /// Delay between two checks of the running list
    pub poll_interval: Duration,
}

/// Issues commands for a single device through the shared client
pub struct Executor {
    device_url: DeviceUrl,
    client: Arc<dyn OverkizClient>,
    timing: ExecutionTiming,
    label: String,
}

impl Executor {
    pub fn new(
        device_url: DeviceUrl,
        client: Arc<dyn OverkizClient>,
        timing: ExecutionTiming,
        label: String,
    ) -> Self {
        Self {
            device_url,
            client,
            timing,
            label,
        }
    }

    /// Dispatch a command and return once the hub accepted it
    #[instrument(skip(self, command), fields(device = %self.device_url, command = %command))]
    pub async fn execute(&self, command: Command) -> Result<ExecId> {
        let exec_id = self
            .client
            .execute_command(&self.device_url, &command, &self.label)
            .await?;
        info!("Dispatched {} as execution {}", command, exec_id);
        Ok(exec_id)
    }

    /// Dispatch a command and wait until the hub no longer lists it as running
    ///
    /// The wait suspends between checks and is bounded by the configured
    /// timeout. Dropping the returned future abandons the wait; the command
    /// itself keeps running on the hub.
    pub async fn execute_and_wait(&self, command: Command) -> Result<ExecId> {
        let exec_id = self.execute(command).await?;

        match tokio::time::timeout(self.timing.timeout, self.wait_for(&exec_id)).await {
            Ok(res) => res.map(|()| exec_id),
            Err(_) => {
                warn!(
                    "Execution {} on {} still running after {:?}",
                    exec_id, self.device_url, self.timing.timeout
                );
                Err(Error::ExecutionTimeout {
                    exec_id,
                    timeout: self.timing.timeout,
                })
            }
        }
    }

    async fn wait_for(&self, exec_id: &ExecId) -> Result<()> {
        loop {
            let running = self.client.current_executions().await?;
            if !running.iter().any(|e| &e.id == exec_id) {
                debug!("Execution {} finished", exec_id);
                return Ok(());
            }
            tokio::time::sleep(self.timing.poll_interval).await;
        }
    }

    /// Cancel every running execution of this device carrying one of `names`
    ///
    /// Returns the number of cancelled executions; zero when nothing matched.
    #[instrument(skip(self), fields(device = %self.device_url))]
    pub async fn cancel(&self, names: &[CommandName]) -> Result<usize> {
        let running = self.client.current_executions().await?;
        let mut cancelled = 0;

        for execution in running
            .iter()
            .filter(|e| e.matches(&self.device_url, names))
        {
            self.client.cancel_execution(&execution.id).await?;
            info!("Cancelled execution {}", execution.id);
            cancelled += 1;
        }

        if cancelled == 0 {
            debug!("No running execution to cancel for {:?}", names);
        }

        Ok(cancelled)
    }

    /// Fetch the current states of this device
    pub async fn refresh_states(&self) -> Result<States> {
        let states: States = self
            .client
            .get_states(&self.device_url)
            .await?
            .into_iter()
            .collect();
        debug!("{} reported {} states", self.device_url, states.len());
        Ok(states)
    }
}
