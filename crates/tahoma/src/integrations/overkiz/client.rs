use async_trait::async_trait;

use super::device::Command;
use super::device::Device;
use super::device::DeviceUrl;
use super::device::ExecId;
use super::device::Execution;
use super::device::HistoryExecution;
use super::device::State;
use crate::error::ClientError;
#[cfg(test)]
use crate::error::InvalidCommand;

/// Trait for the Overkiz SDK operations this integration relies on
///
/// The hub transport (cloud or local API, login, event listener) lives in
/// the SDK. This trait allows for mocking it for testing purposes.
#[async_trait]
pub trait OverkizClient: Send + Sync {
    /// List every device attached to the hub
    async fn get_devices(&self) -> Result<Vec<Device>, ClientError>;

    /// Dispatch a command to a device, returning the execution id
    ///
    /// Returns as soon as the hub accepted the command, not when it finished.
    async fn execute_command(
        &self,
        device_url: &DeviceUrl,
        command: &Command,
        label: &str,
    ) -> Result<ExecId, ClientError>;

    /// Executions the hub still considers running
    async fn current_executions(&self) -> Result<Vec<Execution>, ClientError>;

    /// Cancel a running execution
    async fn cancel_execution(&self, exec_id: &ExecId) -> Result<(), ClientError>;

    /// Fetch the current states of one device
    async fn get_states(&self, device_url: &DeviceUrl) -> Result<Vec<State>, ClientError>;

    /// Past executions, most recent first
    async fn execution_history(&self) -> Result<Vec<HistoryExecution>, ClientError>;
}

/// A call recorded by [`MockOverkizClient`]
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    GetDevices,
    Execute(DeviceUrl, Command),
    CurrentExecutions,
    Cancel(ExecId),
    GetStates(DeviceUrl),
    History,
}

#[cfg(test)]
#[derive(Debug)]
struct Running {
    execution: Execution,
    /// Remaining `current_executions` calls that still list it, `None` = forever
    remaining: Option<u32>,
}

#[cfg(test)]
#[derive(Debug, Default)]
struct MockInner {
    devices: Vec<Device>,
    states: std::collections::HashMap<DeviceUrl, Vec<State>>,
    running: Vec<Running>,
    history: Vec<HistoryExecution>,
    calls: Vec<MockCall>,
    next_exec: u32,
    /// How long new executions stay listed as running
    completion_polls: Option<u32>,
    fail_execute: Option<String>,
    /// Command names answered with [`InvalidCommand`]
    rejected: Vec<String>,
}

/// Mock Overkiz client for testing
///
/// Records every call. New executions finish immediately unless configured
/// otherwise with [`MockOverkizClient::set_completion_polls`].
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockOverkizClient {
    inner: std::sync::Mutex<MockInner>,
}

#[cfg(test)]
impl MockOverkizClient {
    /// Create a new mock Overkiz client
    pub fn new() -> Self {
        let mock = Self::default();
        mock.inner.lock().unwrap().completion_polls = Some(0);
        mock
    }

    pub fn add_device(&self, device: Device) {
        self.inner.lock().unwrap().devices.push(device);
    }

    pub fn set_states(&self, device_url: &DeviceUrl, states: Vec<State>) {
        self.inner
            .lock()
            .unwrap()
            .states
            .insert(device_url.clone(), states);
    }

    /// Keep new executions running for `polls` checks; `None` never finishes
    pub fn set_completion_polls(&self, polls: Option<u32>) {
        self.inner.lock().unwrap().completion_polls = polls;
    }

    /// Make `execute_command` fail with the given message
    pub fn fail_execute(&self, message: &str) {
        self.inner.lock().unwrap().fail_execute = Some(message.to_string());
    }

    /// Answer `execute_command` for `name` with [`InvalidCommand`]
    pub fn reject_command(&self, name: &str) {
        self.inner.lock().unwrap().rejected.push(name.to_string());
    }

    /// Register an execution that is already running on the hub
    pub fn add_running(&self, execution: Execution) {
        self.inner.lock().unwrap().running.push(Running {
            execution,
            remaining: None,
        });
    }

    pub fn add_history(&self, item: HistoryExecution) {
        self.inner.lock().unwrap().history.push(item);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Commands executed so far, in order
    pub fn executed(&self) -> Vec<Command> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::Execute(_, cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

#[cfg(test)]
#[async_trait]
impl OverkizClient for MockOverkizClient {
    async fn get_devices(&self) -> Result<Vec<Device>, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(MockCall::GetDevices);
        Ok(inner.devices.clone())
    }

    async fn execute_command(
        &self,
        device_url: &DeviceUrl,
        command: &Command,
        _label: &str,
    ) -> Result<ExecId, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(MockCall::Execute(device_url.clone(), command.clone()));

        if let Some(message) = &inner.fail_execute {
            return Err(message.clone().into());
        }
        if inner.rejected.contains(&command.name) {
            return Err(Box::new(InvalidCommand {
                command: command.name.clone(),
                message: "Unknown command for this device".to_string(),
            }));
        }

        inner.next_exec += 1;
        let id = ExecId(format!("exec-{}", inner.next_exec));

        let remaining = inner.completion_polls;
        if remaining != Some(0) {
            inner.running.push(Running {
                execution: Execution {
                    id: id.clone(),
                    device_url: device_url.clone(),
                    commands: vec![command.clone()],
                },
                remaining,
            });
        }

        Ok(id)
    }

    async fn current_executions(&self) -> Result<Vec<Execution>, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(MockCall::CurrentExecutions);

        let listed = inner.running.iter().map(|r| r.execution.clone()).collect();

        for r in inner.running.iter_mut() {
            if let Some(n) = r.remaining.as_mut() {
                *n = n.saturating_sub(1);
            }
        }
        inner.running.retain(|r| r.remaining != Some(0));

        Ok(listed)
    }

    async fn cancel_execution(&self, exec_id: &ExecId) -> Result<(), ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(MockCall::Cancel(exec_id.clone()));
        inner.running.retain(|r| &r.execution.id != exec_id);
        Ok(())
    }

    async fn get_states(&self, device_url: &DeviceUrl) -> Result<Vec<State>, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(MockCall::GetStates(device_url.clone()));
        Ok(inner.states.get(device_url).cloned().unwrap_or_default())
    }

    async fn execution_history(&self) -> Result<Vec<HistoryExecution>, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(MockCall::History);
        Ok(inner.history.clone())
    }
}
