use std::time::Duration;

use crate::integrations::overkiz::ExecId;

/// Error type returned by the vendor SDK behind [`OverkizClient`].
///
/// [`OverkizClient`]: crate::integrations::overkiz::OverkizClient
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// The hub rejected a command as unknown or malformed
///
/// Clients box this into a [`ClientError`] so callers can tell it apart from
/// transport or authentication failures.
#[derive(Debug, thiserror::Error)]
#[error("Invalid command {command}: {message}")]
pub struct InvalidCommand {
    pub command: String,
    pub message: String,
}

/// Errors produced while driving Overkiz devices
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The vendor client failed; the original error is kept as the source
    #[error("Overkiz client error: {0}")]
    Client(#[from] ClientError),

    /// A dispatched command was still listed as running when the wait expired
    #[error("Execution {exec_id} did not complete within {timeout:?}")]
    ExecutionTimeout { exec_id: ExecId, timeout: Duration },

    /// A host message referenced an entity this integration does not own
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// `setup` was called again while the integration is running
    #[error("Integration is already set up")]
    AlreadySetUp,
}

impl Error {
    /// Whether the hub rejected the command itself
    pub fn is_invalid_command(&self) -> bool {
        matches!(self, Error::Client(e) if e.downcast_ref::<InvalidCommand>().is_some())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
