//! Connection status reported to the owning instance

use std::fmt;
use tokio::sync::watch;

/// User-facing state of the transport session
///
/// There is no "connected" state: the tiles app never acknowledges commands,
/// so `Listening` only means the local socket opened.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Session constructed, socket not yet bound
    #[default]
    Connecting,
    /// Socket bound; commands can be sent
    Listening,
    /// Configuration cannot be used (bad host, port in use, ...)
    BadConfig(String),
    /// Session destroyed
    Disconnected,
}

impl ConnectionStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ConnectionStatus::Listening)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Listening => write!(f, "OK (listening)"),
            Self::BadConfig(reason) => write!(f, "Bad configuration: {}", reason),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// Receives status changes of the transport session
pub trait StatusReporter: Send + Sync {
    fn report(&self, status: ConnectionStatus);
}

/// Publishes the latest status to any number of watchers
impl StatusReporter for watch::Sender<ConnectionStatus> {
    fn report(&self, status: ConnectionStatus) {
        self.send_replace(status);
    }
}

/// Writes every status change to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

impl StatusReporter for LogStatus {
    fn report(&self, status: ConnectionStatus) {
        match &status {
            ConnectionStatus::BadConfig(_) => tracing::error!("Status: {}", status),
            _ => tracing::info!("Status: {}", status),
        }
    }
}
