//! UDP transport to the tiles app
//!
//! Delivery is fire-and-forget: there is no acknowledgement, retry or
//! ordering guarantee beyond the order in which `send` is called.

pub mod session;
pub mod status;

pub use session::{SessionState, TransportSession};
pub use status::{ConnectionStatus, LogStatus, StatusReporter};

use thiserror::Error;

use crate::osc::Command;

/// Why a single command was not delivered to the socket
#[derive(Error, Debug)]
pub enum TransportError {
    /// The session has been destroyed
    #[error("session closed")]
    Closed,

    /// The socket never opened (bind failed or no usable configuration)
    #[error("not connected")]
    NotConnected,

    /// The command could not be encoded
    #[error("encode error: {0}")]
    Encode(String),

    /// The datagram could not be written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that accepts outgoing commands
pub trait CommandSink: Send + Sync {
    fn send(&self, command: &Command) -> Result<(), TransportError>;
}

/// Sink used while no session exists; every send fails with `NotConnected`
#[derive(Debug, Default, Clone, Copy)]
pub struct Unconnected;

impl CommandSink for Unconnected {
    fn send(&self, _command: &Command) -> Result<(), TransportError> {
        Err(TransportError::NotConnected)
    }
}
