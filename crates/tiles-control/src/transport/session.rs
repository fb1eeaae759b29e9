//! UDP transport session
//!
//! A session owns one socket for its whole life:
//!
//! ```text
//! new() -> Connecting --connect()--> Listening --destroy()--> Destroyed
//!                          \
//!                           +------> Error (bind failed) --destroy()--> Destroyed
//! ```
//!
//! Sends are non-blocking and never awaited. Anything that arrives on the
//! socket is decoded and logged by a background receive task.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::status::{ConnectionStatus, StatusReporter};
use super::{CommandSink, TransportError};
use crate::config::ConnectionConfig;
use crate::osc::{self, Command};

/// Maximum UDP datagram size
const MAX_DATAGRAM_SIZE: usize = 65_536;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Listening,
    Error,
    Destroyed,
}

/// Owns the UDP socket used to talk to the tiles app
pub struct TransportSession {
    config: ConnectionConfig,
    state: SessionState,
    socket: Option<Arc<UdpSocket>>,
    receiver: Option<JoinHandle<()>>,
    status: Arc<dyn StatusReporter>,
}

impl TransportSession {
    /// Create a session in the `Connecting` state. Call [`connect`](Self::connect) to bind.
    pub fn new(config: ConnectionConfig, status: Arc<dyn StatusReporter>) -> Self {
        status.report(ConnectionStatus::Connecting);
        Self {
            config,
            state: SessionState::Connecting,
            socket: None,
            receiver: None,
            status,
        }
    }

    /// Bind the local socket and start listening for inbound datagrams.
    ///
    /// The outcome is reported through the status reporter. A bind failure
    /// leaves the session in `Error` until it is replaced; there is no retry.
    /// Must be called from within a tokio runtime.
    pub fn connect(&mut self) {
        if self.state != SessionState::Connecting {
            warn!("connect() ignored in state {:?}", self.state);
            return;
        }

        match bind(self.config.bind) {
            Ok(socket) => {
                let socket = Arc::new(socket);
                let local = socket.local_addr().unwrap_or(self.config.bind);
                self.receiver = Some(tokio::spawn(receive_loop(Arc::clone(&socket))));
                self.socket = Some(socket);
                self.state = SessionState::Listening;

                info!(
                    "Listening to tiles app on {} (sending to {})",
                    local, self.config.target
                );
                self.status.report(ConnectionStatus::Listening);
            }
            Err(e) => {
                self.state = SessionState::Error;
                let reason = if e.kind() == io::ErrorKind::AddrInUse {
                    format!("Selected port in use: {} ({})", self.config.bind, e)
                } else {
                    format!("Cannot bind {}: {}", self.config.bind, e)
                };
                error!("{}", reason);
                self.status.report(ConnectionStatus::BadConfig(reason));
            }
        }
    }

    /// Encode `command` and write it as one datagram to the target.
    ///
    /// Never blocks and never panics. A failure affects only this command;
    /// the session keeps accepting further sends.
    pub fn send(&self, command: &Command) -> Result<(), TransportError> {
        let socket = match (self.state, &self.socket) {
            (SessionState::Destroyed, _) => return Err(TransportError::Closed),
            (_, Some(socket)) => socket,
            (_, None) => return Err(TransportError::NotConnected),
        };

        let bytes = osc::encode_command(command)
            .map_err(|e| TransportError::Encode(e.to_string()))?;

        debug!("sending {} to {}", command, self.config.target);
        socket.try_send_to(&bytes, self.config.target)?;
        Ok(())
    }

    /// Close the socket and stop the receive task.
    ///
    /// Idempotent. When this returns the socket has been released, so a new
    /// session may bind the same address.
    pub async fn destroy(&mut self) {
        if self.state == SessionState::Destroyed {
            return;
        }

        self.socket = None;
        if let Some(handle) = self.receiver.take() {
            handle.abort();
            // The task holds the last socket reference until it is dropped
            let _ = handle.await;
        }
        self.state = SessionState::Destroyed;

        debug!("Transport session to {} destroyed", self.config.target);
        self.status.report(ConnectionStatus::Disconnected);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Address the socket is actually bound to, if open
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    pub fn target(&self) -> SocketAddr {
        self.config.target
    }
}

impl CommandSink for TransportSession {
    fn send(&self, command: &Command) -> Result<(), TransportError> {
        TransportSession::send(self, command)
    }
}

impl Drop for TransportSession {
    fn drop(&mut self) {
        if let Some(handle) = self.receiver.take() {
            handle.abort();
        }
    }
}

fn bind(addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = std::net::UdpSocket::bind(addr)?;
    socket.set_nonblocking(true)?;
    UdpSocket::from_std(socket)
}

async fn receive_loop(socket: Arc<UdpSocket>) {
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, from)) => log_inbound(&buf[..len], from),
            // ICMP feedback from an earlier send; the socket is still usable
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionRefused
                ) =>
            {
                debug!("Ignoring receive error: {}", e);
            }
            Err(e) => {
                error!("Receive loop stopped: {}", e);
                break;
            }
        }
    }
}

fn log_inbound(bytes: &[u8], from: SocketAddr) {
    let messages = match osc::decode_datagram(bytes) {
        Ok(messages) => messages,
        Err(e) => {
            warn!("Unable to process {} bytes from {}: {}", bytes.len(), from, e);
            return;
        }
    };

    for message in messages {
        if osc::strip_tiles_prefix(&message.addr).is_err() {
            debug!("Message from {} outside the /tiles namespace", from);
        }
        match osc::message_to_command(&message) {
            Ok(command) => debug!("Processing OSC message from {}: {}", from, command),
            Err(_) => debug!("Processing OSC message from {}: {:?}", from, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ConnectionStatus>>);

    impl StatusReporter for Recorder {
        fn report(&self, status: ConnectionStatus) {
            self.0.lock().unwrap().push(status);
        }
    }

    fn loopback_config(target: SocketAddr) -> ConnectionConfig {
        ConnectionConfig {
            target,
            bind: "127.0.0.1:0".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_connect_reports_listening() {
        let recorder = Arc::new(Recorder::default());
        let mut session = TransportSession::new(
            loopback_config("127.0.0.1:9".parse().unwrap()),
            recorder.clone(),
        );
        assert_eq!(session.state(), SessionState::Connecting);

        session.connect();
        assert_eq!(session.state(), SessionState::Listening);
        assert!(session.local_addr().is_some());

        session.destroy().await;
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                ConnectionStatus::Connecting,
                ConnectionStatus::Listening,
                ConnectionStatus::Disconnected
            ]
        );
    }

    #[tokio::test]
    async fn test_send_before_connect() {
        let session = TransportSession::new(
            loopback_config("127.0.0.1:9".parse().unwrap()),
            Arc::new(Recorder::default()),
        );
        let result = session.send(&Command::build("/startPMI"));
        assert!(matches!(result, Err(TransportError::NotConnected)));
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let recorder = Arc::new(Recorder::default());
        let mut session = TransportSession::new(
            loopback_config("127.0.0.1:9".parse().unwrap()),
            recorder.clone(),
        );
        session.connect();

        session.destroy().await;
        session.destroy().await;

        assert_eq!(session.state(), SessionState::Destroyed);
        assert!(session.local_addr().is_none());
        assert!(matches!(
            session.send(&Command::build("/leaveMeeting")),
            Err(TransportError::Closed)
        ));
        let disconnects = recorder
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|s| **s == ConnectionStatus::Disconnected)
            .count();
        assert_eq!(disconnects, 1);
    }

    #[tokio::test]
    async fn test_destroy_never_connected() {
        let mut session = TransportSession::new(
            loopback_config("127.0.0.1:9".parse().unwrap()),
            Arc::new(Recorder::default()),
        );
        session.destroy().await;
        assert_eq!(session.state(), SessionState::Destroyed);
    }

    #[tokio::test]
    async fn test_connect_after_destroy_is_ignored() {
        let mut session = TransportSession::new(
            loopback_config("127.0.0.1:9".parse().unwrap()),
            Arc::new(Recorder::default()),
        );
        session.destroy().await;
        session.connect();
        assert_eq!(session.state(), SessionState::Destroyed);
        assert!(session.local_addr().is_none());
    }
}
