//! The owning control instance
//!
//! Holds the configuration and the single transport session slot. The slot
//! is only ever replaced through [`TilesInstance::reconfigure`], which always
//! destroys the previous session before a new one binds.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::actions::{self, DispatchReport, TilesAction};
use crate::config::TilesConfig;
use crate::interpolate::Interpolator;
use crate::transport::{
    CommandSink, ConnectionStatus, StatusReporter, TransportSession, Unconnected,
};

/// One configured connection to a tiles app
pub struct TilesInstance {
    config: TilesConfig,
    session: Option<TransportSession>,
    interpolator: Arc<dyn Interpolator>,
    status: Arc<dyn StatusReporter>,
}

impl TilesInstance {
    /// Create an unconfigured instance; call [`reconfigure`](Self::reconfigure) to connect
    pub fn new(interpolator: Arc<dyn Interpolator>, status: Arc<dyn StatusReporter>) -> Self {
        Self {
            config: TilesConfig::default(),
            session: None,
            interpolator,
            status,
        }
    }

    /// Apply a configuration: destroy the current session, then build and
    /// connect a new one.
    ///
    /// An unusable configuration leaves the slot empty and reports `BadConfig`.
    pub async fn reconfigure(&mut self, config: TilesConfig) {
        info!("Changing config");

        if let Some(mut previous) = self.session.take() {
            previous.destroy().await;
        }
        self.config = config;

        match self.config.connection() {
            Ok(connection) => {
                let mut session = TransportSession::new(connection, Arc::clone(&self.status));
                session.connect();
                self.session = Some(session);
            }
            Err(e) => {
                error!("Cannot apply configuration: {}", e);
                self.status.report(ConnectionStatus::BadConfig(e.to_string()));
            }
        }
    }

    /// Run one action. Never fails: validation and transport errors are logged.
    ///
    /// Returns the dispatch report, or `None` when validation rejected the action.
    pub async fn run_action(&self, action: &TilesAction) -> Option<DispatchReport> {
        let sink: &dyn CommandSink = match &self.session {
            Some(session) => session,
            None => {
                warn!("{} triggered without an active session", action.name());
                &Unconnected
            }
        };

        match actions::dispatch(action, self.interpolator.as_ref(), sink).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Tear down the session (instance disabled or removed)
    pub async fn destroy(&mut self) {
        info!("destroy");
        if let Some(mut session) = self.session.take() {
            session.destroy().await;
        }
    }

    pub fn config(&self) -> &TilesConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&TransportSession> {
        self.session.as_ref()
    }
}
