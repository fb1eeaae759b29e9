//! Tiles Control - OSC command layer for the tiles video-conferencing app
//!
//! This crate turns user-triggered actions into OSC messages and delivers
//! them over a managed UDP socket:
//! - **Commands**: `/tiles`-scoped addresses with ordered `s`/`i` arguments
//! - **Actions**: typed action catalog, validation and list fan-out
//! - **Transport**: fire-and-forget UDP session with connection status
//! - **Instance**: owns the configuration and the single active session
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tiles_control::{LogStatus, TilesAction, TilesConfig, TilesInstance, VariableTable};
//!
//! # async fn run() {
//! let mut instance = TilesInstance::new(Arc::new(VariableTable::new()), Arc::new(LogStatus));
//! instance.reconfigure(TilesConfig::default()).await;
//!
//! let action = TilesAction::BlockByUserName {
//!     user_name: "Alice, Bob".to_string(),
//! };
//! instance.run_action(&action).await;
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`osc`] - command model and wire encoding
//! - [`actions`] - action catalog and dispatcher
//! - [`transport`] - UDP session and connection status
//! - [`interpolate`] - template resolution of option values
//! - [`config`] - instance and logging configuration
//! - [`error`] - Error types

#![allow(missing_docs)]

/// Action catalog and dispatcher
pub mod actions;
/// Instance and logging configuration
pub mod config;
/// Error types
pub mod error;
/// Owning control instance
pub mod instance;
/// Template interpolation
pub mod interpolate;
/// OSC command model
pub mod osc;
/// UDP transport session
pub mod transport;

// Re-exports
pub use actions::{ActionError, ActionInfo, DispatchReport, TilesAction, ValidationError, CATALOG};
pub use config::{ConnectionConfig, LogConfig, TilesConfig};
pub use error::{Result, TilesError};
pub use instance::TilesInstance;
pub use interpolate::{Interpolator, VariableTable};
pub use osc::{Command, TypedArgument};
pub use transport::{
    CommandSink, ConnectionStatus, LogStatus, SessionState, StatusReporter, TransportError,
    TransportSession,
};
