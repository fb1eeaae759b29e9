//! OSC message model for the tiles app
//!
//! - [`address`] - the `/tiles` address namespace
//! - [`command`] - outgoing commands and their typed arguments
//! - [`types`] - conversion to and from `rosc` wire types

pub mod address;
pub mod command;
pub mod types;

pub use address::{strip_tiles_prefix, tiles_address, ADDRESS_PREFIX};
pub use command::{Command, RawValue, TypedArgument};
pub use types::{decode_datagram, encode_command, message_to_command};
