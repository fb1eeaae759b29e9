//! OSC address space of the tiles app
//!
//! Every address the control layer emits lives under `/tiles`, e.g.
//! `/tiles/startPMI` or `/tiles/userName/block`.

use crate::{error::TilesError, Result};

/// Namespace prefix shared by every outgoing address
pub const ADDRESS_PREFIX: &str = "/tiles";

/// Maximum length of an OSC address string
const MAX_OSC_ADDRESS_LENGTH: usize = 1024;

/// Join the namespace prefix with an action suffix beginning with `/`
pub fn tiles_address(suffix: &str) -> String {
    debug_assert!(suffix.starts_with('/'), "suffix must start with '/'");
    format!("{}{}", ADDRESS_PREFIX, suffix)
}

/// Split an address into its `/tiles` prefix and the action suffix.
///
/// Returns the suffix including its leading `/`:
/// - `/tiles/startPMI` -> `/startPMI`
/// - `/tiles/tileIndex/block` -> `/tileIndex/block`
pub fn strip_tiles_prefix(address: &str) -> Result<&str> {
    if address.len() > MAX_OSC_ADDRESS_LENGTH {
        return Err(TilesError::InvalidMessage(format!(
            "OSC address too long (max {} chars)",
            MAX_OSC_ADDRESS_LENGTH
        )));
    }

    let suffix = address.strip_prefix(ADDRESS_PREFIX).ok_or_else(|| {
        TilesError::InvalidMessage(format!("OSC address must start with /tiles: {}", address))
    })?;

    if !suffix.starts_with('/') || suffix.len() < 2 {
        return Err(TilesError::InvalidMessage(format!(
            "Invalid OSC address: {}",
            address
        )));
    }

    if suffix.split('/').skip(1).any(str::is_empty) {
        return Err(TilesError::InvalidMessage(format!(
            "Empty path segment in OSC address: {}",
            address
        )));
    }

    Ok(suffix)
}
