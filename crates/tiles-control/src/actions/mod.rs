//! User-triggerable actions
//!
//! Each [`TilesAction`] variant carries the option values a control surface
//! entered for it. Text options may contain template tokens and are resolved
//! at dispatch time; numeric gallery options are plain integers.
//!
//! Actions deserialize from JSON tagged by their id:
//!
//! ```rust
//! use tiles_control::TilesAction;
//!
//! let action: TilesAction =
//!     serde_json::from_str(r#"{"action":"blockByIndex","galleryIndex":"2","tileIndex":"5"}"#)
//!         .unwrap();
//! assert_eq!(action.id(), "blockByIndex");
//! ```

mod dispatch;
mod fields;

pub use dispatch::{build_commands, dispatch, send_all, DispatchReport};
pub use fields::{ActionError, ValidationError};

use serde::{Deserialize, Serialize};

fn default_index() -> String {
    "1".to_string()
}

fn default_gallery() -> i32 {
    1
}

/// An action the control surface can trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TilesAction {
    // === Join / Leave ===
    #[serde(rename = "startPMI")]
    StartPersonalMeeting,
    #[serde(rename = "startIM")]
    StartInstantMeeting,
    JoinMeeting {
        meeting_id: String,
        #[serde(default)]
        password: String,
        #[serde(default)]
        name: String,
    },
    ZakJoin {
        zak: String,
        meeting_id: String,
        #[serde(default)]
        password: String,
        #[serde(default)]
        name: String,
    },
    LeaveMeeting,

    // === Capture ===
    StartCaptureEngine,
    StopCaptureEngine,

    // === Gallery / Timer ===
    StartQueueTimer,
    StopQueueTimer,
    EnableGallery {
        #[serde(default = "default_gallery")]
        gallery_index: i32,
    },
    DisableGallery {
        #[serde(default = "default_gallery")]
        gallery_index: i32,
    },
    ActivateHolePunch {
        #[serde(default = "default_gallery")]
        gallery_index: i32,
    },
    DeactivateHolePunch {
        #[serde(default = "default_gallery")]
        gallery_index: i32,
    },

    // === Block ===
    BlockByIndex {
        #[serde(default = "default_index")]
        gallery_index: String,
        #[serde(default = "default_index")]
        tile_index: String,
    },
    BlockByUserName {
        user_name: String,
    },
    UnBlockByIndex {
        #[serde(default = "default_index")]
        gallery_index: String,
        #[serde(default = "default_index")]
        tile_index: String,
    },
    UnBlockByUserName {
        user_name: String,
    },

    // === Favorite ===
    FavoriteByIndex {
        #[serde(default = "default_index")]
        gallery_index: String,
        #[serde(default = "default_index")]
        tile_index: String,
    },
    FavoriteByUserName {
        user_name: String,
    },

    // === Replace ===
    ReplaceTileIndexByNewUserName {
        #[serde(default = "default_index")]
        gallery_index: String,
        #[serde(default = "default_index")]
        tile_index: String,
        user_name: String,
    },
    ReplaceTileIndexByTileIndex {
        #[serde(default = "default_index")]
        current_gallery_index: String,
        #[serde(default = "default_index")]
        current_tile_index: String,
        #[serde(default = "default_index")]
        new_gallery_index: String,
        #[serde(default = "default_index")]
        new_tile_index: String,
    },
    ReplaceUserWithNewTileIndex {
        user_name: String,
        #[serde(default = "default_index")]
        replace_gallery_index: String,
        #[serde(default = "default_index")]
        replace_tile_index: String,
    },
    ReplaceUserWithNewUser {
        user_name: String,
    },

    // === Configuration ===
    LoadConfiguration {
        file_path: String,
    },
}

/// Static description of one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionInfo {
    /// Stable id, also the JSON `action` tag
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Address suffix under `/tiles`
    pub suffix: &'static str,
    pub description: &'static str,
}

const fn info(
    id: &'static str,
    name: &'static str,
    suffix: &'static str,
    description: &'static str,
) -> ActionInfo {
    ActionInfo {
        id,
        name,
        suffix,
        description,
    }
}

/// Every action, in catalog order
pub const CATALOG: &[ActionInfo] = &[
    info(
        "startPMI",
        "Start Personal Meeting ID",
        "/startPMI",
        "Start a meeting using your Personal Meeting ID",
    ),
    info(
        "startIM",
        "Start Instant Meeting",
        "/startIM",
        "Start an instant meeting",
    ),
    info(
        "joinMeeting",
        "Join Meeting",
        "/joinMeeting",
        "Join a meeting with Meeting ID, Password, and Display Name",
    ),
    info(
        "zakJoin",
        "ZAK Join Meeting",
        "/zakJoin",
        "Join a meeting using ZAK token, Meeting ID, Password, and Display Name",
    ),
    info(
        "leaveMeeting",
        "Leave Meeting",
        "/leaveMeeting",
        "Leave the current meeting",
    ),
    info(
        "startCaptureEngine",
        "Start Capture Engine",
        "/startCaptureEngine",
        "Start the capture engine",
    ),
    info(
        "stopCaptureEngine",
        "Stop Capture Engine",
        "/stopCaptureEngine",
        "Stop the capture engine",
    ),
    info(
        "startQueueTimer",
        "Start Queue Timer",
        "/startQueueTimer",
        "Start the queue timer for gallery updates",
    ),
    info(
        "stopQueueTimer",
        "Stop Queue Timer",
        "/stopQueueTimer",
        "Stop the queue timer for gallery updates",
    ),
    info(
        "enableGallery",
        "Enable Gallery",
        "/enableGallery",
        "Enable a specific gallery view",
    ),
    info(
        "disableGallery",
        "Disable Gallery",
        "/disableGallery",
        "Disable a specific gallery view",
    ),
    info(
        "activateHolePunch",
        "Activate Hole Punch",
        "/activateHolePunch",
        "Activate hole punch for a specific gallery view",
    ),
    info(
        "deactivateHolePunch",
        "Deactivate Hole Punch",
        "/deactivateHolePunch",
        "Deactivate hole punch for a specific gallery view",
    ),
    info(
        "blockByIndex",
        "Block by Index",
        "/tileIndex/block",
        "Block a tile using the gallery index and tile index",
    ),
    info(
        "blockByUserName",
        "Block by User Name",
        "/userName/block",
        "Block user(s) by user name; separate multiple names with a comma",
    ),
    info(
        "unBlockByIndex",
        "UnBlock by Index",
        "/tileIndex/unBlock",
        "UnBlock a tile using the gallery index and tile index",
    ),
    info(
        "unBlockByUserName",
        "UnBlock by User Name",
        "/userName/unBlock",
        "UnBlock user(s) by user name; separate multiple names with a comma",
    ),
    info(
        "favoriteByIndex",
        "Favorite by Index",
        "/tileIndex/favorite",
        "Favorite a tile using the gallery index and tile index",
    ),
    info(
        "favoriteByUserName",
        "Favorite by User Name",
        "/userName/favorite",
        "Favorite user(s) by user name; separate multiple names with a comma",
    ),
    info(
        "replaceTileIndexByNewUserName",
        "Replace Tile Index in a Gallery with a New User",
        "/tileIndex/replaceByName",
        "Replace a tile with a specific user; swaps places if both are already in the gallery",
    ),
    info(
        "replaceTileIndexByTileIndex",
        "Replace Tile Index with Tile Index",
        "/tileIndex/replaceByIndex",
        "Replace a tile index with another tile index",
    ),
    info(
        "replaceUserWithNewTileIndex",
        "Replace User with Tile Index",
        "/userName/replaceByIndex",
        "Replace a user with a specific gallery/tile index",
    ),
    info(
        "replaceUserWithNewUser",
        "Replace by User Name",
        "/userName/replaceByName",
        "Replace a user with a new user wherever they are; enter: UserToReplace, NewUser",
    ),
    info(
        "loadConfiguration",
        "Load Configuration",
        "/loadConfiguration",
        "Load a configuration file from an absolute path on the tiles machine",
    ),
];

impl TilesAction {
    /// Stable action id
    pub fn id(&self) -> &'static str {
        match self {
            Self::StartPersonalMeeting => "startPMI",
            Self::StartInstantMeeting => "startIM",
            Self::JoinMeeting { .. } => "joinMeeting",
            Self::ZakJoin { .. } => "zakJoin",
            Self::LeaveMeeting => "leaveMeeting",
            Self::StartCaptureEngine => "startCaptureEngine",
            Self::StopCaptureEngine => "stopCaptureEngine",
            Self::StartQueueTimer => "startQueueTimer",
            Self::StopQueueTimer => "stopQueueTimer",
            Self::EnableGallery { .. } => "enableGallery",
            Self::DisableGallery { .. } => "disableGallery",
            Self::ActivateHolePunch { .. } => "activateHolePunch",
            Self::DeactivateHolePunch { .. } => "deactivateHolePunch",
            Self::BlockByIndex { .. } => "blockByIndex",
            Self::BlockByUserName { .. } => "blockByUserName",
            Self::UnBlockByIndex { .. } => "unBlockByIndex",
            Self::UnBlockByUserName { .. } => "unBlockByUserName",
            Self::FavoriteByIndex { .. } => "favoriteByIndex",
            Self::FavoriteByUserName { .. } => "favoriteByUserName",
            Self::ReplaceTileIndexByNewUserName { .. } => "replaceTileIndexByNewUserName",
            Self::ReplaceTileIndexByTileIndex { .. } => "replaceTileIndexByTileIndex",
            Self::ReplaceUserWithNewTileIndex { .. } => "replaceUserWithNewTileIndex",
            Self::ReplaceUserWithNewUser { .. } => "replaceUserWithNewUser",
            Self::LoadConfiguration { .. } => "loadConfiguration",
        }
    }

    /// Catalog entry for this action
    pub fn info(&self) -> &'static ActionInfo {
        let id = self.id();
        CATALOG
            .iter()
            .find(|info| info.id == id)
            .unwrap_or_else(|| unreachable!("action {} missing from catalog", id))
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Address suffix under `/tiles`
    pub fn suffix(&self) -> &'static str {
        self.info().suffix
    }

    /// Parse an action from its JSON form
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_and_suffixes_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|i| i.id).collect();
        let suffixes: HashSet<_> = CATALOG.iter().map(|i| i.suffix).collect();
        assert_eq!(ids.len(), CATALOG.len());
        assert_eq!(suffixes.len(), CATALOG.len());
        assert!(CATALOG.iter().all(|i| i.suffix.starts_with('/')));
    }

    #[test]
    fn test_json_tag_matches_id() {
        let action = TilesAction::from_json(r#"{"action":"startPMI"}"#).unwrap();
        assert_eq!(action, TilesAction::StartPersonalMeeting);
        assert_eq!(action.suffix(), "/startPMI");

        let action =
            TilesAction::from_json(r#"{"action":"unBlockByUserName","userName":"Gus"}"#).unwrap();
        assert_eq!(action.id(), "unBlockByUserName");
        assert_eq!(action.name(), "UnBlock by User Name");

        let action = TilesAction::from_json(
            r#"{"action":"zakJoin","zak":"tok","meetingId":"123","name":"Host"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            TilesAction::ZakJoin {
                zak: "tok".into(),
                meeting_id: "123".into(),
                password: String::new(),
                name: "Host".into(),
            }
        );
    }

    #[test]
    fn test_json_defaults() {
        let action = TilesAction::from_json(r#"{"action":"blockByIndex"}"#).unwrap();
        assert_eq!(
            action,
            TilesAction::BlockByIndex {
                gallery_index: "1".into(),
                tile_index: "1".into(),
            }
        );

        let action = TilesAction::from_json(r#"{"action":"enableGallery"}"#).unwrap();
        assert_eq!(action, TilesAction::EnableGallery { gallery_index: 1 });
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(TilesAction::from_json(r#"{"action":"selfDestruct"}"#).is_err());
        let json = r#"{"action":"enableGallery","galleryIndex":"two"}"#;
        assert!(TilesAction::from_json(json).is_err());
    }

    #[test]
    fn test_every_catalog_entry_parses() {
        for info in CATALOG {
            let json = match info.id {
                "joinMeeting" => format!(r#"{{"action":"{}","meetingId":"1"}}"#, info.id),
                "zakJoin" => format!(r#"{{"action":"{}","zak":"z","meetingId":"1"}}"#, info.id),
                "loadConfiguration" => {
                    format!(r#"{{"action":"{}","filePath":"/tmp/a"}}"#, info.id)
                }
                id if id.contains("UserName") || id.contains("WithNew") => {
                    format!(r#"{{"action":"{}","userName":"A"}}"#, info.id)
                }
                _ => format!(r#"{{"action":"{}"}}"#, info.id),
            };
            let action = TilesAction::from_json(&json)
                .unwrap_or_else(|e| panic!("{} failed to parse: {}", info.id, e));
            assert_eq!(action.id(), info.id);
            assert_eq!(action.suffix(), info.suffix);
        }
    }
}
