//! Turns a triggered action into commands and hands them to a sink
//!
//! All commands for an action are built and validated before the first one
//! is sent, so a validation failure never results in a partial send.

use tracing::{debug, error};

use super::fields::{
    check_range, non_empty, parse_int, single_name, split_exact, split_name_list, ActionError,
    ValidationError,
};
use super::TilesAction;
use crate::interpolate::Interpolator;
use crate::osc::{Command, TypedArgument};
use crate::transport::CommandSink;

/// Valid range of the numeric gallery option
const GALLERY_RANGE: std::ops::RangeInclusive<i32> = 0..=10;

/// Outcome of handing an action's commands to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// Commands written to the socket
    pub sent: usize,
    /// Commands dropped by the transport
    pub failed: usize,
}

impl DispatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Resolve, validate and send one action.
///
/// Returns an error only for validation failures, in which case nothing was
/// sent. Transport failures are logged per command and counted in the report.
pub async fn dispatch(
    action: &TilesAction,
    interpolator: &dyn Interpolator,
    sink: &dyn CommandSink,
) -> Result<DispatchReport, ActionError> {
    debug!("Action {} triggered", action.name());
    let commands = build_commands(action, interpolator).await?;
    Ok(send_all(&commands, sink))
}

/// Send commands in order; a failed command does not stop the rest
pub fn send_all(commands: &[Command], sink: &dyn CommandSink) -> DispatchReport {
    let mut report = DispatchReport::default();
    for command in commands {
        match sink.send(command) {
            Ok(()) => report.sent += 1,
            Err(e) => {
                error!("sendCommand error for {}: {}", command, e);
                report.failed += 1;
            }
        }
    }
    report
}

/// Build the commands for an action without sending them
pub async fn build_commands(
    action: &TilesAction,
    interpolator: &dyn Interpolator,
) -> Result<Vec<Command>, ActionError> {
    let suffix = action.suffix();
    let fail = |source: ValidationError| ActionError {
        action: action.name(),
        source,
    };

    let command = match action {
        TilesAction::StartPersonalMeeting
        | TilesAction::StartInstantMeeting
        | TilesAction::LeaveMeeting
        | TilesAction::StartCaptureEngine
        | TilesAction::StopCaptureEngine
        | TilesAction::StartQueueTimer
        | TilesAction::StopQueueTimer => Command::build(suffix),

        TilesAction::JoinMeeting {
            meeting_id,
            password,
            name,
        } => {
            let name = interpolator.interpolate(name).await;
            let meeting_id = interpolator.interpolate(meeting_id).await;
            let password = interpolator.interpolate(password).await;
            Command::build(suffix)
                .with_string(meeting_id)
                .with_string(password)
                .with_string(name)
        }

        TilesAction::ZakJoin {
            zak,
            meeting_id,
            password,
            name,
        } => {
            let name = interpolator.interpolate(name).await;
            let zak = interpolator.interpolate(zak).await;
            let meeting_id = interpolator.interpolate(meeting_id).await;
            let password = interpolator.interpolate(password).await;
            Command::build(suffix)
                .with_string(zak)
                .with_string(meeting_id)
                .with_string(name)
                .with_string(password)
        }

        TilesAction::EnableGallery { gallery_index }
        | TilesAction::DisableGallery { gallery_index }
        | TilesAction::ActivateHolePunch { gallery_index }
        | TilesAction::DeactivateHolePunch { gallery_index } => {
            let gallery =
                check_range("galleryIndex", *gallery_index, GALLERY_RANGE).map_err(fail)?;
            Command::build(suffix).with_int(gallery)
        }

        TilesAction::BlockByIndex {
            gallery_index,
            tile_index,
        }
        | TilesAction::UnBlockByIndex {
            gallery_index,
            tile_index,
        }
        | TilesAction::FavoriteByIndex {
            gallery_index,
            tile_index,
        } => {
            let gallery_raw = interpolator.interpolate(gallery_index).await;
            let tile_raw = interpolator.interpolate(tile_index).await;
            let gallery = parse_int("galleryIndex", &gallery_raw).map_err(fail)?;
            let tile = parse_int("tileIndex", &tile_raw).map_err(fail)?;
            Command::build(suffix).with_int(gallery).with_int(tile)
        }

        TilesAction::BlockByUserName { user_name }
        | TilesAction::UnBlockByUserName { user_name }
        | TilesAction::FavoriteByUserName { user_name } => {
            let raw = interpolator.interpolate(user_name).await;
            let names = split_name_list("userName", &raw).map_err(fail)?;
            return Ok(names
                .into_iter()
                .map(|name| Command::build(suffix).with_string(name))
                .collect());
        }

        TilesAction::ReplaceTileIndexByNewUserName {
            gallery_index,
            tile_index,
            user_name,
        } => {
            let gallery_raw = interpolator.interpolate(gallery_index).await;
            let tile_raw = interpolator.interpolate(tile_index).await;
            let user_raw = interpolator.interpolate(user_name).await;
            let gallery = parse_int("galleryIndex", &gallery_raw).map_err(fail)?;
            let tile = parse_int("tileIndex", &tile_raw).map_err(fail)?;
            let user = single_name("userName", &user_raw).map_err(fail)?;
            Command::build(suffix)
                .with_int(gallery)
                .with_int(tile)
                .with_string(user)
        }

        TilesAction::ReplaceTileIndexByTileIndex {
            current_gallery_index,
            current_tile_index,
            new_gallery_index,
            new_tile_index,
        } => {
            let fields = [
                ("currentGalleryIndex", current_gallery_index),
                ("currentTileIndex", current_tile_index),
                ("newGalleryIndex", new_gallery_index),
                ("newTileIndex", new_tile_index),
            ];
            let mut resolved = Vec::with_capacity(fields.len());
            for (field, raw) in fields {
                resolved.push((field, interpolator.interpolate(raw).await));
            }

            let mut command = Command::build(suffix);
            for (field, raw) in resolved {
                command.push(TypedArgument::Int(parse_int(field, &raw).map_err(fail)?));
            }
            command
        }

        TilesAction::ReplaceUserWithNewTileIndex {
            user_name,
            replace_gallery_index,
            replace_tile_index,
        } => {
            let user = interpolator.interpolate(user_name).await;
            let gallery_raw = interpolator.interpolate(replace_gallery_index).await;
            let tile_raw = interpolator.interpolate(replace_tile_index).await;
            let gallery = parse_int("replaceGalleryIndex", &gallery_raw).map_err(fail)?;
            let tile = parse_int("replaceTileIndex", &tile_raw).map_err(fail)?;
            Command::build(suffix)
                .with_string(user)
                .with_int(gallery)
                .with_int(tile)
        }

        TilesAction::ReplaceUserWithNewUser { user_name } => {
            let raw = interpolator.interpolate(user_name).await;
            let names = split_exact("userName", &raw, 2).map_err(fail)?;
            let mut command = Command::build(suffix);
            for name in names {
                command.push(TypedArgument::String(name));
            }
            command
        }

        TilesAction::LoadConfiguration { file_path } => {
            let raw = interpolator.interpolate(file_path).await;
            let path = non_empty("filePath", &raw).map_err(fail)?;
            Command::build(suffix).with_string(path)
        }
    };

    Ok(vec![command])
}
