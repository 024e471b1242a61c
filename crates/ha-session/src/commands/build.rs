use ha_chat::Command;
use ha_core::ParticipantId;
use ha_world::{locations, StructureKind};

use crate::{CommandListener, HostContext};

pub const OUTSIDE_FARM: &str = "Error: You cannot place buildings outside of the farm!";

/// `build <kind>`: places a cabin on the tile in front of the requester.
pub struct BuildListener;

/// `"stone_cabin", "plank_cabin", and "log_cabin"`.
fn valid_names() -> String {
    let names: Vec<String> = StructureKind::BUILDABLE
        .iter()
        .filter_map(StructureKind::command_name)
        .map(|n| format!("\"{n}\""))
        .collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, and {last}", rest.join(", ")),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

fn list_valid_names(ctx: &mut HostContext, to: ParticipantId) {
    ctx.reply(to, format!("Valid building names include {}", valid_names()));
}

impl CommandListener for BuildListener {
    fn names(&self) -> &'static [&'static str] {
        &["build"]
    }

    fn handle(&self, ctx: &mut HostContext, sender: ParticipantId, cmd: &Command) {
        let token = match cmd.args.as_slice() {
            [token] => token.as_str(),
            _ => {
                ctx.reply(sender, "Error: Invalid command usage.");
                ctx.reply(sender, "Usage: build [building_name]");
                list_valid_names(ctx, sender);
                return;
            }
        };
        let Some(kind) = StructureKind::from_command_name(token) else {
            tracing::debug!(%sender, token, "unknown building name");
            ctx.reply(sender, format!("Error: Unrecognized building name \"{token}\""));
            list_valid_names(ctx, sender);
            return;
        };
        let Some(position) = ctx.world.position_of(sender) else {
            tracing::warn!(%sender, "build requested by a participant with no position");
            return;
        };
        if !position.is_in(locations::FARM) {
            ctx.reply(sender, OUTSIDE_FARM);
            return;
        }

        let tile = position.tile_in_front();
        match ctx.world.place_structure(&kind, tile, sender) {
            Ok(id) => {
                let name = ctx.name_of(sender);
                tracing::info!(%sender, %kind, ?tile, ?id, "structure built");
                ctx.announce(format!("{name} built a {kind}."));
            }
            Err(error) => {
                tracing::warn!(%sender, %kind, ?tile, %error, "build failed");
                ctx.reply(sender, format!("Error: Could not build a {kind}: {error}"));
            }
        }
    }
}
