use ha_chat::Command;
use ha_core::{BuildPermission, ParticipantId};

use crate::{CommandListener, HostContext};

// ── pause ─────────────────────────────────────────────────────────────────────

/// `pause`: toggles the world pause and tells everyone.
pub struct PauseListener;

impl CommandListener for PauseListener {
    fn names(&self) -> &'static [&'static str] {
        &["pause"]
    }

    fn admin_only(&self) -> bool {
        true
    }

    fn handle(&self, ctx: &mut HostContext, sender: ParticipantId, _cmd: &Command) {
        let paused = !ctx.world.is_paused();
        if let Err(error) = ctx.world.set_paused(paused) {
            tracing::warn!(%sender, paused, %error, "could not toggle pause");
            ctx.reply(sender, format!("Error: {error}"));
            return;
        }
        let name = ctx.name_of(sender);
        tracing::info!(%sender, paused, "pause toggled");
        ctx.announce(if paused {
            format!("Game paused by {name}.")
        } else {
            format!("Game resumed by {name}.")
        });
    }
}

// ── mbp ───────────────────────────────────────────────────────────────────────

/// `mbp <off|owned|on>`: changes who may move buildings.
pub struct MoveBuildPermissionListener;

fn valid_parameters() -> String {
    BuildPermission::ALL.map(BuildPermission::as_str).join(", ")
}

impl CommandListener for MoveBuildPermissionListener {
    fn names(&self) -> &'static [&'static str] {
        &["mbp", "movebuildpermission"]
    }

    fn admin_only(&self) -> bool {
        true
    }

    fn handle(&self, ctx: &mut HostContext, sender: ParticipantId, cmd: &Command) {
        let requested = match cmd.args.as_slice() {
            [arg] => arg.parse::<BuildPermission>().ok(),
            _ => None,
        };
        let Some(permission) = requested else {
            ctx.reply(
                sender,
                format!("Error: Only the following parameter are valid: {}", valid_parameters()),
            );
            return;
        };
        if permission == ctx.move_build_permission {
            ctx.reply(sender, format!("Error: The parameter is already {permission}"));
            return;
        }
        if let Err(error) = ctx.world.set_move_build_permission(permission) {
            tracing::warn!(%sender, %permission, %error, "could not change move-build permission");
            ctx.reply(sender, format!("Error: {error}"));
            return;
        }
        let previous = std::mem::replace(&mut ctx.move_build_permission, permission);
        let name = ctx.name_of(sender);
        tracing::info!(%sender, %previous, %permission, "move-build permission changed");
        ctx.announce(format!("{name} Changed MoveBuildPermission to {permission}"));
    }
}
