use ha_chat::{Command, ResponseGroup};
use ha_core::{ParticipantId, TimeoutId};
use ha_world::{locations, StructureId, StructureKind};

use crate::{CommandListener, HostContext};

pub const NO_BUILDING: &str = "Error: No building in front of you.";
pub const LAST_SHIPPING_BIN: &str = "Error: Can't demolish the last shipping bin.";
pub const CANCELLED: &str = "Demolition cancelled.";
pub const TIMED_OUT: &str = "Demolition request timed out.";

/// `demolish`: removes the structure in front of the requester after a
/// private `yes`.
///
/// The request is a `{yes, no}` response group plus an expiry timer of
/// `confirmation_timeout_secs`.  Whichever of answer, `cancel`, disconnect
/// or expiry comes first settles it; the others find nothing left to do.
/// Settling never disarms the timer: it still fires, sees that it is no
/// longer the sender's current timer, and stays silent.
pub struct DemolishListener;

fn confirm(ctx: &mut HostContext, who: ParticipantId, id: StructureId, kind: &StructureKind) {
    ctx.forget_demolition(who);
    match ctx.world.remove_structure(id, who) {
        Ok(()) => {
            let name = ctx.name_of(who);
            tracing::info!(%who, %kind, ?id, "structure demolished");
            ctx.announce(format!("{name} demolished a {kind}."));
        }
        Err(error) => {
            tracing::warn!(%who, %kind, ?id, %error, "demolition failed");
            ctx.reply(who, format!("Error: Can't demolish this building: {error}"));
        }
    }
}

fn expire(ctx: &mut HostContext, who: ParticipantId, timer: TimeoutId) {
    if ctx.demolitions.get(&who) != Some(&timer) {
        tracing::trace!(%who, %timer, "demolition timer found its request settled");
        return;
    }
    ctx.demolitions.remove(&who);
    if ctx.router.withdraw_group(who, "yes") {
        tracing::debug!(%who, "demolition request expired");
        ctx.reply(who, TIMED_OUT);
    }
}

impl CommandListener for DemolishListener {
    fn names(&self) -> &'static [&'static str] {
        &["demolish"]
    }

    fn handle(&self, ctx: &mut HostContext, sender: ParticipantId, _cmd: &Command) {
        let target = ctx
            .world
            .position_of(sender)
            .filter(|p| p.is_in(locations::FARM))
            .and_then(|p| ctx.world.structure_at(p.tile_in_front()));
        let Some(target) = target else {
            ctx.reply(sender, NO_BUILDING);
            return;
        };
        if target.kind == StructureKind::ShippingBin
            && ctx.world.count_structures(&StructureKind::ShippingBin) <= 1
        {
            ctx.reply(sender, LAST_SHIPPING_BIN);
            return;
        }

        // A new request supersedes the sender's previous one.
        ctx.forget_demolition(sender);
        let secs = ctx.config.confirmation_timeout_secs;
        let timer = ctx.timeouts.schedule_with_id(secs, |timer| {
            move |ctx: &mut HostContext| {
                expire(ctx, sender, timer);
                Ok(())
            }
        });
        match timer {
            Some(id) => {
                ctx.demolitions.insert(sender, id);
            }
            None => tracing::warn!(%sender, secs, "demolition request will not expire"),
        }

        let (id, kind) = (target.id, target.kind.clone());
        let group = ResponseGroup::new()
            .on("yes", move |ctx: &mut HostContext| {
                confirm(ctx, sender, id, &kind);
                Ok(())
            })
            .on("no", move |ctx: &mut HostContext| {
                ctx.forget_demolition(sender);
                ctx.reply(sender, CANCELLED);
                Ok(())
            });
        ctx.router.register_exclusive_group(sender, group);
        tracing::info!(%sender, kind = %target.kind, ?id, "demolition awaiting confirmation");
        ctx.reply(
            sender,
            format!("Demolish the {}? Reply \"yes\" or \"no\" within {secs} seconds.", target.kind),
        );
    }
}
