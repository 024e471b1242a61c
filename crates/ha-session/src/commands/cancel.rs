use ha_chat::Command;
use ha_core::ParticipantId;

use crate::{CommandListener, HostContext};

pub const CANCELLED_PENDING: &str = "Cancelled your pending requests.";
pub const NOTHING_PENDING: &str = "You have no pending requests.";

/// `cancel`: drops every pending response of the sender and settles any
/// outstanding demolition request, so nothing the sender asked for can
/// still take effect.
pub struct CancelListener;

impl CommandListener for CancelListener {
    fn names(&self) -> &'static [&'static str] {
        &["cancel"]
    }

    fn handle(&self, ctx: &mut HostContext, sender: ParticipantId, _cmd: &Command) {
        let removed = ctx.router.clear_pending(sender);
        ctx.forget_demolition(sender);
        tracing::info!(%sender, removed, "pending requests cancelled");
        ctx.reply(sender, if removed > 0 { CANCELLED_PENDING } else { NOTHING_PENDING });
    }
}
