use crate::{BehaviorLink, BehaviorState, Errand, LinkContext, LinkOutcome};

/// Buys the Joja membership once the community centre has been unlocked,
/// when the config asks for it.  One attempt per day.
pub struct JojaMembershipLink;

impl BehaviorLink for JojaMembershipLink {
    fn name(&self) -> &'static str {
        "joja_membership"
    }

    fn process(&self, state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        let due = ctx.config.purchase_joja_membership
            && !state.joja_attempted
            && ctx.world.has_seen_event(Errand::UnlockCommunityCenter.event_id())
            && !ctx.world.joja_membership_purchased();
        if !due {
            return LinkOutcome::Forward;
        }
        state.joja_attempted = true;
        match ctx.world.purchase_joja_membership() {
            Ok(()) => {
                tracing::info!("joja membership purchased");
                LinkOutcome::Acted
            }
            Err(error) => {
                tracing::warn!(%error, "joja membership purchase failed");
                LinkOutcome::Forward
            }
        }
    }
}
