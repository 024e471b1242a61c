use ha_world::Warp;

use crate::{BehaviorLink, BehaviorState, Errand, LinkContext, LinkOutcome};

/// Takes the host to the spot where `errand`'s event triggers, then back to
/// the farm once the event has been seen.
pub struct ErrandLink {
    errand: Errand,
}

impl ErrandLink {
    pub fn new(errand: Errand) -> Self {
        Self { errand }
    }
}

impl BehaviorLink for ErrandLink {
    fn name(&self) -> &'static str {
        match self.errand {
            Errand::UnlockCommunityCenter => "unlock_community_center",
            Errand::EndCommunityCenter    => "end_community_center",
            Errand::GetFishingRod         => "get_fishing_rod",
        }
    }

    fn process(&self, state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        match state.errand {
            Some(current) if current == self.errand => {
                if !ctx.world.has_seen_event(self.errand.event_id()) {
                    return LinkOutcome::Forward;
                }
                match ctx.world.warp(ctx.host, &Warp::farm_return()) {
                    Ok(()) => {
                        tracing::info!(errand = ?self.errand, "errand complete, back to the farm");
                        state.errand = None;
                        LinkOutcome::Acted
                    }
                    Err(error) => {
                        tracing::warn!(errand = ?self.errand, %error, "return warp failed");
                        LinkOutcome::Forward
                    }
                }
            }
            Some(_) => LinkOutcome::Forward,
            None if self.errand.is_due(&*ctx.world) => {
                let to = self.errand.destination();
                match ctx.world.warp(ctx.host, &to) {
                    Ok(()) => {
                        tracing::info!(errand = ?self.errand, %to, "setting off on errand");
                        state.errand = Some(self.errand);
                        LinkOutcome::Acted
                    }
                    Err(error) => {
                        tracing::warn!(errand = ?self.errand, %error, "errand warp failed");
                        LinkOutcome::Forward
                    }
                }
            }
            None => LinkOutcome::Forward,
        }
    }
}
