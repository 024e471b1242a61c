use ha_readiness::checks;
use ha_world::WorldError;

use crate::predicates::should_sleep;
use crate::state::MAX_SLEEP_ATTEMPTS;
use crate::{BehaviorLink, BehaviorState, LinkContext, LinkOutcome, PhaseStep};

/// Keeps the host's bedtime in step with everyone else's and ends the day
/// once every participant is in bed.
pub struct SleepLink;

impl SleepLink {
    fn enter(state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        let wait = ctx.transition_wait_ticks();
        let bed = ctx.world.bed_warp();
        let away = ctx
            .world
            .position_of(ctx.host)
            .is_some_and(|p| !p.is_in(&bed.location));

        if away && ctx.config.force_return_to_bed {
            return match ctx.world.warp(ctx.host, &bed) {
                Ok(()) => {
                    tracing::info!(to = %bed, "heading home to sleep");
                    state.sleep.wait(wait);
                    LinkOutcome::Acted
                }
                Err(error) => {
                    tracing::warn!(%error, "could not warp home to sleep");
                    LinkOutcome::Forward
                }
            };
        }

        if let Err(error) = ctx.world.open_ready_check(checks::SLEEP) {
            tracing::warn!(%error, "could not open sleep ready-check");
            return LinkOutcome::Forward;
        }
        ctx.mark_host_ready(checks::SLEEP, true);
        state.sleep.enter(wait);
        tracing::info!(time = %ctx.world.time_of_day(), "host went to bed");
        LinkOutcome::Acted
    }

    fn leave(state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        if let Err(error) = ctx.world.close_ready_check(checks::SLEEP) {
            tracing::warn!(%error, "could not close sleep ready-check");
        }
        ctx.mark_host_ready(checks::SLEEP, false);
        state.sleep.leave(ctx.transition_wait_ticks());
        state.sleep_executing = false;
        tracing::info!("host got out of bed");
        LinkOutcome::Acted
    }

    /// In bed and waiting: end the day once everybody is ready.
    fn settle(state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        if state.sleep_executing || state.sleep_attempts >= MAX_SLEEP_ATTEMPTS {
            return LinkOutcome::Forward;
        }
        let everyone = ctx.everyone();
        if !ctx.all_ready(checks::SLEEP, &everyone) {
            return LinkOutcome::Forward;
        }

        state.sleep_executing = true;
        state.sleep_attempts += 1;
        let result = match ctx.world.advance_day() {
            Err(WorldError::Unsupported(op)) => {
                tracing::debug!(op, "falling back to forced end of day");
                ctx.world.force_end_of_day()
            }
            other => other,
        };
        match result {
            Ok(()) => {
                tracing::info!(ready = everyone.len(), "everyone in bed, ending the day");
                LinkOutcome::Acted
            }
            Err(error) => {
                tracing::warn!(attempt = state.sleep_attempts, %error, "could not end the day");
                state.sleep_executing = false;
                LinkOutcome::Forward
            }
        }
    }
}

impl BehaviorLink for SleepLink {
    fn name(&self) -> &'static str {
        "sleep"
    }

    fn process(&self, state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        let should = should_sleep(ctx);
        match state.sleep.poll(should) {
            PhaseStep::Wait    => LinkOutcome::Waited,
            PhaseStep::Enter   => Self::enter(state, ctx),
            PhaseStep::Leave   => Self::leave(state, ctx),
            PhaseStep::Settled if state.sleep.in_progress() => Self::settle(state, ctx),
            PhaseStep::Settled => LinkOutcome::Forward,
        }
    }
}
