//! The three festival links: attend, start the main event, leave.

use ha_readiness::checks;

use crate::predicates::{festival_closed, should_attend_festival, should_leave_festival};
use crate::votes::ENTRY_MESSAGE;
use crate::{BehaviorLink, BehaviorState, FestivalVotes, LinkContext, LinkOutcome, PhaseStep, TransitionPhase};

/// Open the ready-check `check` and mark the host ready for it.
fn open_check(phase: &mut TransitionPhase, check: &str, ctx: &mut LinkContext<'_>) -> LinkOutcome {
    if let Err(error) = ctx.world.open_ready_check(check) {
        tracing::warn!(check, %error, "could not open ready-check");
        return LinkOutcome::Forward;
    }
    ctx.mark_host_ready(check, true);
    phase.enter(ctx.transition_wait_ticks());
    tracing::debug!(check, "ready-check opened");
    LinkOutcome::Acted
}

fn close_check(phase: &mut TransitionPhase, check: &str, ctx: &mut LinkContext<'_>) -> LinkOutcome {
    if let Err(error) = ctx.world.close_ready_check(check) {
        tracing::warn!(check, %error, "could not close ready-check");
    }
    ctx.mark_host_ready(check, false);
    phase.leave(ctx.transition_wait_ticks());
    tracing::debug!(check, "ready-check closed");
    LinkOutcome::Acted
}

// ── Attendance ────────────────────────────────────────────────────────────────

/// Follows the other participants into today's festival.
pub struct FestivalAttendanceLink;

impl FestivalAttendanceLink {
    fn settle(state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        if state.festival_attend_executing {
            return LinkOutcome::Forward;
        }
        let Some(festival) = ctx.world.festival_today() else {
            return LinkOutcome::Forward;
        };
        if let Err(error) = ctx.world.warp(ctx.host, &festival.venue) {
            tracing::warn!(festival = %festival.id, %error, "could not warp to festival");
            return LinkOutcome::Forward;
        }
        state.festival_attend_executing = true;
        tracing::info!(festival = %festival.id, "host arrived at festival");

        if festival.chat_enabled {
            state.votes = Some(FestivalVotes::open(ctx.clock.current_tick));
            ctx.announce(ENTRY_MESSAGE);
        }
        LinkOutcome::Acted
    }
}

impl BehaviorLink for FestivalAttendanceLink {
    fn name(&self) -> &'static str {
        "festival_attendance"
    }

    fn process(&self, state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        let should = should_attend_festival(state, ctx);
        match state.festival_start.poll(should) {
            PhaseStep::Wait    => LinkOutcome::Waited,
            PhaseStep::Enter   => open_check(&mut state.festival_start, checks::FESTIVAL_START, ctx),
            PhaseStep::Leave   => close_check(&mut state.festival_start, checks::FESTIVAL_START, ctx),
            PhaseStep::Settled if state.festival_start.in_progress() => Self::settle(state, ctx),
            PhaseStep::Settled => LinkOutcome::Forward,
        }
    }
}

// ── Main event ────────────────────────────────────────────────────────────────

/// Starts the festival's main event once every other attendee voted "start",
/// or once the forced-start delay has passed since voting opened.
pub struct FestivalEventStartLink;

impl BehaviorLink for FestivalEventStartLink {
    fn name(&self) -> &'static str {
        "festival_event_start"
    }

    fn process(&self, state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        if state.festival_event_started || !ctx.world.in_festival() {
            return LinkOutcome::Forward;
        }
        let Some(votes) = state.votes.as_ref() else {
            return LinkOutcome::Forward;
        };
        let others = ctx.others();
        let unanimous = !others.is_empty() && votes.count_among(&others) == others.len();
        let waited = ctx.clock.current_tick.since(votes.opened_at());
        let forced = !state.forced_start_cancelled
            && waited >= ctx.clock.ticks_for_secs(ctx.config.festival_force_start_secs);
        if !(unanimous || forced) {
            return LinkOutcome::Forward;
        }

        match ctx.world.start_festival_event() {
            Ok(()) => {
                state.festival_event_started = true;
                tracing::info!(unanimous, "festival main event started");
                LinkOutcome::Acted
            }
            Err(error) => {
                tracing::warn!(%error, "could not start festival event");
                LinkOutcome::Forward
            }
        }
    }
}

// ── Leaving ───────────────────────────────────────────────────────────────────

/// Ends the festival for everyone once they all want to leave or it closes.
pub struct FestivalEndLink;

impl FestivalEndLink {
    fn settle(state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        if state.festival_end_executing {
            return LinkOutcome::Forward;
        }
        let everyone = ctx.everyone();
        if !(festival_closed(ctx) || ctx.all_ready(checks::FESTIVAL_END, &everyone)) {
            return LinkOutcome::Forward;
        }
        state.festival_end_executing = true;
        match ctx.world.end_festival() {
            Ok(()) => {
                state.votes = None;
                tracing::info!("festival ended");
                LinkOutcome::Acted
            }
            Err(error) => {
                tracing::warn!(%error, "could not end festival");
                state.festival_end_executing = false;
                LinkOutcome::Forward
            }
        }
    }
}

impl BehaviorLink for FestivalEndLink {
    fn name(&self) -> &'static str {
        "festival_end"
    }

    fn process(&self, state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> LinkOutcome {
        let should = should_leave_festival(ctx);
        match state.festival_end.poll(should) {
            PhaseStep::Wait    => LinkOutcome::Waited,
            PhaseStep::Enter   => open_check(&mut state.festival_end, checks::FESTIVAL_END, ctx),
            PhaseStep::Leave   => close_check(&mut state.festival_end, checks::FESTIVAL_END, ctx),
            PhaseStep::Settled if state.festival_end.in_progress() => Self::settle(state, ctx),
            PhaseStep::Settled => LinkOutcome::Forward,
        }
    }
}
