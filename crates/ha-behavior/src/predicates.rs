//! Should-transition predicates for the transition links.
//!
//! Each combines "at least one other participant is online" with either a
//! fixed threshold or "every other participant is already ready".

use ha_readiness::checks;

use crate::{BehaviorState, LinkContext};

/// True while today's festival is open and attendable.
fn festival_window_open(ctx: &LinkContext<'_>) -> bool {
    ctx.world
        .festival_today()
        .is_some_and(|f| !f.night_market && f.is_open_at(ctx.world.time_of_day()))
}

/// Should the host be in bed?
///
/// Never during an open festival.  Otherwise yes once the auto-sleep time is
/// reached, or earlier when every other participant is already in bed.
pub fn should_sleep(ctx: &mut LinkContext<'_>) -> bool {
    let others = ctx.others();
    if others.is_empty() || ctx.world.in_festival() || festival_window_open(ctx) {
        return false;
    }
    ctx.world.time_of_day() >= ctx.config.effective_auto_sleep_time()
        || ctx.all_ready(checks::SLEEP, &others)
}

/// Should the host be heading to today's festival?
///
/// Yes while the festival is open (night market excluded) and either every
/// other participant is waiting at the entrance, or the festival has been
/// open for the forced-start delay and nobody cancelled that today.
///
/// Records the first tick the festival was seen open in
/// `state.festival_open_since`.
pub fn should_attend_festival(state: &mut BehaviorState, ctx: &mut LinkContext<'_>) -> bool {
    let others = ctx.others();
    if others.is_empty() || !festival_window_open(ctx) {
        return false;
    }
    let now = ctx.clock.current_tick;
    let open_since = *state.festival_open_since.get_or_insert(now);
    let forced = !state.forced_start_cancelled
        && now.since(open_since) >= ctx.clock.ticks_for_secs(ctx.config.festival_force_start_secs);
    forced || ctx.all_ready(checks::FESTIVAL_START, &others)
}

/// Should the host be leaving the festival it is at?
///
/// Yes once every other participant asked to leave, or the festival's
/// closing time is reached.
pub fn should_leave_festival(ctx: &mut LinkContext<'_>) -> bool {
    if !ctx.world.in_festival() {
        return false;
    }
    let others = ctx.others();
    if others.is_empty() {
        return false;
    }
    festival_closed(ctx) || ctx.all_ready(checks::FESTIVAL_END, &others)
}

/// True when today's festival has reached its closing time.
pub(crate) fn festival_closed(ctx: &LinkContext<'_>) -> bool {
    ctx.world
        .festival_today()
        .is_some_and(|f| ctx.world.time_of_day() >= f.end)
}
