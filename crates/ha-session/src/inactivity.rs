//! Inactivity tracking and the soft auto-kick.
//!
//! Activity is chat, connecting, or moving between two sweeps.  The sweep
//! runs every [`SWEEP_INTERVAL_SECS`] of session time as a self-rearming
//! timeout.  A participant idle for the configured limit is told to leave
//! and rejoin and the kick is announced; nobody is actually disconnected.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use ha_core::ParticipantId;
use ha_world::Position;

use crate::HostContext;

pub const SWEEP_INTERVAL_SECS: i64 = 10;

/// How long before the limit the one-off warning goes out.
const WARNING_WINDOW: Duration = Duration::from_secs(60);

pub const SOFT_KICK_NOTICE: &str = "You were inactive too long. Please leave and rejoin later.";

/// Last activity, warning state and last seen position per participant.
/// Times are session time.
#[derive(Debug, Default)]
pub struct InactivityTracker {
    last_active: BTreeMap<ParticipantId, Duration>,
    warned:      BTreeSet<ParticipantId>,
    last_seen:   BTreeMap<ParticipantId, Position>,
}

impl InactivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `who` did something at `now`.  Clears any pending warning.
    pub fn touch(&mut self, who: ParticipantId, now: Duration) {
        self.last_active.insert(who, now);
        self.warned.remove(&who);
        tracing::trace!(%who, ?now, "activity");
    }

    /// Drop everything known about `who`.
    pub fn forget(&mut self, who: ParticipantId) {
        self.last_active.remove(&who);
        self.warned.remove(&who);
        self.last_seen.remove(&who);
    }

    pub fn clear(&mut self) {
        self.last_active.clear();
        self.warned.clear();
        self.last_seen.clear();
    }

    pub fn last_active(&self, who: ParticipantId) -> Option<Duration> {
        self.last_active.get(&who).copied()
    }

    pub fn is_warned(&self, who: ParticipantId) -> bool {
        self.warned.contains(&who)
    }

    /// Record where `who` stands.  Being seen for the first time or at a new
    /// spot counts as activity.
    fn saw_at(&mut self, who: ParticipantId, position: Position, now: Duration) {
        if self.last_seen.get(&who) != Some(&position) {
            self.last_seen.insert(who, position);
            self.touch(who, now);
        }
    }

    /// Idle time of `who` at `now`.  A participant with no record starts
    /// their clock now.
    fn idle_for(&mut self, who: ParticipantId, now: Duration) -> Duration {
        let since = *self.last_active.entry(who).or_insert(now);
        now.saturating_sub(since)
    }
}

/// The host (unless configured otherwise) and whitelisted participants are
/// never swept.  Whitelist entries match a name or a numeric id, ignoring
/// case.
pub fn is_exempt(ctx: &HostContext, who: ParticipantId) -> bool {
    if who == ctx.world.host() && ctx.config.auto_kick_exempt_host {
        return true;
    }
    let whitelist = &ctx.config.auto_kick_whitelist;
    if whitelist.is_empty() {
        return false;
    }
    let id = who.0.to_string();
    let name = ctx.world.participant_name(who);
    whitelist.iter().any(|entry| {
        entry.eq_ignore_ascii_case(&id)
            || name.as_deref().is_some_and(|n| entry.eq_ignore_ascii_case(n))
    })
}

/// Schedule the next sweep.  Each sweep re-arms itself, so one call keeps
/// the sweep running until the scheduler is cleared.
pub fn arm(ctx: &mut HostContext) {
    let armed = ctx.timeouts.schedule(SWEEP_INTERVAL_SECS, |ctx: &mut HostContext| {
        sweep(ctx);
        arm(ctx);
        Ok(())
    });
    if armed.is_none() {
        tracing::warn!("could not arm the inactivity sweep");
    }
}

/// Check every online participant once: note movement, warn anyone about
/// to hit the limit, and soft-kick anyone past it.
pub fn sweep(ctx: &mut HostContext) {
    let now = ctx.clock.elapsed();
    let minutes = ctx.config.effective_auto_kick_minutes();
    let limit = Duration::from_secs(u64::from(minutes) * 60);

    for who in ctx.world.online_participants() {
        if is_exempt(ctx, who) {
            continue;
        }
        if let Some(position) = ctx.world.position_of(who) {
            ctx.inactivity.saw_at(who, position, now);
        }
        let idle = ctx.inactivity.idle_for(who, now);

        if idle >= limit {
            soft_kick(ctx, who, idle, now);
        } else if limit - idle <= WARNING_WINDOW && !ctx.inactivity.is_warned(who) {
            ctx.inactivity.warned.insert(who);
            let left = (limit - idle).as_millis().div_ceil(60_000);
            tracing::warn!(%who, idle_secs = idle.as_secs(), "warned inactive participant");
            ctx.reply(who, format!("You will be removed due to inactivity in {left} minute(s)."));
        }
    }
}

fn soft_kick(ctx: &mut HostContext, who: ParticipantId, idle: Duration, now: Duration) {
    let name = ctx.name_of(who);
    let idle_minutes = idle.as_secs_f64() / 60.0;
    tracing::info!(%who, %name, idle_minutes, "soft-kicked inactive participant");
    ctx.reply(who, SOFT_KICK_NOTICE);
    ctx.announce(format!("[AutoKick] Player {name} inactive for {idle_minutes:.1} minutes."));
    // Start over so the notice is not repeated every sweep.
    ctx.inactivity.touch(who, now);
}
