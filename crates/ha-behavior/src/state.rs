//! `BehaviorState` — everything the chain remembers between ticks.

use ha_chat::ChannelKind;
use ha_core::{ParticipantId, Tick, TimeOfDay};
use ha_world::{locations, Tile, Warp, WorldOps};

use crate::votes::is_cancel_forced_start;
use crate::{FestivalVotes, TransitionPhase, VoteOutcome};

/// Failed end-of-day attempts allowed per day before the sleep link stops
/// trying and leaves the world's own 2 AM pass-out to end the day.
pub const MAX_SLEEP_ATTEMPTS: u8 = 3;

// ── Errand ────────────────────────────────────────────────────────────────────

/// A one-off story milestone the host has to be physically present for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Errand {
    /// Opening the community centre (event 611439).
    UnlockCommunityCenter,
    /// The community centre restoration ceremony (event 191393).
    EndCommunityCenter,
    /// Receiving the fishing rod at the beach (event 739330).
    GetFishingRod,
}

impl Errand {
    pub const ALL: [Errand; 3] =
        [Errand::UnlockCommunityCenter, Errand::EndCommunityCenter, Errand::GetFishingRod];

    /// The event whose having-been-seen completes the errand.
    pub fn event_id(self) -> u32 {
        match self {
            Errand::UnlockCommunityCenter => 611_439,
            Errand::EndCommunityCenter    => 191_393,
            Errand::GetFishingRod         => 739_330,
        }
    }

    /// Where the host has to stand for the event to trigger.
    pub fn destination(self) -> Warp {
        match self {
            Errand::UnlockCommunityCenter | Errand::EndCommunityCenter => {
                Warp::new(locations::TOWN, Tile::new(0, 54))
            }
            Errand::GetFishingRod => Warp::new("Beach", Tile::new(38, 0)),
        }
    }

    /// Should the host set off for this errand now?
    pub fn is_due(self, world: &dyn WorldOps) -> bool {
        if world.has_seen_event(self.event_id()) || world.festival_today().is_some() {
            return false;
        }
        let now = world.time_of_day();
        match self {
            Errand::UnlockCommunityCenter => {
                world.days_played() > 4
                    && (TimeOfDay(800)..=TimeOfDay(1300)).contains(&now)
                    && !world.is_raining_at(locations::TOWN)
            }
            Errand::EndCommunityCenter => {
                world.community_center_completed() && !world.is_raining_at(locations::TOWN)
            }
            Errand::GetFishingRod => world.has_quest(13) && now <= TimeOfDay(1710),
        }
    }
}

// ── BehaviorState ─────────────────────────────────────────────────────────────

/// Mutable record shared by every link of the chain.
///
/// All of it is day-scoped: [`new_day`][Self::new_day] returns it to the
/// default, so a day-start event delivered twice is harmless.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct BehaviorState {
    pub sleep:          TransitionPhase,
    pub festival_start: TransitionPhase,
    pub festival_end:   TransitionPhase,

    /// Ticks to wait before the next dialogue action.
    pub dialogue_wait: u32,

    /// An end-of-day operation was issued and has not been abandoned.
    pub sleep_executing: bool,
    pub sleep_attempts:  u8,

    /// The host was warped into today's festival.
    pub festival_attend_executing: bool,
    /// `end_festival` was issued.
    pub festival_end_executing:    bool,
    pub festival_event_started:    bool,
    /// A participant cancelled today's forced festival start.
    pub forced_start_cancelled:    bool,
    /// First tick on which today's festival was seen open with others online.
    pub festival_open_since:       Option<Tick>,

    /// The milestone errand the host is currently away on.
    pub errand: Option<Errand>,

    pub joja_attempted: bool,

    /// Present while festival chat voting is enabled.
    pub votes: Option<FestivalVotes>,
}

impl BehaviorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every day-scoped field.  Idempotent.
    pub fn new_day(&mut self) {
        *self = Self::default();
    }

    pub fn votes_enabled(&self) -> bool {
        self.votes.is_some()
    }

    /// Feed a chat line to the festival vote.
    ///
    /// The forced-start cancel phrases are honoured all day; "start" and
    /// "cancel" only count while voting is enabled.  Anything that returns
    /// [`VoteOutcome::Ignored`] should be routed normally.
    pub fn handle_festival_chat(
        &mut self,
        sender:  ParticipantId,
        channel: ChannelKind,
        text:    &str,
    ) -> VoteOutcome {
        if is_cancel_forced_start(channel, text) {
            if !self.forced_start_cancelled {
                tracing::info!(%sender, "forced festival start cancelled for today");
            }
            self.forced_start_cancelled = true;
            return VoteOutcome::ForcedStartCancelled;
        }
        match self.votes.as_mut() {
            Some(votes) => votes.handle(sender, channel, text),
            None        => VoteOutcome::Ignored,
        }
    }

    /// Forget a departed participant's vote.
    pub fn remove_participant(&mut self, who: ParticipantId) {
        if let Some(votes) = self.votes.as_mut() {
            votes.remove(who);
        }
    }
}
