//! Festival chat votes.

use std::collections::BTreeSet;

use ha_chat::ChannelKind;
use ha_core::{ParticipantId, Tick};

/// Broadcast when voting opens.
pub const ENTRY_MESSAGE: &str =
    "When you wish to start the festival, type \"start\" into chat. If you'd like to cancel your vote, type \"cancel\".";

/// Broadcast when someone cancels the forced start.
pub const FORCED_START_CANCELLED: &str = "Forced festival auto-start canceled for today.";

/// Private phrases that cancel the forced start for the rest of the day.
const CANCEL_FORCED_START: [&str; 3] = ["cancel festival", "cancel start", "stop festival"];

/// What a chat line did to the vote.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VoteOutcome {
    Voted,
    Withdrawn,
    ForcedStartCancelled,
    /// Not a vote; route the message normally.
    Ignored,
}

/// Collects "start" votes from attendees while the host is at a festival.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FestivalVotes {
    votes:     BTreeSet<ParticipantId>,
    opened_at: Tick,
}

impl FestivalVotes {
    pub fn open(at: Tick) -> Self {
        Self { votes: BTreeSet::new(), opened_at: at }
    }

    /// Tick at which voting opened; the forced-start delay counts from here.
    pub fn opened_at(&self) -> Tick {
        self.opened_at
    }

    /// Apply one chat line.  `text` is compared trimmed and lower-cased.
    pub fn handle(&mut self, sender: ParticipantId, channel: ChannelKind, text: &str) -> VoteOutcome {
        let text = text.trim().to_lowercase();
        if channel == ChannelKind::Private && CANCEL_FORCED_START.contains(&text.as_str()) {
            return VoteOutcome::ForcedStartCancelled;
        }
        match text.as_str() {
            "start" => {
                self.votes.insert(sender);
                VoteOutcome::Voted
            }
            "cancel" => {
                self.votes.remove(&sender);
                VoteOutcome::Withdrawn
            }
            _ => VoteOutcome::Ignored,
        }
    }

    /// How many of `among` have voted to start.
    pub fn count_among(&self, among: &[ParticipantId]) -> usize {
        among.iter().filter(|p| self.votes.contains(p)).count()
    }

    pub fn remove(&mut self, who: ParticipantId) {
        self.votes.remove(&who);
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

/// True when `text` is one of the private forced-start cancel phrases.
pub(crate) fn is_cancel_forced_start(channel: ChannelKind, text: &str) -> bool {
    channel == ChannelKind::Private && CANCEL_FORCED_START.contains(&text.trim().to_lowercase().as_str())
}
