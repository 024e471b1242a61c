//! Chat message types.

use serde::{Deserialize, Serialize};

use ha_core::ParticipantId;

/// Which channel a message arrived on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Everyone in the session sees it.
    Public,
    /// Addressed to the host only.  Commands and confirmations arrive here.
    Private,
    /// Visible to the sender's party.
    Party,
}

/// One inbound chat line.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ChatMessage {
    pub sender:  ParticipantId,
    pub channel: ChannelKind,
    pub text:    String,
}

impl ChatMessage {
    pub fn new(sender: ParticipantId, channel: ChannelKind, text: impl Into<String>) -> Self {
        Self { sender, channel, text: text.into() }
    }

    pub fn private(sender: ParticipantId, text: impl Into<String>) -> Self {
        Self::new(sender, ChannelKind::Private, text)
    }

    pub fn public(sender: ParticipantId, text: impl Into<String>) -> Self {
        Self::new(sender, ChannelKind::Public, text)
    }

    /// Trimmed, lower-cased text; the form every comparison uses.
    pub fn normalized(&self) -> String {
        normalize(&self.text)
    }
}

/// One outbound chat line, waiting to be flushed to the world.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Outbound {
    /// `None` broadcasts to everyone.
    pub to:   Option<ParticipantId>,
    pub text: String,
}

pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
