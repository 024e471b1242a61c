//! `ResponseRouter` — grouped, mutually exclusive pending responses.
//!
//! A command that needs an answer ("yes"/"no") registers a *group* of
//! responses for one participant.  Matching any member removes the whole
//! group, then runs that member's action.  Registering a group that shares a
//! response text with an existing group evicts every member of the existing
//! group first, so two groups never partially coexist.
//!
//! # Reentrancy
//!
//! Actions receive the whole host context `&mut C`, which owns this router.
//! The matched group is removed *before* the action runs, so an action may
//! register a fresh group (a re-prompt) without it being deleted afterwards.

use std::collections::BTreeSet;
use std::rc::Rc;

use ha_core::ParticipantId;

use crate::message::normalize;
use crate::{ChannelKind, ChatMessage, Command, Outbound};

#[cfg(not(feature = "fx-hash"))]
type IdMap<K, V> = std::collections::HashMap<K, V>;
#[cfg(feature = "fx-hash")]
type IdMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// What to do when a pending response is matched.  An `Err` is logged.
pub type ResponseAction<C> = Box<dyn FnOnce(&mut C) -> Result<(), String>>;

/// A context that owns a [`ResponseRouter`] over itself.
pub trait RouterHost: Sized {
    fn router(&mut self) -> &mut ResponseRouter<Self>;
}

// ── ResponseGroup ─────────────────────────────────────────────────────────────

/// A set of mutually exclusive responses under construction.
pub struct ResponseGroup<C> {
    members: Vec<(String, ResponseAction<C>)>,
}

impl<C> Default for ResponseGroup<C> {
    fn default() -> Self {
        Self { members: Vec::new() }
    }
}

impl<C> ResponseGroup<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `text` (compared trimmed and case-insensitively) to `action`.
    /// A repeated text replaces the earlier binding.
    pub fn on<F>(mut self, text: &str, action: F) -> Self
    where
        F: FnOnce(&mut C) -> Result<(), String> + 'static,
    {
        let key = normalize(text);
        self.members.retain(|(k, _)| *k != key);
        self.members.push((key, Box::new(action)));
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ── DispatchOutcome ───────────────────────────────────────────────────────────

/// How an inbound message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Matched a pending response; its group is gone and its action ran.
    Responded(String),
    /// An unmatched private message, to be handed to the command listeners.
    Command(Command),
    /// Ordinary chat; nothing to do.
    Conversation,
}

// ── ResponseRouter ────────────────────────────────────────────────────────────

struct PendingEntry<C> {
    /// Every text of the group this entry belongs to, itself included.
    siblings: Rc<[String]>,
    action:   ResponseAction<C>,
}

/// Pending-response table plus the outbound chat buffer.
pub struct ResponseRouter<C> {
    pending: IdMap<ParticipantId, IdMap<String, PendingEntry<C>>>,
    outbox:  Vec<Outbound>,
}

impl<C> Default for ResponseRouter<C> {
    fn default() -> Self {
        Self {
            pending: IdMap::default(),
            outbox:  Vec::new(),
        }
    }
}

impl<C> ResponseRouter<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `group` for `who`, first evicting every existing group that
    /// shares a response text with it.
    pub fn register_exclusive_group(&mut self, who: ParticipantId, group: ResponseGroup<C>) {
        if group.is_empty() {
            tracing::warn!(%who, "ignored empty response group");
            return;
        }
        let siblings: Rc<[String]> = group.members.iter().map(|(k, _)| k.clone()).collect();
        let table = self.pending.entry(who).or_default();

        // Collect every colliding group in full before touching the table.
        let evict: BTreeSet<String> = siblings
            .iter()
            .filter_map(|text| table.get(text))
            .flat_map(|entry| entry.siblings.iter().cloned())
            .collect();
        for text in &evict {
            table.remove(text);
        }
        if !evict.is_empty() {
            tracing::debug!(%who, evicted = evict.len(), "replaced overlapping response group");
        }

        for (text, action) in group.members {
            table.insert(text, PendingEntry { siblings: Rc::clone(&siblings), action });
        }
        tracing::debug!(%who, responses = ?&*siblings, "response group registered");
    }

    /// Drop every pending response for `who`.  Returns how many were removed.
    pub fn clear_pending(&mut self, who: ParticipantId) -> usize {
        let removed = self.pending.remove(&who).map_or(0, |t| t.len());
        if removed > 0 {
            tracing::debug!(%who, removed, "pending responses cleared");
        }
        removed
    }

    /// Remove the group containing `text` for `who` without running any of
    /// its actions.  Returns `false` if no such group is pending.
    pub fn withdraw_group(&mut self, who: ParticipantId, text: &str) -> bool {
        let withdrawn = self.take_response(who, &normalize(text)).is_some();
        if withdrawn {
            tracing::debug!(%who, response = %normalize(text), "response group withdrawn");
        }
        withdrawn
    }

    /// Drop every pending response for everyone.
    pub fn clear_all(&mut self) {
        self.pending.clear();
    }

    /// Texts `who` can currently answer with, sorted.
    pub fn pending_responses(&self, who: ParticipantId) -> Vec<String> {
        let mut texts: Vec<String> = self
            .pending
            .get(&who)
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        texts.sort();
        texts
    }

    pub fn has_pending(&self, who: ParticipantId, text: &str) -> bool {
        self.pending
            .get(&who)
            .is_some_and(|t| t.contains_key(&normalize(text)))
    }

    /// Participants with at least one pending response.
    pub fn participants_pending(&self) -> usize {
        self.pending.len()
    }

    // ── Outbound ──────────────────────────────────────────────────────────

    pub fn broadcast(&mut self, text: impl Into<String>) {
        self.outbox.push(Outbound { to: None, text: text.into() });
    }

    pub fn send_private(&mut self, to: ParticipantId, text: impl Into<String>) {
        self.outbox.push(Outbound { to: Some(to), text: text.into() });
    }

    /// Take every queued outbound message, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Remove the group containing `key` for `who` and return the matched
    /// action.
    fn take_response(&mut self, who: ParticipantId, key: &str) -> Option<ResponseAction<C>> {
        let table = self.pending.get_mut(&who)?;
        let entry = table.remove(key)?;
        for sibling in entry.siblings.iter() {
            table.remove(sibling);
        }
        if table.is_empty() {
            self.pending.remove(&who);
        }
        Some(entry.action)
    }
}

impl<C: RouterHost> ResponseRouter<C> {
    /// Route one inbound message.
    ///
    /// Pending responses only match on the private channel, so a public
    /// "yes" never confirms anything.
    pub fn dispatch(host: &mut C, msg: &ChatMessage) -> DispatchOutcome {
        if msg.channel != ChannelKind::Private {
            return DispatchOutcome::Conversation;
        }
        let key = msg.normalized();
        if let Some(action) = host.router().take_response(msg.sender, &key) {
            tracing::debug!(who = %msg.sender, response = %key, "pending response matched");
            if let Err(error) = action(host) {
                tracing::warn!(who = %msg.sender, response = %key, %error, "response action failed");
            }
            return DispatchOutcome::Responded(key);
        }
        match Command::parse(&msg.text) {
            Some(cmd) => DispatchOutcome::Command(cmd),
            None      => DispatchOutcome::Conversation,
        }
    }
}
