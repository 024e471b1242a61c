//! Per-tick view of everything a link may consult or drive.

use ha_chat::Outbound;
use ha_core::{AutomationConfig, ParticipantId, SessionClock};
use ha_readiness::ReadinessRegistry;
use ha_world::WorldOps;

/// What a [`BehaviorLink`][crate::BehaviorLink] works with for one tick.
///
/// Built by the session right before `BehaviorChain::process` and dropped
/// right after, so the borrows never outlive a tick.  Chat a link wants to
/// send is queued in [`outbox`][Self::outbox]; the session hands it to the
/// response router, which delivers it with everything else at the end of
/// the tick.
pub struct LinkContext<'a> {
    pub world:     &'a mut dyn WorldOps,
    pub readiness: &'a mut ReadinessRegistry,
    pub config:    &'a AutomationConfig,
    pub clock:     SessionClock,
    pub host:      ParticipantId,
    pub outbox:    Vec<Outbound>,
}

impl<'a> LinkContext<'a> {
    pub fn new(
        world:     &'a mut dyn WorldOps,
        readiness: &'a mut ReadinessRegistry,
        config:    &'a AutomationConfig,
        clock:     SessionClock,
    ) -> Self {
        let host = world.host();
        Self { world, readiness, config, clock, host, outbox: Vec::new() }
    }

    /// Queue a broadcast.
    pub fn announce(&mut self, text: impl Into<String>) {
        self.outbox.push(Outbound { to: None, text: text.into() });
    }

    /// Connected participants other than the host.
    pub fn others(&self) -> Vec<ParticipantId> {
        let host = self.host;
        self.world
            .online_participants()
            .into_iter()
            .filter(|p| *p != host)
            .collect()
    }

    /// Everyone connected, host included.
    pub fn everyone(&self) -> Vec<ParticipantId> {
        self.world.online_participants()
    }

    /// True when every participant in `among` is ready for `check`.
    /// Vacuously true for an empty slice.
    pub fn all_ready(&mut self, check: &str, among: &[ParticipantId]) -> bool {
        self.readiness.count_ready_among(check, among, &*self.world) == among.len()
    }

    /// Record the host's own readiness in the local cache.  The world side
    /// is published by opening or closing the ready-check dialog.
    pub fn mark_host_ready(&mut self, check: &str, ready: bool) {
        self.readiness.observe(check, self.host, ready, &*self.world);
    }

    /// Wait ticks between two transition attempts.
    pub fn transition_wait_ticks(&self) -> u32 {
        self.clock.wait_ticks(self.config.transition_wait_secs)
    }

    /// Wait ticks between two dialogue actions.
    pub fn dialogue_wait_ticks(&self) -> u32 {
        self.clock.wait_ticks(self.config.dialogue_wait_secs)
    }
}
