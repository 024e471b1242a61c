//! `HostContext` — the state every chain tick, response action and timeout
//! callback works on.

use std::collections::BTreeMap;

use ha_behavior::{BehaviorChain, BehaviorState, ChainStep, LinkContext};
use ha_chat::{ResponseRouter, RouterHost};
use ha_core::{AutomationConfig, BuildPermission, ParticipantId, SessionClock, TimeoutId};
use ha_readiness::{checks, ReadinessRegistry};
use ha_schedule::{TimeoutHost, TimeoutScheduler};
use ha_world::WorldOps;

use crate::inactivity::InactivityTracker;

/// Everything the session owns.
///
/// Response actions and timeout callbacks receive `&mut HostContext`, so
/// they can reach the world, reply in chat or schedule follow-ups without
/// any shared ownership.
pub struct HostContext {
    pub world:     Box<dyn WorldOps>,
    pub config:    AutomationConfig,
    pub clock:     SessionClock,
    pub readiness: ReadinessRegistry,
    pub state:     BehaviorState,
    pub router:    ResponseRouter<HostContext>,
    pub timeouts:  TimeoutScheduler<HostContext>,

    /// Runtime move-build permission.  Seeded from the config and changed
    /// by the `mbp` command.
    pub move_build_permission: BuildPermission,

    /// Expiry timer of each participant's outstanding demolition request.
    /// Only the timer recorded here may expire the request.
    pub demolitions: BTreeMap<ParticipantId, TimeoutId>,

    pub inactivity: InactivityTracker,
}

impl HostContext {
    pub fn new(world: Box<dyn WorldOps>, config: AutomationConfig) -> Self {
        let mut readiness = ReadinessRegistry::new();
        for check in [checks::SLEEP, checks::FESTIVAL_START, checks::FESTIVAL_END] {
            readiness.watch(check);
        }
        Self {
            clock: SessionClock::new(config.tick_rate),
            move_build_permission: config.move_build_permission,
            world,
            config,
            readiness,
            state:       BehaviorState::new(),
            router:      ResponseRouter::new(),
            timeouts:    TimeoutScheduler::new(),
            demolitions: BTreeMap::new(),
            inactivity:  InactivityTracker::new(),
        }
    }

    /// Walk `chain` once against this context.
    pub fn run_chain(&mut self, chain: &BehaviorChain) -> ChainStep {
        let mut ctx = LinkContext::new(
            self.world.as_mut(),
            &mut self.readiness,
            &self.config,
            self.clock,
        );
        let step = chain.process(&mut self.state, &mut ctx);
        for out in ctx.outbox.drain(..) {
            match out.to {
                Some(to) => self.router.send_private(to, out.text),
                None     => self.router.broadcast(out.text),
            }
        }
        step
    }

    /// Display name of `who`, falling back to the numeric id.
    pub fn name_of(&self, who: ParticipantId) -> String {
        self.world
            .participant_name(who)
            .unwrap_or_else(|| who.to_string())
    }

    pub fn reply(&mut self, to: ParticipantId, text: impl Into<String>) {
        self.router.send_private(to, text);
    }

    pub fn announce(&mut self, text: impl Into<String>) {
        self.router.broadcast(text);
    }

    /// Settle `who`'s outstanding demolition request, if any.  Returns
    /// `true` if one was outstanding.
    ///
    /// The expiry timer stays armed; when it fires it no longer finds
    /// itself in [`demolitions`][Self::demolitions] and does nothing.
    pub fn forget_demolition(&mut self, who: ParticipantId) -> bool {
        self.demolitions.remove(&who).is_some()
    }

    /// Top the host's health and stamina back up when `host_keep_alive` is
    /// set and either has dropped.
    pub fn keep_host_alive(&mut self) {
        if !self.config.host_keep_alive {
            return;
        }
        if self.world.host_vitals().is_some_and(|v| !v.is_full()) {
            if let Err(error) = self.world.restore_host_vitals() {
                tracing::debug!(%error, "could not restore host vitals");
            }
        }
    }

    /// Bring the timeout scheduler's clock up to the session clock.
    pub fn sync_timeouts(&mut self) {
        self.timeouts.sync(self.clock.elapsed());
    }

    /// Send every queued outbound message through the world.  Returns how
    /// many were delivered.
    pub fn flush_outbox(&mut self) -> usize {
        let mut sent = 0;
        for out in self.router.drain_outbox() {
            match self.world.send_chat(out.to, &out.text) {
                Ok(()) => sent += 1,
                Err(error) => tracing::warn!(to = ?out.to, %error, "could not deliver chat message"),
            }
        }
        sent
    }
}

impl RouterHost for HostContext {
    fn router(&mut self) -> &mut ResponseRouter<Self> {
        &mut self.router
    }
}

impl TimeoutHost for HostContext {
    fn timeouts(&mut self) -> &mut TimeoutScheduler<Self> {
        &mut self.timeouts
    }
}
