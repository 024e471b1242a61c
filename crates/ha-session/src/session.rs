//! The `Session` struct and its event entry points.

use std::any::Any;

use ha_behavior::votes::FORCED_START_CANCELLED;
use ha_behavior::{BehaviorChain, ChainStep, VoteOutcome};
use ha_chat::{ChatMessage, DispatchOutcome, ResponseRouter};
use ha_core::{ParticipantId, Tick};
use ha_schedule::TimeoutScheduler;

use crate::{CommandSet, HostContext, SessionObserver};

/// How one inbound chat message was handled.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ChatOutcome {
    /// Consumed by the festival vote.
    Vote(VoteOutcome),
    /// Matched a pending response, whose action ran.
    Responded(String),
    /// An unmatched private message; `handled` is false when no listener
    /// knows the command.
    Command { name: String, handled: bool },
    /// Ordinary chat.
    Conversation,
}

/// The automated host's session.
///
/// Owns the [`HostContext`] (world adapter, readiness registry, response
/// router, timeout scheduler, behavior state) together with the behavior
/// chain and the command listeners.  Everything is single-threaded and
/// driven by the host's event callbacks; nothing blocks.
///
/// Create via [`SessionBuilder`][crate::SessionBuilder].
pub struct Session {
    pub ctx:      HostContext,
    pub chain:    BehaviorChain,
    pub commands: CommandSet,
    pub(crate) observer: Box<dyn SessionObserver>,
}

impl Session {
    // ── Event entry points ────────────────────────────────────────────────

    /// One game tick: keep the host alive, run the behavior chain, expire
    /// due timeouts, deliver queued chat, then advance the clock.
    pub fn on_tick(&mut self) -> ChainStep {
        let tick = self.ctx.clock.current_tick;
        self.observer.on_tick_start(tick);
        self.ctx.sync_timeouts();
        self.ctx.keep_host_alive();

        let step = self.ctx.run_chain(&self.chain);
        let now = self.ctx.clock.elapsed();
        let fired = TimeoutScheduler::advance(&mut self.ctx, now);
        self.ctx.flush_outbox();

        self.observer.on_tick_end(tick, step, fired);
        self.ctx.clock.advance();
        step
    }

    /// Run exactly `n` ticks.  Returns how many of them performed a world
    /// action.
    pub fn run_ticks(&mut self, n: u64) -> usize {
        (0..n).filter(|_| self.on_tick().acted()).count()
    }

    /// The world started a new day.  Safe to call more than once.
    pub fn on_day_start(&mut self) {
        self.ctx.state.new_day();
        self.ctx.readiness.reset_all();
        let day = self.ctx.world.days_played();
        tracing::info!(day, "day started");
        self.observer.on_day_start(day);
    }

    /// An inbound chat message.
    ///
    /// Festival votes get the first look, then pending responses, then the
    /// command listeners.
    pub fn on_chat(&mut self, msg: &ChatMessage) -> ChatOutcome {
        self.ctx.sync_timeouts();
        self.ctx.inactivity.touch(msg.sender, self.ctx.clock.elapsed());
        let already_cancelled = self.ctx.state.forced_start_cancelled;
        let vote = self.ctx.state.handle_festival_chat(msg.sender, msg.channel, &msg.text);

        let outcome = match vote {
            VoteOutcome::Ignored => match ResponseRouter::dispatch(&mut self.ctx, msg) {
                DispatchOutcome::Responded(text) => ChatOutcome::Responded(text),
                DispatchOutcome::Command(cmd) => {
                    let handled = self.commands.dispatch(&mut self.ctx, msg.sender, &cmd);
                    if !handled {
                        tracing::debug!(sender = %msg.sender, command = %cmd.name, "unknown command");
                    }
                    ChatOutcome::Command { name: cmd.name, handled }
                }
                DispatchOutcome::Conversation => ChatOutcome::Conversation,
            },
            VoteOutcome::ForcedStartCancelled => {
                if !already_cancelled {
                    self.ctx.announce(FORCED_START_CANCELLED);
                }
                ChatOutcome::Vote(vote)
            }
            other => ChatOutcome::Vote(other),
        };

        self.ctx.flush_outbox();
        self.observer.on_chat(msg, &outcome);
        outcome
    }

    /// A participant's readiness for `check` changed upstream.
    pub fn on_ready_changed(&mut self, who: ParticipantId, check: &str, ready: bool) {
        self.ctx.readiness.observe(check, who, ready, &*self.ctx.world);
    }

    pub fn on_connect(&mut self, who: ParticipantId) {
        self.ctx.inactivity.touch(who, self.ctx.clock.elapsed());
        tracing::info!(%who, name = %self.ctx.name_of(who), "participant connected");
    }

    /// Forget everything that was waiting on `who`.
    pub fn on_disconnect(&mut self, who: ParticipantId) {
        let checks = self.ctx.readiness.remove_participant(who);
        let responses = self.ctx.router.clear_pending(who);
        self.ctx.forget_demolition(who);
        self.ctx.inactivity.forget(who);
        self.ctx.state.remove_participant(who);
        tracing::info!(%who, checks, responses, "participant disconnected");
    }

    /// Tear down everything the session owns.  Queued chat is delivered
    /// first; pending responses and timers are dropped without running.
    pub fn shutdown(&mut self) {
        self.ctx.flush_outbox();
        self.ctx.router.clear_all();
        self.ctx.timeouts.clear();
        self.ctx.demolitions.clear();
        self.ctx.inactivity.clear();
        self.ctx.readiness.clear();
        self.ctx.state.new_day();
        tracing::info!(tick = %self.ctx.clock.current_tick, "session shut down");
        self.observer.on_shutdown(self.ctx.clock.current_tick);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn current_tick(&self) -> Tick {
        self.ctx.clock.current_tick
    }

    /// The world adapter as its concrete type, if it is a `W`.
    pub fn world_as<W: Any>(&self) -> Option<&W> {
        self.ctx.world.as_any().downcast_ref::<W>()
    }

    pub fn world_as_mut<W: Any>(&mut self) -> Option<&mut W> {
        self.ctx.world.as_any_mut().downcast_mut::<W>()
    }
}
