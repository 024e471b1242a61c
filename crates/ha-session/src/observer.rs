//! Session observer trait for progress reporting and test instrumentation.

use ha_behavior::ChainStep;
use ha_chat::ChatMessage;
use ha_core::Tick;

use crate::ChatOutcome;

/// Callbacks invoked by [`Session`][crate::Session] at key points of its
/// event entry points.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — action logger
///
/// ```rust,ignore
/// struct ActionLog(Vec<(Tick, &'static str)>);
///
/// impl SessionObserver for ActionLog {
///     fn on_tick_end(&mut self, tick: Tick, step: ChainStep, _fired: usize) {
///         if let (true, Some(link)) = (step.acted(), step.link) {
///             self.0.push((tick, link));
///         }
///     }
/// }
/// ```
pub trait SessionObserver {
    /// Called at the very start of each tick, before the chain runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `step` is what the behavior chain did; `fired` is the number of
    /// timeouts that expired this tick.
    fn on_tick_end(&mut self, _tick: Tick, _step: ChainStep, _fired: usize) {}

    /// Called after the day-start reset.  `day` is the world's days-played
    /// counter.
    fn on_day_start(&mut self, _day: u32) {}

    /// Called after an inbound chat message was handled.
    fn on_chat(&mut self, _msg: &ChatMessage, _outcome: &ChatOutcome) {}

    /// Called once from [`Session::shutdown`][crate::Session::shutdown].
    fn on_shutdown(&mut self, _final_tick: Tick) {}
}

/// A [`SessionObserver`] that does nothing.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
