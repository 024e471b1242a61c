//! `TransitionPhase` — the micro state machine shared by every transition
//! link (sleep, festival attendance, festival end).
//!
//! ```text
//!                 should ∧ ¬in_progress            ¬should ∧ in_progress
//!   Idle ───────────────────────────▶ InProgress ───────────────────────▶ Idle
//!     ▲    (Enter; may seed a wait)        │    (Leave; may seed a wait)
//!     │                                    │
//!     └────── Waiting { ticks_left } ◀─────┘   a pending transition first
//!                                              burns its wait ticks
//! ```
//!
//! `Waiting` remembers which settled phase it belongs to, so the in-progress
//! flag is never lost while a counter runs down.

/// Phase of one transition.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    /// A wait counter is running.  `in_progress` is the settled phase the
    /// transition returns to once the counter reaches zero.
    Waiting { ticks_left: u32, in_progress: bool },
    InProgress,
}

/// What the owning link should do this tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PhaseStep {
    /// Start the transition.
    Enter,
    /// Abandon the transition.
    Leave,
    /// A wait tick was consumed; do nothing else.
    Wait,
    /// Nothing to start or abandon.  Any stale wait has been cleared.
    Settled,
}

impl TransitionPhase {
    #[inline]
    pub fn in_progress(self) -> bool {
        matches!(self, TransitionPhase::InProgress | TransitionPhase::Waiting { in_progress: true, .. })
    }

    /// Remaining wait ticks, zero when no counter runs.
    #[inline]
    pub fn ticks_left(self) -> u32 {
        match self {
            TransitionPhase::Waiting { ticks_left, .. } => ticks_left,
            _ => 0,
        }
    }

    /// Advance the machine given whether the transition should currently be
    /// in progress.
    pub fn poll(&mut self, should: bool) -> PhaseStep {
        let in_progress = self.in_progress();
        if should != in_progress {
            if let TransitionPhase::Waiting { ticks_left, .. } = self {
                if *ticks_left > 0 {
                    *ticks_left -= 1;
                    return PhaseStep::Wait;
                }
            }
            return if should { PhaseStep::Enter } else { PhaseStep::Leave };
        }
        *self = Self::settled(in_progress);
        PhaseStep::Settled
    }

    /// The transition started; hold off the next change for `wait` ticks.
    pub fn enter(&mut self, wait: u32) {
        *self = Self::waiting(wait, true);
    }

    /// The transition was abandoned; hold off the next change for `wait` ticks.
    pub fn leave(&mut self, wait: u32) {
        *self = Self::waiting(wait, false);
    }

    /// Hold off for `wait` ticks without changing the settled phase.
    pub fn wait(&mut self, wait: u32) {
        *self = Self::waiting(wait, self.in_progress());
    }

    fn waiting(ticks_left: u32, in_progress: bool) -> Self {
        if ticks_left == 0 {
            Self::settled(in_progress)
        } else {
            TransitionPhase::Waiting { ticks_left, in_progress }
        }
    }

    fn settled(in_progress: bool) -> Self {
        if in_progress { TransitionPhase::InProgress } else { TransitionPhase::Idle }
    }
}
