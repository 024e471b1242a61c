//! `ha-behavior` — what the automated host does each tick.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`transition`] | `TransitionPhase`, `PhaseStep` — the shared micro state machine |
//! | [`state`]      | `BehaviorState`, `Errand`                                 |
//! | [`votes`]      | `FestivalVotes`, `VoteOutcome`                            |
//! | [`context`]    | `LinkContext<'a>` — world, readiness and config for one tick |
//! | [`link`]       | `BehaviorLink` trait, `LinkOutcome`, `BehaviorChain`, `ChainStep` |
//! | [`predicates`] | `should_sleep`, `should_attend_festival`, `should_leave_festival` |
//! | [`links`]      | the concrete links, in chain order                        |
//!
//! # Chain semantics
//!
//! `BehaviorChain::process` is called once per tick.  Links are walked in a
//! fixed order and the walk stops at the first link that does not forward:
//!
//! ```text
//! errands → joja → dialogue → sleep → festival attendance
//!         → festival event start → festival end
//! ```
//!
//! A link that stops the walk has either issued exactly one world-affecting
//! operation (`Acted`) or consumed one tick of a wait counter (`Waited`), so
//! at most one world-affecting operation happens per tick.
//!
//! Links hold no state of their own.  Everything that must survive between
//! ticks lives in [`BehaviorState`], which the session owns.

pub mod context;
pub mod link;
pub mod links;
pub mod predicates;
pub mod state;
pub mod transition;
pub mod votes;

#[cfg(test)]
mod tests;

pub use context::LinkContext;
pub use link::{BehaviorChain, BehaviorLink, ChainStep, LinkOutcome};
pub use state::{BehaviorState, Errand};
pub use transition::{PhaseStep, TransitionPhase};
pub use votes::{FestivalVotes, VoteOutcome};
