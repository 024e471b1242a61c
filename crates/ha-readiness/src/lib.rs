//! `ha-readiness` — who has signalled readiness for which check.
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`registry`] | `ReadinessRegistry`, `ReadySource` trait              |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                 |
//! |-----------|--------------------------------------------------------|
//! | `fx-hash` | Uses FxHash for the check-name index.                  |
//!
//! # Two-tier lookup
//!
//! The registry is a local cache in front of the authoritative multiplayer
//! layer.  Readiness signals from other participants are recorded as they
//! arrive; when a check has never been observed, queries first reconcile it
//! from the [`ReadySource`] and remember the answer.  The cache is wiped at
//! every day start.

pub mod registry;

#[cfg(test)]
mod tests;

pub use registry::{ReadinessRegistry, ReadySource};

/// Well-known check names.
pub mod checks {
    pub const SLEEP:          &str = "sleep";
    pub const FESTIVAL_START: &str = "festivalStart";
    pub const FESTIVAL_END:   &str = "festivalEnd";
}
