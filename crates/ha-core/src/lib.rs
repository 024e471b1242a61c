//! `ha-core` — foundational types for the `host_automaton` framework.
//!
//! This crate is a dependency of every other `ha-*` crate.  It intentionally
//! has no `ha-*` dependencies and minimal external ones (`thiserror`, `serde`
//! and `toml`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `ParticipantId`, `TimeoutId`                               |
//! | [`time`]     | `Tick`, `TimeOfDay`, `SessionClock`                        |
//! | [`config`]   | `AutomationConfig` and its option enums                    |
//! | [`error`]    | `HaError`, `HaResult`                                      |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AutomationConfig, BuildPermission, CaveChoice, HostApiVersion};
pub use error::{HaError, HaResult};
pub use ids::{ParticipantId, TimeoutId};
pub use time::{SessionClock, Tick, TimeOfDay};
