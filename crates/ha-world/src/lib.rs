//! `ha-world` — the narrow interface between the automation engine and the
//! simulation it drives.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`types`]    | `Tile`, `Facing`, `Position`, `Warp`, `Menu`, `FestivalInfo`, `Structure` |
//! | [`ops`]      | `WorldOps` adapter trait                                  |
//! | [`adapter`]  | `AdapterRegistry` — picks a `WorldOps` per host API version |
//! | [`scripted`] | `ScriptedWorld` — in-memory world used by tests and demos |
//! | [`error`]    | `WorldError`, `WorldResult<T>`                            |
//!
//! # Adapter model
//!
//! The engine never talks to the host API directly.  Every query and every
//! world mutation goes through [`WorldOps`], and exactly one implementation
//! is chosen at session start from the configured [`HostApiVersion`].  Code
//! above this crate never branches on the host version; an operation a given
//! host generation cannot perform reports [`WorldError::Unsupported`] and the
//! caller applies its documented fallback.
//!
//! [`HostApiVersion`]: ha_core::HostApiVersion

pub mod adapter;
pub mod error;
pub mod ops;
pub mod scripted;
pub mod types;

#[cfg(test)]
mod tests;

pub use adapter::{AdapterFactory, AdapterRegistry};
pub use error::{WorldError, WorldResult};
pub use ops::WorldOps;
pub use scripted::{ScriptedWorld, WorldCall};
pub use types::{
    FestivalInfo, Facing, Menu, Position, Question, Structure, StructureId, StructureKind, Tile,
    Vitals, Warp,
};

/// Location names the engine refers to by name.
pub mod locations {
    pub const FARM:       &str = "Farm";
    pub const FARM_HOUSE: &str = "FarmHouse";
    pub const TOWN:       &str = "Town";
}
