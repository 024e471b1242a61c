//! The `WorldOps` trait — every world query and mutation the engine uses.

use std::any::Any;

use ha_core::{BuildPermission, HostApiVersion, ParticipantId, TimeOfDay};
use ha_readiness::ReadySource;

use crate::{
    FestivalInfo, Menu, Position, Structure, StructureId, StructureKind, Tile, Vitals, Warp, WorldResult,
};

/// Adapter over one generation of the host API.
///
/// Queries are infallible: an adapter that cannot answer returns the
/// conservative value (`None`, `false`, empty).  Mutations return
/// [`WorldResult`]; the engine never retries a failed mutation on its own.
///
/// The [`ReadySource`] supertrait exposes the authoritative ready-check
/// primitive so a `&dyn WorldOps` can be handed straight to the readiness
/// registry.
///
/// # Threading
///
/// The engine is single-threaded and tick-driven, so there is no `Send` or
/// `Sync` bound.  Implementations must not block.
pub trait WorldOps: ReadySource {
    /// Host API generation this adapter speaks.
    fn api_version(&self) -> HostApiVersion;

    // ── Clock and calendar ────────────────────────────────────────────────

    fn time_of_day(&self) -> TimeOfDay;

    /// Whole in-world days since the save was created.
    fn days_played(&self) -> u32;

    fn festival_today(&self) -> Option<FestivalInfo>;

    /// True while the host is inside a running festival.
    fn in_festival(&self) -> bool;

    fn is_raining_at(&self, location: &str) -> bool;

    // ── Participants ──────────────────────────────────────────────────────

    /// Identity of the automated host.
    fn host(&self) -> ParticipantId;

    /// Everyone currently connected, host included.
    fn online_participants(&self) -> Vec<ParticipantId>;

    fn participant_name(&self, who: ParticipantId) -> Option<String>;

    fn position_of(&self, who: ParticipantId) -> Option<Position>;

    /// Where the host goes to sleep.
    fn bed_warp(&self) -> Warp;

    /// The host's health and stamina, `None` while the host has no body in
    /// the world (title screen, loading).
    fn host_vitals(&self) -> Option<Vitals>;

    // ── Host progress ─────────────────────────────────────────────────────

    /// The menu currently open on the host, if any.
    fn active_menu(&self) -> Option<Menu>;

    fn has_seen_event(&self, event_id: u32) -> bool;

    fn has_quest(&self, quest_id: u32) -> bool;

    fn community_center_completed(&self) -> bool;

    fn joja_membership_purchased(&self) -> bool;

    // ── Farm structures ───────────────────────────────────────────────────

    /// The farm structure whose footprint covers `tile`.
    fn structure_at(&self, tile: Tile) -> Option<Structure>;

    fn count_structures(&self, kind: &StructureKind) -> usize;

    fn is_paused(&self) -> bool;

    // ── Mutations ─────────────────────────────────────────────────────────

    fn warp(&mut self, who: ParticipantId, to: &Warp) -> WorldResult<()>;

    /// Show the ready-check dialog for `check` on the host and publish the
    /// host as ready for it to the multiplayer layer.
    fn open_ready_check(&mut self, check: &str) -> WorldResult<()>;

    /// Close the dialog and withdraw the host's readiness.
    fn close_ready_check(&mut self, check: &str) -> WorldResult<()>;

    /// Click through a non-question dialogue page.
    fn advance_dialogue(&mut self) -> WorldResult<()>;

    /// Answer the open question with response `index`.
    fn choose_response(&mut self, index: usize) -> WorldResult<()>;

    /// Enter `name` into the open naming prompt and submit it.
    fn submit_name(&mut self, name: &str) -> WorldResult<()>;

    fn dismiss_level_up(&mut self) -> WorldResult<()>;

    /// Put the host to bed and run the end-of-day sequence.  Host
    /// generations without a direct hook report `Unsupported`.
    fn advance_day(&mut self) -> WorldResult<()>;

    /// Last-resort end of day: jump the clock to the 2 AM pass-out time.
    fn force_end_of_day(&mut self) -> WorldResult<()>;

    fn start_festival_event(&mut self) -> WorldResult<()>;

    fn end_festival(&mut self) -> WorldResult<()>;

    fn purchase_joja_membership(&mut self) -> WorldResult<()>;

    /// Place a new structure with its footprint's top-left at `tile`.
    fn place_structure(
        &mut self,
        kind:      &StructureKind,
        tile:      Tile,
        requester: ParticipantId,
    ) -> WorldResult<StructureId>;

    fn remove_structure(&mut self, id: StructureId, requester: ParticipantId) -> WorldResult<()>;

    fn set_paused(&mut self, paused: bool) -> WorldResult<()>;

    /// Refill the host's health and stamina to their maxima.
    fn restore_host_vitals(&mut self) -> WorldResult<()>;

    fn set_move_build_permission(&mut self, permission: BuildPermission) -> WorldResult<()>;

    /// Send chat.  `to: None` broadcasts; `Some(p)` is a private message.
    fn send_chat(&mut self, to: Option<ParticipantId>, text: &str) -> WorldResult<()>;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
