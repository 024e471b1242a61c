//! `ScriptedWorld` — an in-memory world behind the `WorldOps` seam.
//!
//! Used by the test suites of every crate above this one and by the
//! `scripted-day` demo.  All state is public so a test can arrange a scene
//! directly, and every mutation that takes effect is appended to
//! [`ScriptedWorld::calls`] so tests can assert on exactly what the engine
//! did.
//!
//! # Host-version behaviour
//!
//! | Version   | End of day                                                 |
//! |-----------|------------------------------------------------------------|
//! | `Legacy`  | `advance_day` runs the end-of-day sequence directly.       |
//! | `Current` | `advance_day` is unsupported; callers fall back to `force_end_of_day`. |
//!
//! Further operations can be made unsupported or failing through
//! [`unsupported`][ScriptedWorld::unsupported] and
//! [`rejections`][ScriptedWorld::rejections].

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use ha_core::{BuildPermission, HostApiVersion, ParticipantId, TimeOfDay};
use ha_readiness::ReadySource;

use crate::{
    locations, Facing, FestivalInfo, Menu, Position, Structure, StructureId, StructureKind, Tile,
    Vitals, Warp, WorldError, WorldOps, WorldResult,
};

// ── WorldCall ─────────────────────────────────────────────────────────────────

/// One world mutation that took effect.  Chat is logged separately in
/// [`ScriptedWorld::chat_log`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum WorldCall {
    Warp { who: ParticipantId, to: Warp },
    OpenReadyCheck(String),
    CloseReadyCheck(String),
    AdvanceDialogue,
    ChooseResponse(usize),
    SubmitName(String),
    DismissLevelUp,
    AdvanceDay,
    ForceEndOfDay,
    StartFestivalEvent,
    EndFestival,
    PurchaseJojaMembership,
    PlaceStructure { kind: StructureKind, tile: Tile, requester: ParticipantId },
    RemoveStructure { id: StructureId, requester: ParticipantId },
    SetPaused(bool),
    SetMoveBuildPermission(BuildPermission),
    RestoreHostVitals,
}

/// A connected participant as the scripted world tracks them.
#[derive(Clone, Debug)]
pub struct ScriptedParticipant {
    pub name:     String,
    pub position: Position,
}

// ── ScriptedWorld ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ScriptedWorld {
    pub version:      HostApiVersion,
    pub time:         TimeOfDay,
    pub days_played:  u32,
    pub host:         ParticipantId,
    pub participants: BTreeMap<ParticipantId, ScriptedParticipant>,
    /// Menu stack; the front is the one shown.  Answering a menu pops it.
    pub menus:        VecDeque<Menu>,
    pub festival:     Option<FestivalInfo>,
    /// Set when the host is warped to today's festival venue.
    pub in_festival:  bool,
    pub raining:      BTreeSet<String>,
    pub seen_events:  BTreeSet<u32>,
    pub quests:       BTreeSet<u32>,
    pub community_center_completed: bool,
    pub joja_membership_purchased:  bool,
    pub paused:       bool,
    pub move_build_permission: BuildPermission,
    pub structures:   Vec<Structure>,
    next_structure:   u32,
    pub bed:          Warp,
    pub host_vitals:  Vitals,

    /// The authoritative ready-check state.
    pub upstream_ready: HashMap<String, BTreeSet<ParticipantId>>,
    /// When set, every ready-check lookup fails.
    pub ready_lookup_fails: bool,

    /// Operation names that report `Unsupported`.
    pub unsupported: BTreeSet<&'static str>,
    /// Operation names that fail with `Rejected(reason)`.
    pub rejections:  HashMap<&'static str, String>,

    /// Set once an end-of-day operation succeeded; cleared by
    /// [`begin_day`][Self::begin_day].
    pub day_ended: bool,

    pub calls:    Vec<WorldCall>,
    pub chat_log: Vec<(Option<ParticipantId>, String)>,
}

impl ScriptedWorld {
    /// A fresh farm at 06:00 on day 1 with only the host connected, standing
    /// at the bed.
    pub fn new(version: HostApiVersion, host: ParticipantId) -> Self {
        let bed = Warp::new(locations::FARM_HOUSE, Tile::new(3, 11));
        let mut participants = BTreeMap::new();
        participants.insert(host, ScriptedParticipant {
            name:     "Host".to_string(),
            position: Position { location: bed.location.clone(), tile: bed.tile, facing: Facing::Down },
        });
        let unsupported = match version {
            HostApiVersion::Legacy  => BTreeSet::new(),
            HostApiVersion::Current => BTreeSet::from(["advance_day"]),
        };
        Self {
            version,
            time:         TimeOfDay::DAY_START,
            days_played:  1,
            host,
            participants,
            menus:        VecDeque::new(),
            festival:     None,
            in_festival:  false,
            raining:      BTreeSet::new(),
            seen_events:  BTreeSet::new(),
            quests:       BTreeSet::new(),
            community_center_completed: false,
            joja_membership_purchased:  false,
            paused:       false,
            move_build_permission: BuildPermission::Off,
            structures:   Vec::new(),
            next_structure: 0,
            bed,
            host_vitals:  Vitals::full(100, 270.0),
            upstream_ready: HashMap::new(),
            ready_lookup_fails: false,
            unsupported,
            rejections:   HashMap::new(),
            day_ended:    false,
            calls:        Vec::new(),
            chat_log:     Vec::new(),
        }
    }

    // ── Scene setup ───────────────────────────────────────────────────────

    /// Connect a participant standing on the farm at `tile`, facing down.
    pub fn connect(&mut self, who: ParticipantId, name: &str, tile: Tile) {
        self.connect_at(who, name, Position {
            location: locations::FARM.to_string(),
            tile,
            facing: Facing::Down,
        });
    }

    pub fn connect_at(&mut self, who: ParticipantId, name: &str, position: Position) {
        self.participants.insert(who, ScriptedParticipant { name: name.to_string(), position });
    }

    /// Drop a participant and their upstream readiness.
    pub fn disconnect(&mut self, who: ParticipantId) {
        self.participants.remove(&who);
        for set in self.upstream_ready.values_mut() {
            set.remove(&who);
        }
    }

    pub fn move_to(&mut self, who: ParticipantId, position: Position) {
        if let Some(p) = self.participants.get_mut(&who) {
            p.position = position;
        }
    }

    /// A participant signalling readiness through the multiplayer layer.
    pub fn mark_upstream_ready(&mut self, check: &str, who: ParticipantId) {
        self.upstream_ready.entry(check.to_string()).or_default().insert(who);
    }

    /// Seed a structure without recording a call.
    pub fn add_structure(&mut self, kind: StructureKind, origin: Tile) -> StructureId {
        let id = StructureId(self.next_structure);
        self.next_structure += 1;
        self.structures.push(Structure { id, kind, origin });
        id
    }

    /// Roll the world over to 06:00 of the next day, the way the host does
    /// after the end-of-day sequence.
    pub fn begin_day(&mut self) {
        self.time = TimeOfDay::DAY_START;
        self.days_played += 1;
        self.day_ended = false;
        self.in_festival = false;
        self.menus.clear();
        self.upstream_ready.clear();
        if let Some(host) = self.participants.get_mut(&self.host) {
            host.position = Position {
                location: self.bed.location.clone(),
                tile:     self.bed.tile,
                facing:   Facing::Down,
            };
        }
    }

    /// Drain the mutation log.
    pub fn take_calls(&mut self) -> Vec<WorldCall> {
        std::mem::take(&mut self.calls)
    }

    /// Chat sent to `who` privately, oldest first.
    pub fn private_chat(&self, who: ParticipantId) -> Vec<&str> {
        self.chat_log
            .iter()
            .filter(|(to, _)| *to == Some(who))
            .map(|(_, text)| text.as_str())
            .collect()
    }

    /// Broadcast chat, oldest first.
    pub fn broadcasts(&self) -> Vec<&str> {
        self.chat_log
            .iter()
            .filter(|(to, _)| to.is_none())
            .map(|(_, text)| text.as_str())
            .collect()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Apply the injected failure knobs for `op`.
    fn gate(&self, op: &'static str) -> WorldResult<()> {
        if self.unsupported.contains(op) {
            return Err(WorldError::Unsupported(op));
        }
        if let Some(reason) = self.rejections.get(op) {
            return Err(WorldError::Rejected(reason.clone()));
        }
        Ok(())
    }

    fn host_ready(&mut self, check: &str, ready: bool) {
        let set = self.upstream_ready.entry(check.to_string()).or_default();
        if ready {
            set.insert(self.host);
        } else {
            set.remove(&self.host);
        }
    }
}

impl ReadySource for ScriptedWorld {
    fn ready_participants(&self, check: &str) -> Option<Vec<ParticipantId>> {
        if self.ready_lookup_fails {
            return None;
        }
        Some(
            self.upstream_ready
                .get(check)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default(),
        )
    }
}

impl WorldOps for ScriptedWorld {
    fn api_version(&self) -> HostApiVersion {
        self.version
    }

    fn time_of_day(&self) -> TimeOfDay {
        self.time
    }

    fn days_played(&self) -> u32 {
        self.days_played
    }

    fn festival_today(&self) -> Option<FestivalInfo> {
        self.festival.clone()
    }

    fn in_festival(&self) -> bool {
        self.in_festival
    }

    fn is_raining_at(&self, location: &str) -> bool {
        self.raining.contains(location)
    }

    fn host(&self) -> ParticipantId {
        self.host
    }

    fn online_participants(&self) -> Vec<ParticipantId> {
        self.participants.keys().copied().collect()
    }

    fn participant_name(&self, who: ParticipantId) -> Option<String> {
        self.participants.get(&who).map(|p| p.name.clone())
    }

    fn position_of(&self, who: ParticipantId) -> Option<Position> {
        self.participants.get(&who).map(|p| p.position.clone())
    }

    fn bed_warp(&self) -> Warp {
        self.bed.clone()
    }

    fn host_vitals(&self) -> Option<Vitals> {
        Some(self.host_vitals)
    }

    fn active_menu(&self) -> Option<Menu> {
        self.menus.front().cloned()
    }

    fn has_seen_event(&self, event_id: u32) -> bool {
        self.seen_events.contains(&event_id)
    }

    fn has_quest(&self, quest_id: u32) -> bool {
        self.quests.contains(&quest_id)
    }

    fn community_center_completed(&self) -> bool {
        self.community_center_completed
    }

    fn joja_membership_purchased(&self) -> bool {
        self.joja_membership_purchased
    }

    fn structure_at(&self, tile: Tile) -> Option<Structure> {
        self.structures.iter().find(|s| s.occupies(tile)).cloned()
    }

    fn count_structures(&self, kind: &StructureKind) -> usize {
        self.structures.iter().filter(|s| &s.kind == kind).count()
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    fn warp(&mut self, who: ParticipantId, to: &Warp) -> WorldResult<()> {
        self.gate("warp")?;
        let p = self.participants.get_mut(&who).ok_or(WorldError::UnknownParticipant(who))?;
        p.position.location = to.location.clone();
        p.position.tile = to.tile;
        if who == self.host && self.festival.as_ref().is_some_and(|f| f.venue.location == to.location) {
            self.in_festival = true;
        }
        self.calls.push(WorldCall::Warp { who, to: to.clone() });
        Ok(())
    }

    fn open_ready_check(&mut self, check: &str) -> WorldResult<()> {
        self.gate("open_ready_check")?;
        self.menus.push_front(Menu::ReadyCheck(check.to_string()));
        self.host_ready(check, true);
        self.calls.push(WorldCall::OpenReadyCheck(check.to_string()));
        Ok(())
    }

    fn close_ready_check(&mut self, check: &str) -> WorldResult<()> {
        self.gate("close_ready_check")?;
        self.menus.retain(|m| !matches!(m, Menu::ReadyCheck(c) if c == check));
        self.host_ready(check, false);
        self.calls.push(WorldCall::CloseReadyCheck(check.to_string()));
        Ok(())
    }

    fn advance_dialogue(&mut self) -> WorldResult<()> {
        self.gate("advance_dialogue")?;
        match self.menus.front() {
            Some(Menu::Dialogue(None)) => {
                self.menus.pop_front();
                self.calls.push(WorldCall::AdvanceDialogue);
                Ok(())
            }
            _ => Err(WorldError::rejected("no plain dialogue is open")),
        }
    }

    fn choose_response(&mut self, index: usize) -> WorldResult<()> {
        self.gate("choose_response")?;
        match self.menus.front() {
            Some(Menu::Dialogue(Some(q))) if index < q.responses.len() => {
                self.menus.pop_front();
                self.calls.push(WorldCall::ChooseResponse(index));
                Ok(())
            }
            _ => Err(WorldError::rejected("no question with that response is open")),
        }
    }

    fn submit_name(&mut self, name: &str) -> WorldResult<()> {
        self.gate("submit_name")?;
        if self.menus.front() != Some(&Menu::Naming) {
            return Err(WorldError::rejected("no naming prompt is open"));
        }
        self.menus.pop_front();
        self.calls.push(WorldCall::SubmitName(name.to_string()));
        Ok(())
    }

    fn dismiss_level_up(&mut self) -> WorldResult<()> {
        self.gate("dismiss_level_up")?;
        if self.menus.front() != Some(&Menu::LevelUp) {
            return Err(WorldError::rejected("no level-up menu is open"));
        }
        self.menus.pop_front();
        self.calls.push(WorldCall::DismissLevelUp);
        Ok(())
    }

    fn advance_day(&mut self) -> WorldResult<()> {
        self.gate("advance_day")?;
        self.day_ended = true;
        self.calls.push(WorldCall::AdvanceDay);
        Ok(())
    }

    fn force_end_of_day(&mut self) -> WorldResult<()> {
        self.gate("force_end_of_day")?;
        self.time = TimeOfDay::DAY_END;
        self.day_ended = true;
        self.calls.push(WorldCall::ForceEndOfDay);
        Ok(())
    }

    fn start_festival_event(&mut self) -> WorldResult<()> {
        self.gate("start_festival_event")?;
        if !self.in_festival {
            return Err(WorldError::rejected("not at a festival"));
        }
        self.calls.push(WorldCall::StartFestivalEvent);
        Ok(())
    }

    fn end_festival(&mut self) -> WorldResult<()> {
        self.gate("end_festival")?;
        if !self.in_festival {
            return Err(WorldError::rejected("not at a festival"));
        }
        self.in_festival = false;
        self.calls.push(WorldCall::EndFestival);
        Ok(())
    }

    fn purchase_joja_membership(&mut self) -> WorldResult<()> {
        self.gate("purchase_joja_membership")?;
        if self.joja_membership_purchased {
            return Err(WorldError::rejected("membership already purchased"));
        }
        self.joja_membership_purchased = true;
        self.calls.push(WorldCall::PurchaseJojaMembership);
        Ok(())
    }

    fn place_structure(
        &mut self,
        kind:      &StructureKind,
        tile:      Tile,
        requester: ParticipantId,
    ) -> WorldResult<StructureId> {
        self.gate("place_structure")?;
        let (w, h) = kind.footprint();
        let blocked = (0..w)
            .flat_map(|dx| (0..h).map(move |dy| Tile::new(tile.x + dx, tile.y + dy)))
            .any(|t| self.structures.iter().any(|s| s.occupies(t)));
        if blocked {
            return Err(WorldError::rejected("that spot is blocked"));
        }
        let id = self.add_structure(kind.clone(), tile);
        self.calls.push(WorldCall::PlaceStructure { kind: kind.clone(), tile, requester });
        Ok(id)
    }

    fn remove_structure(&mut self, id: StructureId, requester: ParticipantId) -> WorldResult<()> {
        self.gate("remove_structure")?;
        let idx = self
            .structures
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| WorldError::rejected("that building no longer exists"))?;
        self.structures.remove(idx);
        self.calls.push(WorldCall::RemoveStructure { id, requester });
        Ok(())
    }

    fn set_paused(&mut self, paused: bool) -> WorldResult<()> {
        self.gate("set_paused")?;
        self.paused = paused;
        self.calls.push(WorldCall::SetPaused(paused));
        Ok(())
    }

    fn restore_host_vitals(&mut self) -> WorldResult<()> {
        self.gate("restore_host_vitals")?;
        self.host_vitals = Vitals::full(self.host_vitals.max_health, self.host_vitals.max_stamina);
        self.calls.push(WorldCall::RestoreHostVitals);
        Ok(())
    }

    fn set_move_build_permission(&mut self, permission: BuildPermission) -> WorldResult<()> {
        self.gate("set_move_build_permission")?;
        self.move_build_permission = permission;
        self.calls.push(WorldCall::SetMoveBuildPermission(permission));
        Ok(())
    }

    fn send_chat(&mut self, to: Option<ParticipantId>, text: &str) -> WorldResult<()> {
        self.gate("send_chat")?;
        if let Some(who) = to {
            if !self.participants.contains_key(&who) {
                return Err(WorldError::UnknownParticipant(who));
            }
        }
        self.chat_log.push((to, text.to_string()));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
