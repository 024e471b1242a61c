//! World value types exchanged across the [`WorldOps`](crate::WorldOps) seam.
//!
//! Everything here is plain data: the engine reads it, decides, and hands
//! intents back through `WorldOps` mutations.  Nothing holds a reference into
//! the live world.

use std::fmt;

use serde::{Deserialize, Serialize};

use ha_core::TimeOfDay;

use crate::locations;

// ── Tiles and facing ──────────────────────────────────────────────────────────

/// A map tile coordinate inside one location.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring tile in direction `facing`.
    pub fn step(self, facing: Facing) -> Tile {
        let (dx, dy) = facing.delta();
        Tile::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction a participant is facing.  Screen coordinates: `y` grows down.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Right,
    #[default]
    Down,
    Left,
}

impl Facing {
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::Up    => (0, -1),
            Facing::Right => (1, 0),
            Facing::Down  => (0, 1),
            Facing::Left  => (-1, 0),
        }
    }
}

/// Where a participant currently stands.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Position {
    pub location: String,
    pub tile:     Tile,
    pub facing:   Facing,
}

impl Position {
    /// The tile directly in front of the participant.
    #[inline]
    pub fn tile_in_front(&self) -> Tile {
        self.tile.step(self.facing)
    }

    pub fn is_in(&self, location: &str) -> bool {
        self.location == location
    }
}

/// Destination of a warp.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Warp {
    pub location: String,
    pub tile:     Tile,
}

impl Warp {
    pub fn new(location: impl Into<String>, tile: Tile) -> Self {
        Self { location: location.into(), tile }
    }

    /// The farm tile the host returns to after a milestone errand.
    pub fn farm_return() -> Self {
        Warp::new(locations::FARM, Tile::new(64, 10))
    }
}

impl fmt::Display for Warp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.location, self.tile)
    }
}

// ── Menus ─────────────────────────────────────────────────────────────────────

/// A multiple-choice prompt inside a dialogue box.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Question {
    pub prompt:    String,
    pub responses: Vec<String>,
}

impl Question {
    pub fn new<S: Into<String>>(prompt: impl Into<String>, responses: impl IntoIterator<Item = S>) -> Self {
        Self {
            prompt:    prompt.into(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    /// Index of the response whose text equals `text`, ignoring case.
    pub fn position_of(&self, text: &str) -> Option<usize> {
        self.responses.iter().position(|r| r.eq_ignore_ascii_case(text))
    }
}

/// The interactive menu currently shown to the host, as far as the engine
/// cares about it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Menu {
    /// A dialogue box; `Some` when it asks a question.
    Dialogue(Option<Question>),
    /// A text-entry naming prompt (pet, child, animal).
    Naming,
    /// The end-of-day level-up summary.
    LevelUp,
    /// A ready-check dialog for the named check.
    ReadyCheck(String),
    /// Anything else; left alone.
    Other(String),
}

// ── Festivals ─────────────────────────────────────────────────────────────────

/// Today's festival, if any.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FestivalInfo {
    pub id:           String,
    /// Where attendees are warped to.
    pub venue:        Warp,
    pub start:        TimeOfDay,
    pub end:          TimeOfDay,
    /// False for festivals whose main event cannot be voted on in chat.
    pub chat_enabled: bool,
    /// The night market runs for several days and is never attended
    /// automatically.
    pub night_market: bool,
}

impl FestivalInfo {
    #[inline]
    pub fn is_open_at(&self, now: TimeOfDay) -> bool {
        self.start <= now && now <= self.end
    }
}

// ── Structures ────────────────────────────────────────────────────────────────

/// World-assigned identity of one placed structure.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct StructureId(pub u32);

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructureId({})", self.0)
    }
}

/// Kinds of farm structure the engine names explicitly.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum StructureKind {
    StoneCabin,
    PlankCabin,
    LogCabin,
    ShippingBin,
    Other(String),
}

impl StructureKind {
    /// Structures participants may request through the `build` command, in
    /// the order they are listed to the user.
    pub const BUILDABLE: [StructureKind; 3] =
        [StructureKind::StoneCabin, StructureKind::PlankCabin, StructureKind::LogCabin];

    /// The command token naming a buildable kind, if any.
    pub fn command_name(&self) -> Option<&'static str> {
        match self {
            StructureKind::StoneCabin => Some("stone_cabin"),
            StructureKind::PlankCabin => Some("plank_cabin"),
            StructureKind::LogCabin   => Some("log_cabin"),
            _                         => None,
        }
    }

    /// Parse a `build` command token.  Only buildable kinds are recognised.
    pub fn from_command_name(token: &str) -> Option<StructureKind> {
        Self::BUILDABLE
            .into_iter()
            .find(|k| k.command_name().is_some_and(|n| n.eq_ignore_ascii_case(token)))
    }

    /// Footprint in tiles `(width, height)`.
    pub fn footprint(&self) -> (i32, i32) {
        match self {
            StructureKind::StoneCabin | StructureKind::PlankCabin | StructureKind::LogCabin => (5, 3),
            StructureKind::ShippingBin => (2, 1),
            StructureKind::Other(_)    => (1, 1),
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureKind::StoneCabin  => f.write_str("Stone Cabin"),
            StructureKind::PlankCabin  => f.write_str("Plank Cabin"),
            StructureKind::LogCabin    => f.write_str("Log Cabin"),
            StructureKind::ShippingBin => f.write_str("Shipping Bin"),
            StructureKind::Other(name) => f.write_str(name),
        }
    }
}

/// One placed structure on the farm.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Structure {
    pub id:     StructureId,
    pub kind:   StructureKind,
    /// Top-left tile of the footprint.
    pub origin: Tile,
}

impl Structure {
    /// Does the footprint cover `tile`?
    pub fn occupies(&self, tile: Tile) -> bool {
        let (w, h) = self.kind.footprint();
        tile.x >= self.origin.x
            && tile.x < self.origin.x + w
            && tile.y >= self.origin.y
            && tile.y < self.origin.y + h
    }
}

// ── Host vitals ───────────────────────────────────────────────────────────────

/// The host's health and stamina with their current maxima.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Vitals {
    pub health:      i32,
    pub max_health:  i32,
    pub stamina:     f32,
    pub max_stamina: f32,
}

impl Vitals {
    pub fn full(max_health: i32, max_stamina: f32) -> Self {
        Self { health: max_health, max_health, stamina: max_stamina, max_stamina }
    }

    pub fn is_full(&self) -> bool {
        self.health >= self.max_health && self.stamina >= self.max_stamina
    }
}
