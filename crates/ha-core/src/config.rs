//! Automation configuration.
//!
//! Read once by the host process when a session starts and handed to the
//! session by value.  Nothing in the automation engine writes it back; the
//! one runtime-mutable setting (move-build permission) is copied into session
//! state at startup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{HaError, HaResult, ParticipantId, TimeOfDay};

/// Auto-sleep time used when the configured value is not a displayable time.
const FALLBACK_AUTO_SLEEP: TimeOfDay = TimeOfDay(2530);

// ── Option enums ─────────────────────────────────────────────────────────────

/// Answer given when the world asks which creatures should live in the cave.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaveChoice {
    #[default]
    #[serde(alias = "Mushrooms")]
    Mushrooms,
    #[serde(alias = "Bats")]
    Bats,
}

impl CaveChoice {
    /// The dialogue response text that selects this option.
    pub fn response_text(self) -> &'static str {
        match self {
            CaveChoice::Mushrooms => "mushrooms",
            CaveChoice::Bats      => "bats",
        }
    }
}

/// Which farmhands may move buildings through the carpenter.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildPermission {
    #[default]
    Off,
    Owned,
    On,
}

impl BuildPermission {
    pub const ALL: [BuildPermission; 3] = [BuildPermission::Off, BuildPermission::Owned, BuildPermission::On];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildPermission::Off   => "off",
            BuildPermission::Owned => "owned",
            BuildPermission::On    => "on",
        }
    }
}

impl fmt::Display for BuildPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildPermission {
    type Err = HaError;

    fn from_str(s: &str) -> HaResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off"   => Ok(BuildPermission::Off),
            "owned" => Ok(BuildPermission::Owned),
            "on"    => Ok(BuildPermission::On),
            other   => Err(HaError::Parse(format!("unknown build permission {other:?}"))),
        }
    }
}

/// Host API generation the world adapter must speak.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum HostApiVersion {
    #[serde(rename = "1.5")]
    Legacy,
    #[default]
    #[serde(rename = "1.6")]
    Current,
}

// ── AutomationConfig ─────────────────────────────────────────────────────────

/// Every tunable the automation engine reads.
///
/// All fields have defaults, so an empty TOML document is a valid config.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Host updates per real second.  Wait durations are converted with it.
    pub tick_rate: u32,

    /// Host API generation; selects the world adapter at startup.
    pub host_version: HostApiVersion,

    /// Time of day at which the host goes to bed if anyone else is online.
    /// Out-of-range values fall back to 2530.
    pub auto_sleep_time: TimeOfDay,

    /// Warp the host back to the farmhouse before starting the sleep check.
    pub force_return_to_bed: bool,

    /// Pause between two consecutive dialogue actions.
    pub dialogue_wait_secs: f32,

    /// Pause after opening or closing a sleep/festival ready-check.
    pub transition_wait_secs: f32,

    /// How long a chat confirmation (e.g. demolish yes/no) stays open.
    pub confirmation_timeout_secs: i64,

    /// Seconds after the host reaches a festival before its main event is
    /// started without a unanimous vote.  Participants can cancel it by
    /// private message.
    pub festival_force_start_secs: u64,

    /// Cave creature choice.
    pub cave_choice: CaveChoice,

    /// Accept the pet offered on the first days.
    pub accept_pet: bool,

    /// Name given to the pet when it is accepted.
    pub pet_name: String,

    /// Buy the Joja membership once the community centre is unlocked.
    pub purchase_joja_membership: bool,

    /// Initial move-build permission; changeable at runtime by chat command.
    pub move_build_permission: BuildPermission,

    /// Participants allowed to run administrative chat commands.  Empty means
    /// everyone.
    pub admins: Vec<ParticipantId>,

    /// Keep the host's health and stamina topped up every tick.
    pub host_keep_alive: bool,

    /// Warn, then soft-kick, participants who stay idle too long.
    pub auto_kick_enabled: bool,

    /// Idle minutes before a soft kick.  Clamped into 5..=1440.
    pub auto_kick_inactivity_minutes: u32,

    /// Never track the host's own activity.
    pub auto_kick_exempt_host: bool,

    /// Names or numeric ids that are never kicked, compared
    /// case-insensitively.
    pub auto_kick_whitelist: Vec<String>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            tick_rate:                 60,
            host_version:              HostApiVersion::Current,
            auto_sleep_time:           TimeOfDay(2200),
            force_return_to_bed:       true,
            dialogue_wait_secs:        0.5,
            transition_wait_secs:      2.0,
            confirmation_timeout_secs: 30,
            festival_force_start_secs: 60,
            cave_choice:               CaveChoice::Mushrooms,
            accept_pet:                true,
            pet_name:                  "Stella".to_string(),
            purchase_joja_membership:  false,
            move_build_permission:     BuildPermission::Off,
            admins:                    Vec::new(),
            host_keep_alive:           true,
            auto_kick_enabled:         false,
            auto_kick_inactivity_minutes: 30,
            auto_kick_exempt_host:     true,
            auto_kick_whitelist:       Vec::new(),
        }
    }
}

impl AutomationConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> HaResult<Self> {
        let config: AutomationConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    ///
    /// An out-of-range auto-sleep time is *not* an error; it is sanitised by
    /// [`effective_auto_sleep_time`][Self::effective_auto_sleep_time].
    pub fn validate(&self) -> HaResult<()> {
        if self.tick_rate == 0 {
            return Err(HaError::Config("tick_rate must be positive".into()));
        }
        if self.confirmation_timeout_secs <= 0 {
            return Err(HaError::Config("confirmation_timeout_secs must be positive".into()));
        }
        for (name, secs) in [
            ("dialogue_wait_secs", self.dialogue_wait_secs),
            ("transition_wait_secs", self.transition_wait_secs),
        ] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(HaError::Config(format!("{name} must be a non-negative number")));
            }
        }
        if self.accept_pet && self.pet_name.trim().is_empty() {
            return Err(HaError::Config("pet_name must be set when accept_pet is true".into()));
        }
        Ok(())
    }

    /// Auto-sleep time on the world's ten-minute grid, or 2530 when the
    /// configured value lies outside 600..=2600.
    pub fn effective_auto_sleep_time(&self) -> TimeOfDay {
        let t = self.auto_sleep_time;
        if t < TimeOfDay::DAY_START || t > TimeOfDay::DAY_END {
            FALLBACK_AUTO_SLEEP
        } else {
            t.floor_to_ten()
        }
    }

    /// Idle minutes before a soft kick, clamped into 5..=1440.
    pub fn effective_auto_kick_minutes(&self) -> u32 {
        self.auto_kick_inactivity_minutes.clamp(5, 1440)
    }

    /// True when `who` may run administrative commands.
    pub fn is_admin(&self, who: ParticipantId) -> bool {
        self.admins.is_empty() || self.admins.contains(&who)
    }
}
