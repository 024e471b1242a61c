//! Session time model.
//!
//! # Design
//!
//! Two clocks matter to the automation engine and they are deliberately kept
//! apart:
//!
//! - **Session time** — a monotonically increasing `Tick` counter advanced
//!   once per host update.  Real elapsed time is derived from it:
//!
//!     elapsed = current_tick / tick_rate
//!
//!   All throttling (wait-tick counters) and all confirmation timeouts are
//!   measured on this clock, so tests drive them exactly by stepping ticks.
//!
//! - **In-world time of day** — a `TimeOfDay` reported by the world, in the
//!   `HHMM` convention of the simulation (06:00 = 600, 2 AM next day = 2600).
//!   Sleep and festival thresholds are compared against it.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute session tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeOfDay ────────────────────────────────────────────────────────────────

/// In-world time of day in `HHMM` form.
///
/// Values past midnight keep counting (`2530` is 1:30 AM of the following
/// calendar day) because the simulation's day does not end at 2400.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TimeOfDay(pub u16);

impl TimeOfDay {
    /// 6:00 AM, the start of every in-world day.
    pub const DAY_START: TimeOfDay = TimeOfDay(600);
    /// 2:00 AM, when the world forces everyone to bed.
    pub const DAY_END: TimeOfDay = TimeOfDay(2600);

    #[inline]
    pub fn hhmm(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn hours(self) -> u16 {
        self.0 / 100
    }

    #[inline]
    pub fn minutes(self) -> u16 {
        self.0 % 100
    }

    /// Minutes since midnight of the current in-world day.
    #[inline]
    pub fn total_minutes(self) -> u32 {
        self.hours() as u32 * 60 + self.minutes() as u32
    }

    /// The time `mins` minutes after `self`, normalised back to `HHMM`.
    pub fn plus_minutes(self, mins: u32) -> TimeOfDay {
        let total = self.total_minutes() + mins;
        TimeOfDay(((total / 60) * 100 + total % 60) as u16)
    }

    /// Round down to the ten-minute grid the world advances on.
    #[inline]
    pub fn floor_to_ten(self) -> TimeOfDay {
        TimeOfDay(self.0 - self.0 % 10)
    }

    /// True when `self` is a time the world can actually display
    /// (06:00 through 02:00, minutes below 60).
    pub fn is_valid(self) -> bool {
        self >= Self::DAY_START && self <= Self::DAY_END && self.minutes() < 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

// ── SessionClock ─────────────────────────────────────────────────────────────

/// Converts between tick counts and real elapsed time.
///
/// `SessionClock` is cheap to copy and intentionally holds no heap data.
#[derive(Copy, Clone, Debug)]
pub struct SessionClock {
    /// How many host updates happen per real second.  Default: 60.
    pub tick_rate: u32,
    /// The current tick — advanced by `SessionClock::advance()` each update.
    pub current_tick: Tick,
}

impl SessionClock {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick_rate: tick_rate.max(1),
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Real time elapsed since tick 0.
    pub fn elapsed(&self) -> Duration {
        let rate = self.tick_rate as u64;
        let t = self.current_tick.0;
        Duration::from_secs(t / rate) + Duration::from_nanos((t % rate) * 1_000_000_000 / rate)
    }

    /// How many ticks span `secs` whole seconds?  Saturates at `u64::MAX`.
    #[inline]
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        secs.saturating_mul(self.tick_rate as u64)
    }

    /// Ticks for a fractional wait, rounded up so a wait is never short and
    /// clamped into the `u32` range used by wait-tick counters.
    pub fn wait_ticks(&self, secs: f32) -> u32 {
        let ticks = (secs.max(0.0) * self.tick_rate as f32).ceil();
        ticks.min(u32::MAX as f32) as u32
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl fmt::Display for SessionClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}s)", self.current_tick, self.elapsed().as_secs_f64())
    }
}
