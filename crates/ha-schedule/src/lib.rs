//! `ha-schedule` — one-shot delayed callbacks.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`timeout`]   | `TimeoutScheduler<C>`, `TimeoutHost`, `TimeoutCallback<C>` |
//!
//! # Time model (summary)
//!
//! Due times are measured on session time (`SessionClock::elapsed()`), never
//! on the wall clock, so a test fires a 30-second timeout by stepping
//! `30 × tick_rate` ticks.
//!
//! ```text
//! sync(now)             →  last_seen_now = max(last_seen_now, now)
//! schedule(after_secs)  →  due = last_seen_now + after_secs
//! advance(host, now)    →  sync(now), then fire every item with due ≤ now
//! ```

pub mod timeout;


pub use timeout::{TimeoutCallback, TimeoutHost, TimeoutScheduler};
