//! `TimeoutScheduler` — sparse due-time queue of one-shot callbacks.
//!
//! Items are kept in a `BTreeMap<Duration, Vec<_>>` keyed by due time, so
//! each tick only the due prefix is touched.  Most ticks nothing is due and
//! `advance` is a single range check.
//!
//! # Reentrancy
//!
//! Callbacks receive the whole host context `&mut C`, which owns this
//! scheduler.  That works because due items are split off the queue into an
//! owned batch *before* any callback runs: a callback may freely schedule or
//! invalidate other timeouts, and nothing it does can make an item fire
//! twice.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use ha_core::TimeoutId;

/// A delayed action.  An `Err` is logged and otherwise ignored.
pub type TimeoutCallback<C> = Box<dyn FnOnce(&mut C) -> Result<(), String>>;

/// A context that owns a [`TimeoutScheduler`] over itself.
pub trait TimeoutHost: Sized {
    fn timeouts(&mut self) -> &mut TimeoutScheduler<Self>;
}

/// One-shot delayed callbacks over host context `C`.
pub struct TimeoutScheduler<C> {
    queue:   BTreeMap<Duration, Vec<(TimeoutId, TimeoutCallback<C>)>>,
    /// Due time of every pending handle, for O(log n) invalidation.
    due_of:  HashMap<TimeoutId, Duration>,
    now:     Duration,
    next_id: u64,
}

impl<C> Default for TimeoutScheduler<C> {
    fn default() -> Self {
        Self {
            queue:   BTreeMap::new(),
            due_of:  HashMap::new(),
            now:     Duration::ZERO,
            next_id: 0,
        }
    }
}

impl<C> TimeoutScheduler<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the scheduler's notion of "now" forward to `now`.  Never moves
    /// it back.
    ///
    /// Called at the start of every session event, so a timeout scheduled
    /// between two ticks counts from the moment it was requested.
    pub fn sync(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Run `callback` once, `after_secs` seconds of session time from the
    /// most recent [`sync`][Self::sync] or `advance`.
    ///
    /// A non-positive delay is rejected and returns `None`; the callback is
    /// dropped without running.
    pub fn schedule<F>(&mut self, after_secs: i64, callback: F) -> Option<TimeoutId>
    where
        F: FnOnce(&mut C) -> Result<(), String> + 'static,
    {
        self.schedule_with_id(after_secs, |_| callback)
    }

    /// Like [`schedule`][Self::schedule], but `make` receives the handle the
    /// callback will be filed under, so the callback can recognise itself.
    pub fn schedule_with_id<M, F>(&mut self, after_secs: i64, make: M) -> Option<TimeoutId>
    where
        M: FnOnce(TimeoutId) -> F,
        F: FnOnce(&mut C) -> Result<(), String> + 'static,
    {
        if after_secs <= 0 {
            tracing::warn!(after_secs, "rejected timeout with non-positive delay");
            return None;
        }
        let id = TimeoutId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(Duration::from_secs(after_secs as u64));
        self.queue.entry(due).or_default().push((id, Box::new(make(id))));
        self.due_of.insert(id, due);
        tracing::debug!(%id, after_secs, due_secs = due.as_secs_f64(), "timeout scheduled");
        Some(id)
    }

    /// Cancel a pending timeout.  Returns `false` if it already fired or was
    /// never scheduled.
    pub fn invalidate(&mut self, id: TimeoutId) -> bool {
        let Some(due) = self.due_of.remove(&id) else {
            return false;
        };
        if let Some(items) = self.queue.get_mut(&due) {
            items.retain(|(i, _)| *i != id);
            if items.is_empty() {
                self.queue.remove(&due);
            }
        }
        tracing::debug!(%id, "timeout invalidated");
        true
    }

    pub fn is_pending(&self, id: TimeoutId) -> bool {
        self.due_of.contains_key(&id)
    }

    /// Session time seen by the most recent `advance`.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// The earliest pending due time, or `None` if empty.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.due_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.due_of.is_empty()
    }

    /// Drop every pending timeout without running it.  Session teardown.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.due_of.clear();
    }

    /// Record `now` and remove every item due at or before it, oldest first.
    fn take_due(&mut self, now: Duration) -> Vec<(TimeoutId, TimeoutCallback<C>)> {
        self.sync(now);
        if self.next_due().is_none_or(|first| first > now) {
            return Vec::new();
        }
        let later = self.queue.split_off(&(now + Duration::from_nanos(1)));
        let due = std::mem::replace(&mut self.queue, later);
        let batch: Vec<_> = due.into_values().flatten().collect();
        for (id, _) in &batch {
            self.due_of.remove(id);
        }
        batch
    }
}

impl<C: TimeoutHost> TimeoutScheduler<C> {
    /// Fire every timeout due at `now` against `host`.
    ///
    /// Called once per tick.  A failing callback is logged and does not stop
    /// the rest of the batch.  Returns how many callbacks ran.
    pub fn advance(host: &mut C, now: Duration) -> usize {
        let batch = host.timeouts().take_due(now);
        let fired = batch.len();
        for (id, callback) in batch {
            tracing::trace!(%id, "timeout fired");
            if let Err(error) = callback(host) {
                tracing::warn!(%id, %error, "timeout callback failed");
            }
        }
        fired
    }
}
