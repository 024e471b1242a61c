//! `ReadinessRegistry` — check name → set of ready participants.

use std::collections::BTreeSet;

use ha_core::ParticipantId;

#[cfg(not(feature = "fx-hash"))]
type CheckMap<V> = std::collections::HashMap<String, V>;
#[cfg(feature = "fx-hash")]
type CheckMap<V> = rustc_hash::FxHashMap<String, V>;

/// The authoritative ready-check primitive of the multiplayer layer.
///
/// Implemented by the world adapter.  Returning `None` means the lookup
/// itself failed (unknown check, incompatible host API); the registry then
/// answers from an empty set and retries on the next query.
pub trait ReadySource {
    fn ready_participants(&self, check: &str) -> Option<Vec<ParticipantId>>;
}

/// One check's cached set.  `None` means registered through
/// [`ReadinessRegistry::watch`] but never resolved.
type CheckEntry = Option<BTreeSet<ParticipantId>>;

/// Per-check readiness cache.
///
/// Sets are `BTreeSet`s so iteration order (and therefore logging and tests)
/// is deterministic.
#[derive(Debug, Default)]
pub struct ReadinessRegistry {
    checks: CheckMap<CheckEntry>,
}

impl ReadinessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `check` without resolving it.  The first query
    /// reconciles it from the source.  No-op if the check is already cached.
    pub fn watch(&mut self, check: &str) {
        if !self.checks.contains_key(check) {
            self.checks.insert(check.to_string(), None);
            tracing::debug!(check, "watching ready-check");
        }
    }

    /// Record that `who` is ready for `check`.  Idempotent.
    ///
    /// A local observation creates the check if needed; it never triggers a
    /// reconcile.
    pub fn mark_ready(&mut self, check: &str, who: ParticipantId) {
        let set = self.known_mut(check);
        if set.insert(who) {
            tracing::debug!(check, %who, "marked ready");
        }
    }

    /// Record that `who` is no longer ready for `check`.  Idempotent.
    pub fn mark_not_ready(&mut self, check: &str, who: ParticipantId) {
        if let Some(Some(set)) = self.checks.get_mut(check) {
            if set.remove(&who) {
                tracing::debug!(check, %who, "marked not ready");
            }
        }
    }

    /// Record a readiness change of `who` reported by the multiplayer layer.
    ///
    /// An unresolved check is reconciled from `source` first, so the change
    /// lands on top of everyone already ready upstream.  If that lookup
    /// fails the change is still recorded.
    pub fn observe<S: ReadySource + ?Sized>(
        &mut self,
        check:  &str,
        who:    ParticipantId,
        ready:  bool,
        source: &S,
    ) {
        self.resolve(check, source);
        if ready {
            self.mark_ready(check, who);
        } else {
            self.mark_not_ready(check, who);
        }
    }

    /// Is `who` ready for `check`?  Reconciles the check on a cache miss.
    pub fn is_ready<S: ReadySource + ?Sized>(
        &mut self,
        check:  &str,
        who:    ParticipantId,
        source: &S,
    ) -> bool {
        self.resolve(check, source)
            .is_some_and(|set| set.contains(&who))
    }

    /// Number of participants ready for `check`.  Reconciles on a cache miss.
    pub fn count_ready<S: ReadySource + ?Sized>(&mut self, check: &str, source: &S) -> usize {
        self.resolve(check, source).map_or(0, BTreeSet::len)
    }

    /// How many of `among` are ready for `check`.  Reconciles on a cache miss.
    pub fn count_ready_among<S: ReadySource + ?Sized>(
        &mut self,
        check:  &str,
        among:  &[ParticipantId],
        source: &S,
    ) -> usize {
        match self.resolve(check, source) {
            Some(set) => among.iter().filter(|p| set.contains(p)).count(),
            None      => 0,
        }
    }

    /// Cached view of `check`, without reconciling.
    pub fn cached(&self, check: &str) -> Option<&BTreeSet<ParticipantId>> {
        self.checks.get(check).and_then(Option::as_ref)
    }

    /// Drop `who` from every check.  Called on disconnect so a participant
    /// who leaves mid-check is not counted as ready forever.
    ///
    /// Returns how many checks `who` was removed from.
    pub fn remove_participant(&mut self, who: ParticipantId) -> usize {
        let mut removed = 0;
        for set in self.checks.values_mut().flatten() {
            if set.remove(&who) {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(%who, removed, "cleared readiness of departed participant");
        }
        removed
    }

    /// Clear every check's set.  Called once per day start; calling it twice
    /// is harmless.
    ///
    /// Known checks stay known (and empty) so a stale authoritative answer
    /// from the previous day is not reconciled back in.
    pub fn reset_all(&mut self) {
        for entry in self.checks.values_mut() {
            *entry = Some(BTreeSet::new());
        }
        tracing::debug!(checks = self.checks.len(), "readiness reset");
    }

    /// Forget everything, including which checks exist.  Session teardown.
    pub fn clear(&mut self) {
        self.checks.clear();
    }

    /// Number of checks the registry currently knows about.
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn known_mut(&mut self, check: &str) -> &mut BTreeSet<ParticipantId> {
        self.checks
            .entry(check.to_string())
            .or_default()
            .get_or_insert_with(BTreeSet::new)
    }

    /// Return the cached set for `check`, reconciling it from `source` first
    /// if it has never been observed.  `None` when reconciliation failed.
    fn resolve<S: ReadySource + ?Sized>(
        &mut self,
        check:  &str,
        source: &S,
    ) -> Option<&BTreeSet<ParticipantId>> {
        if !matches!(self.checks.get(check), Some(Some(_))) {
            let Some(fetched) = source.ready_participants(check) else {
                tracing::debug!(check, "ready-check lookup failed; treating as nobody ready");
                return None;
            };
            let fetched: BTreeSet<ParticipantId> = fetched.into_iter().collect();
            tracing::trace!(check, ready = fetched.len(), "reconciled ready-check");
            // Only this check's slot is touched; an entry that became known in
            // the meantime wins over the fetched answer.
            let slot = self.checks.entry(check.to_string()).or_default();
            if slot.is_none() {
                *slot = Some(fetched);
            }
        }
        self.cached(check)
    }
}
