//! Unit tests for ha-readiness.

use std::cell::Cell;
use std::collections::HashMap;

use ha_core::ParticipantId;

use crate::{ReadinessRegistry, ReadySource};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Authoritative source with fixed answers that counts how often it is asked.
#[derive(Default)]
struct FixedSource {
    answers: HashMap<&'static str, Vec<ParticipantId>>,
    calls:   Cell<usize>,
}

impl FixedSource {
    fn with(check: &'static str, ready: &[i64]) -> Self {
        let mut s = Self::default();
        s.answers.insert(check, ready.iter().copied().map(ParticipantId).collect());
        s
    }
}

impl ReadySource for FixedSource {
    fn ready_participants(&self, check: &str) -> Option<Vec<ParticipantId>> {
        self.calls.set(self.calls.get() + 1);
        self.answers.get(check).cloned()
    }
}

const A: ParticipantId = ParticipantId(1);
const B: ParticipantId = ParticipantId(2);
const HOST: ParticipantId = ParticipantId(0);

// ── Local marks ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod marks {
    use super::*;

    #[test]
    fn mark_ready_is_idempotent() {
        let mut reg = ReadinessRegistry::new();
        let src = FixedSource::default();
        reg.mark_ready("sleep", A);
        reg.mark_ready("sleep", A);
        assert_eq!(reg.count_ready("sleep", &src), 1);
        assert!(reg.is_ready("sleep", A, &src));
        assert_eq!(src.calls.get(), 0, "locally observed check must not reconcile");
    }

    #[test]
    fn mark_not_ready_removes_only_that_participant() {
        let mut reg = ReadinessRegistry::new();
        let src = FixedSource::default();
        reg.mark_ready("sleep", A);
        reg.mark_ready("sleep", B);
        reg.mark_not_ready("sleep", A);
        reg.mark_not_ready("sleep", A);
        assert!(!reg.is_ready("sleep", A, &src));
        assert!(reg.is_ready("sleep", B, &src));
    }

    #[test]
    fn host_is_counted_like_anyone_else() {
        let mut reg = ReadinessRegistry::new();
        let src = FixedSource::default();
        reg.mark_ready("sleep", HOST);
        reg.mark_ready("sleep", A);
        assert_eq!(reg.count_ready("sleep", &src), 2);
        assert_eq!(reg.count_ready_among("sleep", &[A, B], &src), 1);
    }

    #[test]
    fn checks_are_independent() {
        let mut reg = ReadinessRegistry::new();
        let src = FixedSource::default();
        reg.mark_ready("sleep", A);
        assert!(!reg.is_ready("festivalEnd", A, &src));
    }
}

// ── Reconcile on miss ─────────────────────────────────────────────────────────

#[cfg(test)]
mod reconcile {
    use super::*;

    #[test]
    fn miss_populates_from_source_once() {
        let mut reg = ReadinessRegistry::new();
        let src = FixedSource::with("sleep", &[1, 2]);
        assert_eq!(reg.count_ready("sleep", &src), 2);
        assert!(reg.is_ready("sleep", B, &src));
        assert_eq!(src.calls.get(), 1, "second query must hit the cache");
    }

    #[test]
    fn watched_check_reconciles_on_first_query() {
        let mut reg = ReadinessRegistry::new();
        reg.watch("festivalStart");
        assert!(reg.cached("festivalStart").is_none());
        let src = FixedSource::with("festivalStart", &[1]);
        assert!(reg.is_ready("festivalStart", A, &src));
    }

    #[test]
    fn failed_lookup_is_retried_later() {
        let mut reg = ReadinessRegistry::new();
        let failing = FixedSource::default();
        assert_eq!(reg.count_ready("sleep", &failing), 0);
        assert!(reg.cached("sleep").is_none());

        let working = FixedSource::with("sleep", &[2]);
        assert_eq!(reg.count_ready("sleep", &working), 1);
    }

    #[test]
    fn observed_change_keeps_upstream_readiness() {
        let mut reg = ReadinessRegistry::new();
        reg.watch("sleep");
        let src = FixedSource::with("sleep", &[2]);
        reg.observe("sleep", A, true, &src);
        assert_eq!(reg.count_ready_among("sleep", &[A, B], &src), 2);
        assert_eq!(src.calls.get(), 1);

        reg.observe("sleep", B, false, &src);
        assert!(!reg.is_ready("sleep", B, &src));
        assert_eq!(src.calls.get(), 1, "known check must not reconcile again");
    }

    #[test]
    fn observed_change_survives_a_failed_lookup() {
        let mut reg = ReadinessRegistry::new();
        let failing = FixedSource::default();
        reg.observe("sleep", A, true, &failing);
        assert!(reg.is_ready("sleep", A, &failing));
    }

    #[test]
    fn reconciling_one_check_leaves_others_alone() {
        let mut reg = ReadinessRegistry::new();
        reg.mark_ready("festivalEnd", A);
        let src = FixedSource::with("sleep", &[2]);
        assert_eq!(reg.count_ready("sleep", &src), 1);
        assert!(reg.is_ready("festivalEnd", A, &src));
        assert!(!reg.is_ready("festivalEnd", B, &src));
    }
}

// ── Disconnect and day start ──────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn count_excludes_disconnected_participants() {
        let mut reg = ReadinessRegistry::new();
        let src = FixedSource::default();
        reg.mark_ready("sleep", A);
        reg.mark_ready("sleep", B);
        reg.mark_ready("festivalEnd", B);
        assert_eq!(reg.remove_participant(B), 2);
        assert_eq!(reg.count_ready("sleep", &src), 1);
        assert_eq!(reg.count_ready("festivalEnd", &src), 0);
        assert_eq!(reg.remove_participant(B), 0);
    }

    #[test]
    fn reset_all_zeroes_every_check() {
        let mut reg = ReadinessRegistry::new();
        reg.mark_ready("sleep", A);
        reg.mark_ready("festivalStart", B);
        reg.reset_all();
        reg.reset_all();
        // A stale authoritative answer must not leak back in after reset.
        let stale = FixedSource::with("sleep", &[1, 2]);
        assert_eq!(reg.count_ready("sleep", &stale), 0);
        assert_eq!(reg.count_ready("festivalStart", &stale), 0);
        assert_eq!(stale.calls.get(), 0);
    }

    #[test]
    fn clear_forgets_checks() {
        let mut reg = ReadinessRegistry::new();
        reg.mark_ready("sleep", A);
        reg.clear();
        assert_eq!(reg.check_count(), 0);
    }
}
