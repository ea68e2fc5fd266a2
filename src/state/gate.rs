//! Single-writer guard placed in front of every persisted file.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use tracing::debug;

/// What a contended [`PersistenceGate::try_run`] call does with its request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// Skip the request entirely; a later trigger flushes the newer state.
    #[default]
    Drop,
    /// Skip the request but have the current holder run its work once more
    /// before releasing the gate.
    Coalesce,
}

/// Non-blocking, at-most-one-writer guard for a single target.
///
/// A caller that finds the gate busy never waits: its work is not executed
/// and `try_run` returns `None` right away.
#[derive(Debug)]
pub struct PersistenceGate {
    target: &'static str,
    policy: GatePolicy,
    busy: AtomicBool,
    pending: AtomicBool,
}

struct GateGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl PersistenceGate {
    /// Create an idle gate for `target` (used in logs only).
    pub fn new(target: &'static str, policy: GatePolicy) -> Self {
        Self {
            target,
            policy,
            busy: AtomicBool::new(false),
            pending: AtomicBool::new(false),
        }
    }

    /// Whether a write currently holds the gate.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run `work` to completion if nothing else holds the gate.
    ///
    /// Returns `None` without running `work` when the gate is busy. Under
    /// [`GatePolicy::Coalesce`] `work` may run more than once; the last
    /// outcome is returned.
    pub fn try_run<T>(&self, mut work: impl FnMut() -> T) -> Option<T> {
        let Some(mut guard) = self.acquire() else {
            match self.policy {
                GatePolicy::Drop => {
                    debug!(target_file = self.target, "write in flight; request dropped");
                }
                GatePolicy::Coalesce => {
                    self.pending.store(true, Ordering::Release);
                    debug!(target_file = self.target, "write in flight; rerun requested");
                }
            }
            return None;
        };

        loop {
            let outcome = work();
            if self.policy == GatePolicy::Drop {
                return Some(outcome);
            }
            if self.pending.swap(false, Ordering::AcqRel) {
                continue;
            }

            drop(guard);
            // A contender may flag a rerun between the swap above and the release.
            if !self.pending.load(Ordering::Acquire) {
                return Some(outcome);
            }
            match self.acquire() {
                Some(next) => {
                    self.pending.store(false, Ordering::Release);
                    guard = next;
                }
                None => return Some(outcome),
            }
        }
    }

    fn acquire(&self) -> Option<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| GateGuard { busy: &self.busy })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        panic::{AssertUnwindSafe, catch_unwind},
    };

    use super::*;

    #[test]
    fn idle_gate_runs_work() {
        let gate = PersistenceGate::new("test", GatePolicy::Drop);
        assert_eq!(gate.try_run(|| 42), Some(42));
        assert!(!gate.is_busy());
    }

    #[test]
    fn busy_gate_drops_without_running() {
        let gate = PersistenceGate::new("test", GatePolicy::Drop);
        let inner_runs = Cell::new(0);

        let outcome = gate.try_run(|| {
            assert!(gate.is_busy());
            gate.try_run(|| inner_runs.set(inner_runs.get() + 1))
        });

        assert_eq!(outcome, Some(None));
        assert_eq!(inner_runs.get(), 0);
        assert!(!gate.is_busy());
    }

    #[test]
    fn coalesce_reruns_holder_once() {
        let gate = PersistenceGate::new("test", GatePolicy::Coalesce);
        let runs = Cell::new(0);

        let outcome = gate.try_run(|| {
            runs.set(runs.get() + 1);
            if runs.get() == 1 {
                assert!(gate.try_run(|| ()).is_none());
                assert!(gate.try_run(|| ()).is_none());
            }
            runs.get()
        });

        assert_eq!(outcome, Some(2));
        assert_eq!(runs.get(), 2);
        assert!(!gate.is_busy());
    }

    #[test]
    fn panicking_work_releases_gate() {
        let gate = PersistenceGate::new("test", GatePolicy::Drop);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _: Option<()> = gate.try_run(|| panic!("boom"));
        }));

        assert!(result.is_err());
        assert!(!gate.is_busy());
        assert_eq!(gate.try_run(|| "again"), Some("again"));
    }

    #[test]
    fn gates_are_independent() {
        let attendance = PersistenceGate::new("attendance", GatePolicy::Drop);
        let scores = PersistenceGate::new("scores", GatePolicy::Drop);

        let outcome = attendance.try_run(|| scores.try_run(|| "score written"));
        assert_eq!(outcome, Some(Some("score written")));
    }
}
