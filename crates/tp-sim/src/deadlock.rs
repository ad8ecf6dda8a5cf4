//! Sliding-window stagnation detector.

use std::collections::{BTreeSet, VecDeque};

use tp_core::AgentId;

/// Remembers the settled non-converged root set (full history, not
/// converged) of the last `capacity` ticks.
///
/// A deadlock is reported when the window is full and every remembered set is
/// the same non-empty set, e.g. A depends on (B, C) while B depends on
/// (A, C): neither can settle while the other keeps moving.
#[derive(Clone, Debug)]
pub struct DeadlockWindow {
    capacity: usize,
    recent:   VecDeque<BTreeSet<AgentId>>,
}

impl DeadlockWindow {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, recent: VecDeque::with_capacity(capacity) }
    }

    /// Record this tick's non-converged set and report whether the run is
    /// deadlocked.
    pub fn observe(&mut self, non_converged: BTreeSet<AgentId>) -> bool {
        self.recent.push_back(non_converged);
        while self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
        self.is_deadlocked()
    }

    pub fn is_deadlocked(&self) -> bool {
        if self.recent.len() < self.capacity {
            return false;
        }
        let Some(latest) = self.recent.back() else {
            return false;
        };
        !latest.is_empty() && self.recent.iter().all(|set| set == latest)
    }

    /// The most recently observed set.
    pub fn latest(&self) -> Option<&BTreeSet<AgentId>> {
        self.recent.back()
    }
}
