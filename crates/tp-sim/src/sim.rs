//! The `Sim` struct and its tick loop.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::{debug, info, warn};

use tp_agent::Population;
use tp_core::{AgentId, Policy, SimConfig, SimRng, Tick};
use tp_graph::{Dependency, DependencyGraph};

use crate::{DeadlockWindow, Outcome, SimObserver, SimSummary, TickStats};

/// Where the run is in its life cycle.  Initialization happens inside
/// [`SimBuilder::build`][crate::SimBuilder::build], so a `Sim` starts out
/// `Running`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimPhase {
    Running,
    Converged,
    Deadlocked,
    Exhausted,
}

impl SimPhase {
    /// The terminal outcome, or `None` while still running.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            SimPhase::Running    => None,
            SimPhase::Converged  => Some(Outcome::Converged),
            SimPhase::Deadlocked => Some(Outcome::Deadlocked),
            SimPhase::Exhausted  => Some(Outcome::Exhausted),
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self != SimPhase::Running
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` is the only mutator of the population.  Each tick:
///
/// 1. **Dependencies**: the dependency list is shuffled with the run's RNG and
///    applied one at a time.  A root reads its parents' positions as they are
///    at that moment, so parents processed earlier in the same tick have
///    already moved.
/// 2. **Promotion**: NonRoot agents that now see two others get a dependency.
/// 3. **Checks**: converged if every active agent converged; deadlocked if
///    the non-converged roots with a full history stayed the same for
///    `deadlock_window` ticks; exhausted once `max_ticks` ticks have run.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Validated run configuration.
    pub config: SimConfig,

    /// Positioning policy resolved from `config.scenario`.
    pub policy: Policy,

    /// All agents.  Observers get read-only access through hooks.
    pub population: Population,

    /// Current dependencies and NonRoot set.
    pub graph: DependencyGraph,

    /// The single randomness source (already advanced past spawning and the
    /// initial graph).
    pub rng: SimRng,

    /// Next tick to simulate; equals the number of ticks run so far.
    pub current_tick: Tick,

    pub phase: SimPhase,

    pub(crate) window:     DeadlockWindow,
    pub(crate) started:    bool,
    pub(crate) last_order: Vec<Dependency>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Step until a terminal state and return the summary.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimSummary {
        while !self.step(observer).is_terminal() {}

        let summary = self.summary_now();
        match summary.outcome {
            Outcome::Deadlocked => warn!(
                ticks = summary.ticks.0,
                unresolved = summary.unresolved.len(),
                "simulation deadlocked"
            ),
            outcome => info!(
                %outcome,
                ticks = summary.ticks.0,
                converged = summary.converged,
                non_root = summary.non_root,
                "simulation finished"
            ),
        }
        observer.on_sim_end(&summary);
        summary
    }

    /// Advance by at most one tick and return the resulting phase.
    ///
    /// Does nothing once the run is terminal.  Useful for tests and for
    /// driving the loop from an external event loop.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimPhase {
        if self.phase.is_terminal() {
            return self.phase;
        }
        if !self.started {
            self.started = true;
            observer.on_init(&self.population, self.graph.dependencies());
        }
        if self.current_tick >= self.config.end_tick() {
            self.phase = SimPhase::Exhausted;
            return self.phase;
        }

        let now = self.current_tick;
        observer.on_tick_start(now);

        self.apply_dependencies();

        let promoted = self.graph.promote(&mut self.population, &mut self.rng);
        for dep in &promoted {
            observer.on_promotion(now, dep);
        }

        let non_converged = self.non_converged_roots();
        let active = self.population.len() - self.graph.non_root().len();
        let stats = TickStats {
            tick:      now,
            converged: active - non_converged.len(),
            active,
            non_root:  self.graph.non_root().len(),
            promoted:  promoted.len(),
        };
        debug!(
            tick = now.0,
            converged = stats.converged,
            active = stats.active,
            promoted = stats.promoted,
            "tick complete"
        );
        observer.on_tick_end(&stats);

        let interval = self.config.snapshot_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.population, self.graph.dependencies());
            if let Some(ms) = self.config.pacing_ms {
                std::thread::sleep(Duration::from_millis(ms));
            }
        }

        self.current_tick = now + 1;
        self.phase = if stats.converged == stats.active {
            SimPhase::Converged
        } else if self.window.observe(self.settled(&non_converged)) {
            SimPhase::Deadlocked
        } else if self.current_tick >= self.config.end_tick() {
            SimPhase::Exhausted
        } else {
            SimPhase::Running
        };
        self.phase
    }

    /// The end-of-run report, or `None` while the run is still going.
    pub fn summary(&self) -> Option<SimSummary> {
        self.phase.outcome().map(|_| self.summary_now())
    }

    /// Roots that are currently not converged, in ascending id order.
    pub fn non_converged_roots(&self) -> BTreeSet<AgentId> {
        self.population
            .iter()
            .filter(|a| a.is_root() && !a.has_converged())
            .map(|a| a.id)
            .collect()
    }

    /// The order in which dependencies were applied during the last tick.
    /// Empty before the first tick.
    pub fn last_order(&self) -> &[Dependency] {
        &self.last_order
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// The subset of `non_converged` whose history is full.  A root still
    /// filling its history has no verdict yet, so it cannot be stuck.
    fn settled(&self, non_converged: &BTreeSet<AgentId>) -> BTreeSet<AgentId> {
        non_converged
            .iter()
            .copied()
            .filter(|&id| self.population.agent(id).history_is_full())
            .collect()
    }

    /// Move every root once, in a freshly shuffled order.
    fn apply_dependencies(&mut self) {
        let mut order: Vec<Dependency> = self.graph.dependencies().to_vec();
        self.rng.shuffle(&mut order);

        let policy = self.policy;
        let step = self.config.step_size;
        for &dep in &order {
            let parent_a = self.population.position(dep.parent_a);
            let parent_b = self.population.position(dep.parent_b);
            let root = self.population.agent_mut(dep.root);

            let moved = match policy {
                Policy::MidpointConvergence => root.move_toward_midpoint(parent_a, parent_b, step),
                Policy::ShieldBehind { dist_behind } => {
                    root.move_behind_shield(parent_a, parent_b, step, dist_behind)
                }
            };
            if !moved {
                root.hold();
            }
        }
        self.last_order = order;
    }

    fn summary_now(&self) -> SimSummary {
        let non_converged = self.non_converged_roots();
        let outcome = self.phase.outcome().unwrap_or(Outcome::Exhausted);
        let unresolved = if outcome == Outcome::Deadlocked {
            non_converged
                .iter()
                .filter_map(|&id| self.graph.dependency_of(id).copied())
                .collect()
        } else {
            Vec::new()
        };
        let non_root = self.graph.non_root().len();

        SimSummary {
            outcome,
            ticks: self.current_tick,
            converged: self.population.len() - non_root - non_converged.len(),
            non_converged: non_converged.len(),
            non_root,
            unresolved,
        }
    }
}
