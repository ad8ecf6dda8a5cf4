//! Simulation observer trait for progress reporting, rendering, and output.

use tp_agent::Population;
use tp_core::Tick;
use tp_graph::Dependency;

use crate::SimSummary;

/// Counts computed at the end of every tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickStats {
    pub tick:      Tick,
    /// Roots whose recent steps are non-increasing.
    pub converged: usize,
    /// Agents that are not NonRoot.
    pub active:    usize,
    pub non_root:  usize,
    /// Agents promoted to root during this tick.
    pub promoted:  usize,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers get read-only views; they cannot
/// influence the run.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, stats: &TickStats) {
///         if stats.tick.0 % self.interval == 0 {
///             println!("{}: {}/{} converged", stats.tick, stats.converged, stats.active);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the first tick, with the spawned population and the
    /// initial dependency graph.
    fn on_init(&mut self, _population: &Population, _dependencies: &[Dependency]) {}

    /// Called at the very start of each tick, before any agent moves.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every dependency created by the promotion sweep.
    fn on_promotion(&mut self, _tick: Tick, _dependency: &Dependency) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _stats: &TickStats) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`
    /// ticks) with the post-tick state.
    fn on_snapshot(
        &mut self,
        _tick:         Tick,
        _population:   &Population,
        _dependencies: &[Dependency],
    ) {}

    /// Called once when the run reaches a terminal state.
    fn on_sim_end(&mut self, _summary: &SimSummary) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
