//! Simulation time and run configuration.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  A tick has no
//! wall-clock meaning: it is one pass over every dependency followed by one
//! promotion sweep.  Using an integer tick keeps window arithmetic (deadlock
//! detection, snapshot intervals) exact.

use std::fmt;

use crate::{CoreError, CoreResult, Policy};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Human-readable frame title used to key per-tick side outputs.
    pub fn title(self) -> String {
        format!("Tick {}", self.0)
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

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Smallest population a run will spawn; smaller requests are clamped up.
pub const MIN_AGENT_COUNT: usize = 3;

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate (feature
/// `serde`; every field is optional there and falls back to
/// [`SimConfig::default`]) and passed to the simulation builder, which calls
/// [`validate`](Self::validate) and [`policy`](Self::policy) before anything
/// is spawned.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Requested population size.  Values below 3 are clamped to 3.
    pub agent_count: usize,

    /// Tick budget.  Reaching it without converging or deadlocking ends the
    /// run as exhausted.
    pub max_ticks: u64,

    /// Map extent in metres; agents spawn in `[0, width] × [0, height]`.
    pub map_width: f64,
    pub map_height: f64,

    /// Maximum distance a root moves per tick.  `None` jumps straight to the
    /// policy target.
    pub step_size: Option<f64>,

    /// Visibility range.  `None` uses the map diagonal, so every agent sees
    /// every other agent.
    pub perception_radius: Option<f64>,

    /// Collision radius of every spawned agent.
    pub agent_radius: f64,

    /// Extra clearance required between spawned agents on top of their radii.
    pub min_separation: f64,

    /// Positioning scenario: `"A"` (midpoint) or `"B"` (shield-behind).
    pub scenario: String,

    /// Scenario `B` only: how far behind the shield a root settles.
    pub dist_behind: Option<f64>,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Positions remembered per agent (H).  Convergence needs a full history.
    pub history_len: usize,

    /// Ticks an unchanged non-converged set must persist to count as a
    /// deadlock (W).
    pub deadlock_window: usize,

    /// Rejected samples tolerated per agent before spawning gives up.
    pub max_spawn_attempts: u32,

    /// Emit a snapshot every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,

    /// Optional sleep after each snapshot, for paced rendering.
    pub pacing_ms: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agent_count:             10,
            max_ticks:               100,
            map_width:               20.0,
            map_height:              20.0,
            step_size:               Some(0.5),
            perception_radius:       None,
            agent_radius:            0.3,
            min_separation:          0.0,
            scenario:                "A".to_owned(),
            dist_behind:             None,
            seed:                    42,
            history_len:             5,
            deadlock_window:         10,
            max_spawn_attempts:      10_000,
            snapshot_interval_ticks: 1,
            pacing_ms:               None,
        }
    }
}

impl SimConfig {
    /// Population size after clamping to [`MIN_AGENT_COUNT`].
    #[inline]
    pub fn effective_agent_count(&self) -> usize {
        self.agent_count.max(MIN_AGENT_COUNT)
    }

    /// Perception radius after resolving the map-diagonal default.
    pub fn effective_perception_radius(&self) -> f64 {
        self.perception_radius
            .unwrap_or_else(|| self.map_width.hypot(self.map_height))
    }

    /// The tick at which the simulation stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.max_ticks)
    }

    /// Resolve the scenario selector into a [`Policy`].
    pub fn policy(&self) -> CoreResult<Policy> {
        Policy::from_scenario(&self.scenario, self.dist_behind)
    }

    /// Reject configurations that cannot start a run.
    pub fn validate(&self) -> CoreResult<()> {
        fn positive(name: &str, v: f64) -> CoreResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be positive (got {v})")))
            }
        }

        positive("map_width", self.map_width)?;
        positive("map_height", self.map_height)?;
        positive("agent_radius", self.agent_radius)?;
        if let Some(step) = self.step_size {
            positive("step_size", step)?;
        }
        if let Some(r) = self.perception_radius {
            if !(r.is_finite() && r >= 0.0) {
                return Err(CoreError::Config(format!(
                    "perception_radius must be non-negative (got {r})"
                )));
            }
        }
        if !(self.min_separation.is_finite() && self.min_separation >= 0.0) {
            return Err(CoreError::Config(format!(
                "min_separation must be non-negative (got {})",
                self.min_separation
            )));
        }
        if self.history_len < 2 {
            return Err(CoreError::Config(format!(
                "history_len must be at least 2 (got {})",
                self.history_len
            )));
        }
        if self.deadlock_window == 0 {
            return Err(CoreError::Config("deadlock_window must be at least 1".to_owned()));
        }
        if self.max_spawn_attempts == 0 {
            return Err(CoreError::Config("max_spawn_attempts must be at least 1".to_owned()));
        }
        self.policy().map(|_| ())
    }
}
