//! Plain data row types written by output backends.

use tp_agent::Agent;
use tp_core::Tick;
use tp_graph::Dependency;

/// One agent's position and role in a snapshot frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub tick:      u64,
    pub agent_id:  u32,
    pub x:         f64,
    pub y:         f64,
    /// `false` for NonRoot agents.
    pub root:      bool,
    /// Only roots can be converged.
    pub converged: bool,
}

impl AgentSnapshotRow {
    pub fn from_agent(tick: Tick, agent: &Agent) -> Self {
        let p = agent.position();
        Self {
            tick:      tick.0,
            agent_id:  agent.id.0,
            x:         p.x,
            y:         p.y,
            root:      agent.is_root(),
            converged: agent.is_root() && agent.has_converged(),
        }
    }

    /// Frame title shared by every row of the same snapshot.
    pub fn frame(&self) -> String {
        Tick(self.tick).title()
    }
}

/// One dependency edge as of a snapshot frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyRow {
    pub tick:     u64,
    pub root:     u32,
    pub parent_a: u32,
    pub parent_b: u32,
}

impl DependencyRow {
    pub fn from_dependency(tick: Tick, dep: &Dependency) -> Self {
        Self {
            tick:     tick.0,
            root:     dep.root.0,
            parent_a: dep.parent_a.0,
            parent_b: dep.parent_b.0,
        }
    }
}

/// Counts for one simulated tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:      u64,
    pub converged: u64,
    pub active:    u64,
    pub non_root:  u64,
    pub promoted:  u64,
}
