//! Perception-radius queries over a snapshot of agent positions.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `[x, y]` to the `AgentId` standing there.
//! The index is a snapshot: it must be rebuilt after agents move, which the
//! driver does once per promotion sweep.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use tp_agent::{Agent, Population};
use tp_core::{AgentId, Position};

/// Relative slack on the R-tree query radius.  Candidates are re-checked with
/// [`Agent::sees`], so the slack only guards against squared-distance
/// rounding dropping an agent that sits exactly on the perception boundary.
const QUERY_SLACK: f64 = 1e-9;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct AgentEntry {
    point: [f64; 2],
    id: AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── VisibilityIndex ───────────────────────────────────────────────────────────

/// Positions of every agent at build time, indexed for radius queries.
pub struct VisibilityIndex {
    tree: RTree<AgentEntry>,
}

impl VisibilityIndex {
    /// Snapshot the current positions of `population`.
    pub fn build(population: &Population) -> Self {
        let entries = population
            .iter()
            .map(|a| AgentEntry { point: a.position().to_array(), id: a.id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Ids of every other agent within `agent.perception_radius` of `agent`,
    /// in ascending id order.
    pub fn visible_from(&self, agent: &Agent) -> Vec<AgentId> {
        let radius = agent.perception_radius * (1.0 + QUERY_SLACK);
        let mut seen: Vec<AgentId> = self
            .tree
            .locate_within_distance(agent.position().to_array(), radius * radius)
            .filter(|e| e.id != agent.id)
            .filter(|e| agent.sees(Position::new(e.point[0], e.point[1])))
            .map(|e| e.id)
            .collect();
        seen.sort_unstable();
        seen
    }
}
