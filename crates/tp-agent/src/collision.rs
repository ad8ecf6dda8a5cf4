//! Pairwise separation test between two circular agents.

use crate::Agent;

/// Decides whether two agents overlap, with optional extra clearance.
#[derive(Copy, Clone, Debug, Default)]
pub struct CollisionChecker {
    min_separation: f64,
}

impl CollisionChecker {
    /// Negative clearances are clamped to zero.
    pub fn new(min_separation: f64) -> Self {
        Self { min_separation: min_separation.max(0.0) }
    }

    #[inline]
    pub fn min_separation(&self) -> f64 {
        self.min_separation
    }

    /// Gap between the two circles' edges.  Negative means they overlap.
    #[inline]
    pub fn separation(&self, a: &Agent, b: &Agent) -> f64 {
        a.position().distance(b.position()) - a.radius - b.radius
    }

    /// How far the circles interpenetrate (`-separation`).
    #[inline]
    pub fn collision_depth(&self, a: &Agent, b: &Agent) -> f64 {
        -self.separation(a, b)
    }

    /// `true` if the gap is smaller than the required clearance.
    #[inline]
    pub fn in_collision(&self, a: &Agent, b: &Agent) -> bool {
        self.separation(a, b) < self.min_separation
    }
}
