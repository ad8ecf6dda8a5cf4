//! A single point agent and its motion primitives.
//!
//! An agent never looks at another agent directly: every primitive takes plain
//! target [`Position`]s, and the simulation driver is responsible for reading
//! parent positions out of the population first.  That keeps the population
//! the single source of truth for position state.

use std::collections::VecDeque;
use std::fmt;

use tp_core::geo::{closest_point_on_line, point_between};
use tp_core::{AgentId, Position};

/// Slack allowed when comparing consecutive step lengths for convergence.
///
/// Full-length steps computed from a unit vector differ from `step_size` in
/// the last few bits, and those differences must not read as "speeding up".
pub const CONVERGENCE_EPSILON: f64 = 1e-9;

/// Whether an agent currently takes part in the dependency graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// Positions itself relative to two parents every tick.
    #[default]
    Root,
    /// Sees fewer than two other agents; stays put until promoted.
    NonRoot,
}

/// A circular point agent on the map.
#[derive(Clone, Debug)]
pub struct Agent {
    /// Unique within the population, stable for the agent's lifetime.
    pub id: AgentId,

    /// Maximum distance at which this agent sees others.
    pub perception_radius: f64,

    /// Collision radius, only consulted while spawning.
    pub radius: f64,

    position: Position,
    initial_position: Position,
    role: Role,

    /// Last `history_len` positions, oldest first.  Never empty.
    history: VecDeque<Position>,
    history_len: usize,
}

impl Agent {
    /// Create a root agent at `position` with a history holding just that
    /// position.  `history_len` is clamped to at least 1.
    pub fn new(
        id: AgentId,
        position: Position,
        perception_radius: f64,
        radius: f64,
        history_len: usize,
    ) -> Self {
        let history_len = history_len.max(1);
        let mut history = VecDeque::with_capacity(history_len);
        history.push_back(position);
        Self {
            id,
            perception_radius,
            radius,
            position,
            initial_position: position,
            role: Role::Root,
            history,
            history_len,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Where the agent was spawned.
    #[inline]
    pub fn initial_position(&self) -> Position {
        self.initial_position
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.role == Role::Root
    }

    /// Recorded positions, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.history.iter()
    }

    /// Capacity of the position history (H).
    #[inline]
    pub fn history_capacity(&self) -> usize {
        self.history_len
    }

    /// `true` if `other` lies within this agent's perception radius.
    #[inline]
    pub fn sees(&self, other: Position) -> bool {
        self.position.distance(other) <= self.perception_radius
    }

    // ── Roles ─────────────────────────────────────────────────────────────

    pub fn mark_root(&mut self) {
        self.role = Role::Root;
    }

    pub fn mark_non_root(&mut self) {
        self.role = Role::NonRoot;
    }

    // ── Motion primitives ─────────────────────────────────────────────────

    /// Move towards `target`.
    ///
    /// - Already at `target`: nothing happens.
    /// - `step_size == None`: jump straight to `target`.
    /// - Otherwise move `step_size` metres along the line to `target`, or land
    ///   exactly on it if it is closer than that.  Never overshoots.
    ///
    /// Returns `true` if the position changed (and was recorded in history).
    pub fn move_toward(&mut self, target: Position, step_size: Option<f64>) -> bool {
        if target == self.position {
            return false;
        }

        let next = match step_size {
            None => target,
            Some(step) => {
                let distance = self.position.distance(target);
                if step >= distance {
                    target
                } else {
                    match self.position.unit_vector_to(target) {
                        Some((ux, uy)) => self.position.offset(ux * step, uy * step),
                        None => target,
                    }
                }
            }
        };

        if next == self.position {
            return false;
        }
        self.set_position(next);
        true
    }

    /// Move towards the midpoint of `a` and `b` (which is `a` when they
    /// coincide).
    pub fn move_toward_midpoint(
        &mut self,
        a: Position,
        b: Position,
        step_size: Option<f64>,
    ) -> bool {
        self.move_toward(a.midpoint(b), step_size)
    }

    /// Hide behind `use_as_shield` as seen from `shield_from`.
    ///
    /// If the agent already sits in the strip between the two (see
    /// [`point_between`]) it heads for the closest point on the line through
    /// them.  Otherwise it heads for the point `dist_behind` metres past
    /// `use_as_shield` on the ray `shield_from → use_as_shield`.
    ///
    /// Does nothing when both reference positions coincide.
    pub fn move_behind_shield(
        &mut self,
        shield_from: Position,
        use_as_shield: Position,
        step_size: Option<f64>,
        dist_behind: f64,
    ) -> bool {
        let Some((ux, uy)) = shield_from.unit_vector_to(use_as_shield) else {
            return false;
        };

        let target = if point_between(shield_from, use_as_shield, self.position) {
            closest_point_on_line(shield_from, use_as_shield, self.position).1
        } else {
            use_as_shield.offset(ux * dist_behind, uy * dist_behind)
        };
        self.move_toward(target, step_size)
    }

    /// Record a zero-length step: the agent was asked to move but is already
    /// where its policy wants it.
    pub fn hold(&mut self) {
        self.record(self.position);
    }

    // ── Convergence ───────────────────────────────────────────────────────

    /// Step lengths between consecutive history entries, oldest first.
    pub fn displacements(&self) -> impl Iterator<Item = f64> + '_ {
        self.history
            .iter()
            .zip(self.history.iter().skip(1))
            .map(|(a, b)| a.distance(*b))
    }

    /// `true` once `history_capacity()` positions have been recorded.  Until
    /// then the agent can be judged neither converged nor stuck.
    #[inline]
    pub fn history_is_full(&self) -> bool {
        self.history.len() >= self.history_len
    }

    /// `true` once the history is full and every step is no longer than the
    /// one before it.
    pub fn has_converged(&self) -> bool {
        if !self.history_is_full() {
            return false;
        }
        let steps: Vec<f64> = self.displacements().collect();
        steps
            .windows(2)
            .all(|w| w[1] <= w[0] + CONVERGENCE_EPSILON)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn set_position(&mut self, position: Position) {
        self.position = position;
        self.record(position);
    }

    fn record(&mut self, position: Position) {
        self.history.push_back(position);
        while self.history.len() > self.history_len {
            self.history.pop_front();
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Id {}: position ({:.3}, {:.3})",
            self.id.0, self.position.x, self.position.y
        )
    }
}
