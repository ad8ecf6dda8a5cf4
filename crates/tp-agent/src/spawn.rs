//! Collision-free random placement of a fresh population.
//!
//! # Usage
//!
//! ```rust
//! use tp_agent::Spawner;
//! use tp_core::SimRng;
//!
//! let mut rng = SimRng::new(42);
//! let population = Spawner::new(20.0, 20.0)
//!     .agent_radius(0.3)
//!     .perception_radius(5.0)
//!     .spawn(10, &mut rng)
//!     .unwrap();
//!
//! assert_eq!(population.len(), 10);
//! ```

use tracing::{debug, info};

use tp_core::{AgentId, Position, SimConfig, SimRng};

use crate::{Agent, AgentError, AgentResult, CollisionChecker, Population};

/// Fluent builder that places agents uniformly at random on a
/// `[0, width] × [0, height]` map without overlaps.
///
/// Agent 0 goes anywhere; each later agent is re-sampled until it is clear of
/// every agent already placed.  Sampling is capped at `max_attempts` per
/// agent so an over-full map fails with
/// [`AgentError::PopulationTooDense`] instead of looping forever.
#[derive(Clone, Debug)]
pub struct Spawner {
    width:             f64,
    height:            f64,
    agent_radius:      f64,
    perception_radius: f64,
    history_len:       usize,
    max_attempts:      u32,
    checker:           CollisionChecker,
}

impl Spawner {
    /// Spawner for a `width × height` map.  Perception defaults to the map
    /// diagonal (everyone sees everyone).
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            agent_radius:      0.3,
            perception_radius: width.hypot(height),
            history_len:       5,
            max_attempts:      10_000,
            checker:           CollisionChecker::default(),
        }
    }

    /// Spawner with every knob taken from `config`.
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.map_width, config.map_height)
            .agent_radius(config.agent_radius)
            .perception_radius(config.effective_perception_radius())
            .history_len(config.history_len)
            .max_attempts(config.max_spawn_attempts)
            .min_separation(config.min_separation)
    }

    pub fn agent_radius(mut self, radius: f64) -> Self {
        self.agent_radius = radius;
        self
    }

    pub fn perception_radius(mut self, radius: f64) -> Self {
        self.perception_radius = radius;
        self
    }

    pub fn history_len(mut self, len: usize) -> Self {
        self.history_len = len;
        self
    }

    /// Cap on rejected samples per agent.  At least one sample is always drawn.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn min_separation(mut self, clearance: f64) -> Self {
        self.checker = CollisionChecker::new(clearance);
        self
    }

    /// Place `count` agents with ids `0..count`.
    pub fn spawn(&self, count: usize, rng: &mut SimRng) -> AgentResult<Population> {
        let mut placed: Vec<Agent> = Vec::with_capacity(count);

        for i in 0..count as u32 {
            let id = AgentId(i);
            let mut attempts = 0;
            let agent = loop {
                if attempts == self.max_attempts {
                    return Err(AgentError::PopulationTooDense { id, attempts });
                }
                attempts += 1;

                let candidate = self.make_agent(id, self.random_position(rng));
                let clear = placed
                    .iter()
                    .all(|other| !self.checker.in_collision(&candidate, other));
                if clear {
                    break candidate;
                }
            };
            debug!(agent = %agent, attempts, "spawned agent");
            placed.push(agent);
        }

        info!(
            count,
            width = self.width,
            height = self.height,
            "population created"
        );
        Population::from_agents(placed)
    }

    fn random_position(&self, rng: &mut SimRng) -> Position {
        Position::new(
            rng.gen_range(0.0..=self.width),
            rng.gen_range(0.0..=self.height),
        )
    }

    fn make_agent(&self, id: AgentId, position: Position) -> Agent {
        Agent::new(
            id,
            position,
            self.perception_radius,
            self.agent_radius,
            self.history_len,
        )
    }
}
