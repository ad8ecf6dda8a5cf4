//! Fluent builder for constructing a [`Sim`].

use tracing::info;

use tp_agent::{Population, Spawner};
use tp_core::{SimConfig, SimRng, Tick};
use tp_graph::{Dependency, DependencyGraph};

use crate::sim::SimPhase;
use crate::{DeadlockWindow, Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — map size, tick budget, scenario, seed, …
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                          |
/// |--------------------|--------------------------------------------------|
/// | `.population(p)`   | Spawned from the config with the run's RNG       |
/// | `.dependencies(d)` | Sampled from what each agent sees at tick 0      |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .population(hand_placed)
///     .build()?;
/// let summary = sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder {
    config:       SimConfig,
    population:   Option<Population>,
    dependencies: Option<Vec<Dependency>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, population: None, dependencies: None }
    }

    /// Use a pre-built population instead of spawning one.
    ///
    /// Agent radii, perception radii, and history lengths are taken from the
    /// supplied agents as-is; the RNG is then only used for the dependency
    /// graph and the tick loop.
    pub fn population(mut self, population: Population) -> Self {
        self.population = Some(population);
        self
    }

    /// Wire the initial dependency graph by hand.
    ///
    /// Agents named as roots become Root, everyone else NonRoot; see
    /// [`DependencyGraph::from_dependencies`].  No random numbers are drawn for
    /// the graph, so with a supplied population the first draw is the tick-0
    /// shuffle.  Promotion still runs every tick.
    pub fn dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = Some(dependencies);
        self
    }

    /// Validate the configuration, spawn the population (unless one was
    /// supplied), build the initial dependency graph, and return a `Sim`
    /// ready to run.
    ///
    /// Fails fast on an invalid configuration: nothing is spawned.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let policy = self.config.policy()?;
        let mut rng = SimRng::new(self.config.seed);

        let mut population = match self.population {
            Some(p) => p,
            None => Spawner::from_config(&self.config)
                .spawn(self.config.effective_agent_count(), &mut rng)?,
        };

        let graph = match self.dependencies {
            Some(deps) => DependencyGraph::from_dependencies(&mut population, deps),
            None => DependencyGraph::build(&mut population, &mut rng),
        };

        info!(
            agents = population.len(),
            roots = graph.len(),
            non_root = graph.non_root().len(),
            %policy,
            seed = self.config.seed,
            "simulation initialized"
        );

        Ok(Sim {
            window:       DeadlockWindow::new(self.config.deadlock_window),
            config:       self.config,
            policy,
            population,
            graph,
            rng,
            current_tick: Tick::ZERO,
            last_order:   Vec::new(),
            phase:        SimPhase::Running,
            started:      false,
        })
    }
}
