//! Triplet dependencies and the graph that owns them.
//!
//! # Lifecycle
//!
//! ```text
//! build()    — once, over every agent:
//!                ≥ 2 visible → Dependency(root, a, b), agent stays Root
//!                otherwise   → agent marked NonRoot
//! promote()  — every tick, over the NonRoot set only:
//!                ≥ 2 visible → new Dependency appended, agent marked Root
//! ```
//!
//! `from_dependencies()` replaces `build()` when the wiring is already known,
//! e.g. when replaying a recorded `dependencies.csv` frame.
//!
//! Dependencies are plain id triples.  Once created they are never removed
//! or rewired, even if the parents later drift out of sight, and the NonRoot
//! set only ever shrinks.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, info, warn};

use tp_agent::Population;
use tp_core::{AgentId, SimRng};

use crate::VisibilityIndex;

/// "`root` positions itself relative to `parent_a` and `parent_b`."
///
/// All three ids are distinct.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dependency {
    pub root:     AgentId,
    pub parent_a: AgentId,
    pub parent_b: AgentId,
}

impl Dependency {
    pub fn parents(&self) -> (AgentId, AgentId) {
        (self.parent_a, self.parent_b)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ({}, {})", self.root.0, self.parent_a.0, self.parent_b.0)
    }
}

/// The current dependencies of a run plus the set of NonRoot agents.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    dependencies: Vec<Dependency>,
    non_root:     BTreeSet<AgentId>,
}

impl DependencyGraph {
    /// Build the initial graph over every agent, using current positions.
    ///
    /// Agents that see at least two others get a dependency on two of them
    /// chosen uniformly at random; the rest are marked NonRoot.  Agents are
    /// visited in population order so the RNG draws are reproducible.
    pub fn build(population: &mut Population, rng: &mut SimRng) -> Self {
        let index = VisibilityIndex::build(population);
        let ids: Vec<AgentId> = population.ids().collect();

        let mut graph = Self::default();
        for id in ids {
            let visible = index.visible_from(population.agent(id));
            match rng.choose_two(&visible) {
                Some((parent_a, parent_b)) => {
                    population.agent_mut(id).mark_root();
                    graph.dependencies.push(Dependency { root: id, parent_a, parent_b });
                }
                None => {
                    population.agent_mut(id).mark_non_root();
                    graph.non_root.insert(id);
                }
            }
        }

        info!(
            dependencies = graph.dependencies.len(),
            non_root = graph.non_root.len(),
            "dependency graph built"
        );
        graph
    }

    /// Wire the graph by hand instead of sampling parents.
    ///
    /// Every agent named as a root is marked Root; all other agents are marked
    /// NonRoot and become promotion candidates.  Visibility is not checked and
    /// no random numbers are drawn.  Entries that name an unknown agent, reuse
    /// an id within the triple, or give a root a second dependency are skipped.
    pub fn from_dependencies(population: &mut Population, dependencies: Vec<Dependency>) -> Self {
        let mut graph = Self::default();
        let mut roots = BTreeSet::new();
        for dep in dependencies {
            let Dependency { root, parent_a, parent_b } = dep;
            let known = [root, parent_a, parent_b].iter().all(|&id| population.contains(id));
            let distinct = root != parent_a && root != parent_b && parent_a != parent_b;
            if !known || !distinct || !roots.insert(root) {
                warn!(dependency = %dep, "skipping invalid dependency");
                continue;
            }
            graph.dependencies.push(dep);
        }

        let ids: Vec<AgentId> = population.ids().collect();
        for id in ids {
            if roots.contains(&id) {
                population.agent_mut(id).mark_root();
            } else {
                population.agent_mut(id).mark_non_root();
                graph.non_root.insert(id);
            }
        }

        info!(
            dependencies = graph.dependencies.len(),
            non_root = graph.non_root.len(),
            "dependency graph wired"
        );
        graph
    }

    /// Re-check every NonRoot agent against current positions and promote
    /// those that now see at least two others.
    ///
    /// Returns the dependencies created by this sweep, in ascending root id
    /// order.
    pub fn promote(&mut self, population: &mut Population, rng: &mut SimRng) -> Vec<Dependency> {
        if self.non_root.is_empty() {
            return Vec::new();
        }

        let index = VisibilityIndex::build(population);
        let candidates: Vec<AgentId> = self.non_root.iter().copied().collect();

        let mut promoted = Vec::new();
        for id in candidates {
            let visible = index.visible_from(population.agent(id));
            let Some((parent_a, parent_b)) = rng.choose_two(&visible) else {
                continue;
            };
            let dep = Dependency { root: id, parent_a, parent_b };
            self.non_root.remove(&id);
            population.agent_mut(id).mark_root();
            self.dependencies.push(dep);
            debug!(dependency = %dep, "promoted to root");
            promoted.push(dep);
        }
        promoted
    }

    /// All dependencies, in creation order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Ids currently classified NonRoot.
    pub fn non_root(&self) -> &BTreeSet<AgentId> {
        &self.non_root
    }

    pub fn is_non_root(&self, id: AgentId) -> bool {
        self.non_root.contains(&id)
    }

    /// The dependency whose root is `id`, if any.
    pub fn dependency_of(&self, id: AgentId) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.root == id)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}
