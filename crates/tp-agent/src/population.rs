//! `Population` — the ordered agent collection of one run.
//!
//! # Why an index map?
//!
//! Dependencies refer to agents by [`AgentId`], never by reference, so the
//! population stays the single owner of position state and the driver can
//! mutate one agent while holding copies of its parents' positions.  The
//! id → slot map makes those lookups O(1) without assuming ids are dense.
//!
//! Agents are neither added nor removed after construction.

use tp_core::{AgentId, Position};

use crate::{Agent, AgentError, AgentResult};

#[cfg(feature = "fx-hash")]
type SlotIndex = rustc_hash::FxHashMap<AgentId, usize>;
#[cfg(not(feature = "fx-hash"))]
type SlotIndex = std::collections::HashMap<AgentId, usize>;

/// Id-unique, ordered collection of [`Agent`]s.
#[derive(Clone, Debug)]
pub struct Population {
    agents: Vec<Agent>,
    slots:  SlotIndex,
}

impl Population {
    /// Assemble a population from already-built agents, keeping their order.
    pub fn from_agents(agents: Vec<Agent>) -> AgentResult<Self> {
        let mut slots = SlotIndex::default();
        for (slot, agent) in agents.iter().enumerate() {
            if slots.insert(agent.id, slot).is_some() {
                return Err(AgentError::DuplicateId(agent.id));
            }
        }
        Ok(Self { agents, slots })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents in spawn order.
    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    /// Ids in spawn order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.iter().map(|a| a.id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.slots.get(&id).map(|&slot| &self.agents[slot])
    }

    /// The agent with `id`.
    ///
    /// # Panics
    /// Panics if `id` is not part of this population.  Ids are generated by
    /// the spawner and never come from outside, so a miss is a bug.
    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[self.slots[&id]]
    }

    /// Mutable access to the agent with `id`.
    ///
    /// # Panics
    /// Same contract as [`agent`](Self::agent).
    pub fn agent_mut(&mut self, id: AgentId) -> &mut Agent {
        let slot = self.slots[&id];
        &mut self.agents[slot]
    }

    /// Current position of the agent with `id`.
    ///
    /// # Panics
    /// Same contract as [`agent`](Self::agent).
    #[inline]
    pub fn position(&self, id: AgentId) -> Position {
        self.agent(id).position()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}
