//! Agent-subsystem error type.

use thiserror::Error;

use tp_core::AgentId;

/// Errors produced by `tp-agent`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("population too dense: no collision-free spot for {id} after {attempts} attempts")]
    PopulationTooDense { id: AgentId, attempts: u32 },

    #[error("duplicate agent id {0} in population")]
    DuplicateId(AgentId),
}

pub type AgentResult<T> = Result<T, AgentError>;
