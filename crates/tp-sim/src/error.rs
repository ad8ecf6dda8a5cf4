use thiserror::Error;
use tp_agent::AgentError;
use tp_core::CoreError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("spawn failed: {0}")]
    Spawn(#[from] AgentError),
}

pub type SimResult<T> = Result<T, SimError>;
