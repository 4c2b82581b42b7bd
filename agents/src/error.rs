use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Agent not found: {0}")]
    NotFound(String),
    #[error("Agent {agent} failed: {reason}")]
    Failed { agent: String, reason: String },
    #[error("Agent {0} timed out")]
    Timeout(String),
}
