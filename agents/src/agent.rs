//! Agent trait and the structured input/output maps.

use crate::error::AgentError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Structured agent input.
pub type AgentInput = Map<String, Value>;
/// Structured agent output.
pub type AgentOutput = Map<String, Value>;

/// A named, transport-free handler.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Name the agent registers under by default.
    fn name(&self) -> &str;

    async fn run(&self, input: &AgentInput) -> Result<AgentOutput, AgentError>;
}

/// Builds an [`AgentInput`] from key/value pairs.
pub fn input<I, K, V>(pairs: I) -> AgentInput
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Reads a field as text; non-string values are rendered as JSON, missing fields as "".
pub(crate) fn text_field(input: &AgentInput, key: &str) -> String {
    match input.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
