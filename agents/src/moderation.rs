use crate::agent::{Agent, AgentInput, AgentOutput};
use crate::error::AgentError;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Content check on `text`. Placeholder: never blocks. Keyword lists or a policy model go here.
#[derive(Debug, Clone, Default)]
pub struct ModerationAgent;

impl ModerationAgent {
    pub const NAME: &'static str = "moderation";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for ModerationAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, _input: &AgentInput) -> Result<AgentOutput, AgentError> {
        let mut output = AgentOutput::new();
        output.insert("blocked".to_string(), json!(false));
        output.insert("reason".to_string(), Value::Null);
        Ok(output)
    }
}
