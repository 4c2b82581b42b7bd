use crate::agent::{text_field, Agent, AgentInput, AgentOutput};
use crate::error::AgentError;
use crate::tools::{safe_trim, DEFAULT_TRIM_LIMIT};
use async_trait::async_trait;
use serde_json::json;

/// General-purpose agent. Stub: echoes the trimmed `user_message`.
#[derive(Debug, Clone, Default)]
pub struct ControlAgent;

impl ControlAgent {
    pub const NAME: &'static str = "control";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for ControlAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, input: &AgentInput) -> Result<AgentOutput, AgentError> {
        let user_message = safe_trim(&text_field(input, "user_message"), DEFAULT_TRIM_LIMIT);

        let mut output = AgentOutput::new();
        output.insert(
            "reply".to_string(),
            json!(format!("[control agent stub]\nyou said: {user_message}")),
        );
        output.insert("confidence".to_string(), json!(0.5));
        Ok(output)
    }
}
