use crate::agent::{text_field, Agent, AgentInput, AgentOutput};
use crate::error::AgentError;
use crate::tools::{safe_trim, DEFAULT_TRIM_LIMIT};
use async_trait::async_trait;
use serde_json::json;

/// Supplementary reply for the onboarding flow.
///
/// Stub: echoes the chosen `mode` and the trimmed `user_message` with a fixed confidence.
/// Swap the body for an LLM call once one is wired in.
#[derive(Debug, Clone, Default)]
pub struct OnboardingAgent;

impl OnboardingAgent {
    pub const NAME: &'static str = "onboarding";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for OnboardingAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, input: &AgentInput) -> Result<AgentOutput, AgentError> {
        let user_message = safe_trim(&text_field(input, "user_message"), DEFAULT_TRIM_LIMIT);
        let mode = text_field(input, "mode");
        let reply = format!("[onboarding agent stub]\nmode={mode}\nyou said: {user_message}");

        let mut output = AgentOutput::new();
        output.insert("reply".to_string(), json!(reply));
        output.insert("confidence".to_string(), json!(0.5));
        Ok(output)
    }
}
