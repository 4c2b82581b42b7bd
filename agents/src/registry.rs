//! Name → agent mapping.
//!
//! Built once at startup and shared as `Arc<AgentRegistry>`; there is no global registry.

use crate::agent::Agent;
use crate::control::ControlAgent;
use crate::error::AgentError;
use crate::moderation::ModerationAgent;
use crate::onboarding::OnboardingAgent;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in agents (`onboarding`, `control`, `moderation`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_agent(Arc::new(OnboardingAgent::new()));
        registry.register_agent(Arc::new(ControlAgent::new()));
        registry.register_agent(Arc::new(ModerationAgent::new()));
        registry
    }

    /// Registers `agent` under `name`, returning the agent it replaced, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        agent: Arc<dyn Agent>,
    ) -> Option<Arc<dyn Agent>> {
        let name = name.into();
        info!(agent = %name, "Registering agent");
        self.agents.insert(name, agent)
    }

    /// Registers `agent` under its own [`Agent::name`].
    pub fn register_agent(&mut self, agent: Arc<dyn Agent>) -> Option<Arc<dyn Agent>> {
        let name = agent.name().to_string();
        self.register(name, agent)
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Agent>, AgentError> {
        self.agents
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }
}
