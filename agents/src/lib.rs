//! # agents
//!
//! Named handlers that take a structured input map and return a structured output map. Agents
//! never talk to the transport; flows call them and decide what to send.
//!
//! - [`Agent`] – the single `run(input) -> output` capability
//! - [`AgentRegistry`] – name → agent, built once at startup and passed around explicitly
//! - [`OnboardingAgent`], [`ControlAgent`], [`ModerationAgent`] – deterministic stubs
//! - [`AgentMemory`] – per-agent conversation history buffer
//! - [`tools`] – helpers shared by agents

mod agent;
mod control;
mod error;
mod memory;
mod moderation;
mod onboarding;
mod registry;
pub mod tools;

pub use agent::{input, Agent, AgentInput, AgentOutput};
pub use control::ControlAgent;
pub use error::AgentError;
pub use memory::{AgentMemory, MemoryItem};
pub use moderation::ModerationAgent;
pub use onboarding::OnboardingAgent;
pub use registry::AgentRegistry;
