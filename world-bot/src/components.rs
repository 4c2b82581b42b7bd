//! Component factory: opens the stores, builds the agent registry and assembles the handler chain.
//! Isolates assembly logic from runner so tests can wire the same chain around a mock bot.

use agents::AgentRegistry;
use anyhow::Result;
use handler_chain::HandlerChain;
use services::{SessionStore, UserStore};
use std::sync::Arc;
use std::time::Duration;
use storage::{AuditDao, AuditRepository};
use tracing::{error, info, instrument};
use world_core::Bot;

use crate::flows::OnboardingFlow;
use crate::handlers::{EchoHandler, HelpHandler, LoggingHandler};

/// Shared dependencies of the flows and handlers; produced once at startup.
#[derive(Clone)]
pub struct BotComponents {
    pub audit: Arc<AuditRepository>,
    pub sessions: Arc<SessionStore>,
    pub users: Arc<UserStore>,
    pub agents: Arc<AgentRegistry>,
}

/// Options for [`build_handler_chain`] that do not come from the components.
#[derive(Debug, Clone, Copy)]
pub struct ChainOptions {
    pub enable_echo: bool,
    pub agent_timeout: Duration,
}

/// Opens the audit database and the profile file and builds the default agent registry.
#[instrument]
pub async fn build_bot_components(
    database_url: &str,
    user_store_path: &str,
) -> Result<BotComponents> {
    let audit = Arc::new(AuditRepository::new(database_url).await.map_err(|e| {
        error!(error = %e, database_url = %database_url, "Failed to initialize audit storage");
        anyhow::anyhow!("Failed to initialize audit storage: {}", e)
    })?);

    let users = Arc::new(UserStore::open(user_store_path).await.map_err(|e| {
        error!(error = %e, path = %user_store_path, "Failed to open user store");
        anyhow::anyhow!("Failed to open user store: {}", e)
    })?);

    let agents = Arc::new(AgentRegistry::with_defaults());
    info!(agents = ?agents.names(), "Agent registry ready");

    Ok(BotComponents {
        audit,
        sessions: Arc::new(SessionStore::new()),
        users,
        agents,
    })
}

/// Chain order: logging → onboarding flow → /help → /echo (dev only).
pub fn build_handler_chain(
    components: &BotComponents,
    bot: Arc<dyn Bot>,
    options: ChainOptions,
) -> HandlerChain {
    let audit: Arc<dyn AuditDao> = components.audit.clone();
    let onboarding = OnboardingFlow::new(
        bot.clone(),
        components.sessions.clone(),
        components.users.clone(),
        audit,
        components.agents.clone(),
    )
    .with_agent_timeout(options.agent_timeout);

    let mut chain = HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(onboarding))
        .add_handler(Arc::new(HelpHandler::new(bot.clone())));

    if options.enable_echo {
        chain = chain.add_handler(Arc::new(EchoHandler::new(bot)));
    }

    info!(handlers = chain.len(), echo = options.enable_echo, "Handler chain built");
    chain
}
