//! Logs each message in before() and the outcome in after(); always continues.

use async_trait::async_trait;
use tracing::{debug, instrument};
use world_core::{Handler, HandlerResponse, Message, Result};

pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        debug!(
            user_id = message.user.id,
            username = %message.user.username.as_deref().unwrap_or("unknown"),
            is_command = message.is_command(),
            "step: handling message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        let outcome = match response {
            HandlerResponse::Reply(_) => "replied",
            HandlerResponse::Stop => "stopped",
            HandlerResponse::Continue => "unhandled",
        };
        debug!(
            user_id = message.user.id,
            message_id = %message.id,
            outcome,
            "Processed message"
        );
        Ok(())
    }
}
