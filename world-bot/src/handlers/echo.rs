//! `/echo <text>` for connectivity checks. Registered only outside production.

use async_trait::async_trait;
use std::sync::Arc;
use world_core::{Bot, Handler, HandlerResponse, Message, Result};

pub const ECHO_USAGE: &str = "用法：/echo 你好";

pub struct EchoHandler {
    bot: Arc<dyn Bot>,
}

impl EchoHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(("echo", args)) = message.command() else {
            return Ok(HandlerResponse::Continue);
        };

        let words: Vec<&str> = args.split_whitespace().collect();
        let text = if words.is_empty() {
            ECHO_USAGE.to_string()
        } else {
            words.join(" ")
        };
        self.bot.reply_to(message, &text).await?;
        Ok(HandlerResponse::Reply(text))
    }
}
