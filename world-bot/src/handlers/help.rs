use async_trait::async_trait;
use std::sync::Arc;
use world_core::{Bot, Handler, HandlerResponse, Message, Result};

pub const HELP_TEXT: &str = "/start - 启动\n/help - 帮助\n/echo <text> - 回显测试\n";

/// Answers `/help` with the command list.
pub struct HelpHandler {
    bot: Arc<dyn Bot>,
}

impl HelpHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match message.command() {
            Some(("help", _)) => {
                self.bot.reply_to(message, HELP_TEXT).await?;
                Ok(HandlerResponse::Reply(HELP_TEXT.to_string()))
            }
            _ => Ok(HandlerResponse::Continue),
        }
    }
}
