//! REPL 运行：将 teloxide 消息转为 core::Message 后交给 HandlerChain 处理。
//! teloxide 的 Dispatcher 按 chat 串行分发更新；这里直接 await chain（不 spawn），保证同一会话内的消息按顺序处理。

use anyhow::Result;
use handler_chain::HandlerChain;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info, instrument};
use world_core::{Bot as CoreBot, ToCoreMessage};

use super::adapters::TelegramMessageWrapper;
use super::errors::report_failure;

/// 使用给定的 teloxide Bot 与 HandlerChain 启动 REPL。
/// 每条文本消息转为 core::Message 后交给 chain.handle；失败交给 report_failure（记录日志并尽力通知用户）。
#[instrument(skip(bot, handler_chain, reply_bot))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    reply_bot: Arc<dyn CoreBot>,
) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot identity resolved");
        }
    }

    teloxide::repl(bot, move |msg: teloxide::types::Message| {
        let chain = handler_chain.clone();
        let reply_bot = reply_bot.clone();

        async move {
            let wrapper = TelegramMessageWrapper(&msg);
            if wrapper.sender().is_none() || msg.text().is_none() {
                debug!(chat_id = msg.chat.id.0, "Skipping update without sender or text");
                return respond(());
            }

            let core_msg = wrapper.to_core();
            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                message_content = %core_msg.content,
                "Received message"
            );

            if let Err(e) = chain.handle(&core_msg).await {
                report_failure(reply_bot.as_ref(), &core_msg, &e).await;
            }

            respond(())
        }
    })
    .await;

    Ok(())
}
