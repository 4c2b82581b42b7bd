//! Outer error handler: anything a handler chain fails with ends up here.

use tracing::{error, warn};
use world_core::{Bot, BotError, Message, ReplyKeyboard};

/// Text sent to the user when their update could not be processed.
pub const FAILURE_NOTICE: &str = "⚠️ 出错了，我这边记录一下。";

/// Logs the failure and tells the user, best effort. A failure to send the notice is logged and dropped.
pub async fn report_failure(bot: &dyn Bot, message: &Message, err: &BotError) {
    error!(
        error = %err,
        user_id = message.user.id,
        chat_id = message.chat.id,
        message_id = %message.id,
        "Unhandled error"
    );

    if let Err(notify_err) = bot
        .send_message(&message.chat, FAILURE_NOTICE, &ReplyKeyboard::None)
        .await
    {
        warn!(error = %notify_err, chat_id = message.chat.id, "Failed to send failure notice");
    }
}
