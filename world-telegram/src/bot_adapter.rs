//! Wraps teloxide::Bot and implements [`world_core::Bot`]. Production code sends messages via Telegram;
//! tests substitute another Bot impl.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};
use world_core::{Bot as CoreBot, BotError, Chat, ReplyKeyboard, Result};

/// Thin wrapper around teloxide::Bot that implements world-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

/// Maps a core keyboard to Telegram reply markup. `None` means "leave the keyboard alone".
pub fn to_reply_markup(keyboard: &ReplyKeyboard) -> Option<ReplyMarkup> {
    match keyboard {
        ReplyKeyboard::None => None,
        ReplyKeyboard::Choices(rows) => {
            let buttons: Vec<Vec<KeyboardButton>> = rows
                .iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect())
                .collect();
            Some(ReplyMarkup::Keyboard(
                KeyboardMarkup::new(buttons)
                    .resize_keyboard()
                    .one_time_keyboard(),
            ))
        }
        ReplyKeyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str, keyboard: &ReplyKeyboard) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(chat.id), text.to_string());
        if let Some(markup) = to_reply_markup(keyboard) {
            request = request.reply_markup(markup);
        }
        request.await.map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }
}
