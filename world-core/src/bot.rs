//! Bot abstraction for sending replies.
//!
//! [`Bot`] is transport-agnostic; world-telegram implements it via teloxide. Flows describe the
//! keyboard they want with [`ReplyKeyboard`] and never touch the transport's markup types.

use crate::error::Result;
use crate::types::{Chat, Message};
use async_trait::async_trait;

/// Keyboard attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplyKeyboard {
    /// Leave whatever keyboard the client currently shows.
    #[default]
    None,
    /// Fixed-choice keyboard, one inner vec per row. Shown once and resized to fit.
    Choices(Vec<Vec<String>>),
    /// Remove the custom keyboard.
    Remove,
}

impl ReplyKeyboard {
    /// Builds a [`ReplyKeyboard::Choices`] from string rows.
    pub fn choices(rows: &[&[&str]]) -> Self {
        Self::Choices(
            rows.iter()
                .map(|row| row.iter().map(|label| label.to_string()).collect())
                .collect(),
        )
    }
}

/// Abstraction for sending messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message with an optional keyboard to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str, keyboard: &ReplyKeyboard) -> Result<()>;

    /// Sends a plain reply into the chat of the given message.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text, &ReplyKeyboard::None)
            .await
    }
}
