//! Shared test helpers: recording [`MockBot`], message builder and temp-dir backed components.

#![allow(dead_code)]

use chrono::Utc;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use world_bot::{build_bot_components, BotComponents};
use world_core::{Bot, BotError, Chat, Message, ReplyKeyboard, Result, User};

/// One recorded `send_message` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: ReplyKeyboard,
}

/// Mock Bot that records every outgoing message. With `failing()` every send returns an error.
#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<SentMessage>>,
    fail: bool,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<SentMessage> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str, keyboard: &ReplyKeyboard) -> Result<()> {
        if self.fail {
            return Err(BotError::Bot("send failed".to_string()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id: chat.id,
            text: text.to_string(),
            keyboard: keyboard.clone(),
        });
        Ok(())
    }
}

/// Private-chat text message from `user_id` (username `alice`, first name `Alice`).
pub fn text_message(user_id: i64, content: &str) -> Message {
    text_message_in(user_id, user_id, content)
}

/// Text message from `user_id` posted in `chat_id`; negative ids are groups.
pub fn text_message_in(user_id: i64, chat_id: i64, content: &str) -> Message {
    let chat_type = if chat_id < 0 { "group" } else { "private" };
    Message {
        id: format!("{}-{}", user_id, content.len()),
        user: User {
            id: user_id,
            username: Some("alice".to_string()),
            first_name: Some("Alice".to_string()),
        },
        chat: Chat {
            id: chat_id,
            chat_type: chat_type.to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

/// Components on a temp-file SQLite database and a temp `users.json`. Keep the dir alive.
pub async fn temp_components() -> (TempDir, BotComponents) {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("bot.db");
    let users = dir.path().join("data").join("users.json");
    let components = build_bot_components(
        db.to_str().expect("utf-8 path"),
        users.to_str().expect("utf-8 path"),
    )
    .await
    .expect("components");
    (dir, components)
}
