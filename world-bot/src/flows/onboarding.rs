//! Onboarding conversation: `/start` → choose mode → confirm → commit.
//!
//! 状态机：`ChooseMode` → `Confirm` → 结束。任一状态下 `取消` 或 `/cancel` 结束会话且不写任何持久数据。
//! 确认提交时按顺序执行：占用幂等 key → 写审计事件 → upsert 用户资料 → 调用 onboarding agent（可失败）
//! → 清理 session。存储失败直接向上返回，会话保持在 `Confirm`；幂等 key 已占用后的失败只能用
//! `repair-idempotency` 恢复。
//! 每个用户同时只有一个会话，绑定在发起 `/start` 的 chat 上；其他 chat 的消息不会被会话消费。

use agents::{AgentError, AgentRegistry, OnboardingAgent};
use async_trait::async_trait;
use serde_json::Value;
use services::{SessionStore, UserProfile, UserStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storage::AuditDao;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use world_core::{Bot, BotError, Handler, HandlerResponse, Message, ReplyKeyboard, Result};

pub const LABEL_NEW_USER: &str = "新用户模式";
pub const LABEL_MIGRATION: &str = "老用户迁移";
pub const LABEL_CONFIRM: &str = "确认提交";
pub const LABEL_CANCEL: &str = "取消";

pub const PROMPT_CHOOSE_MODE: &str = "请选择模式：";
pub const PROMPT_INVALID_MODE: &str = "请选择键盘上的选项。";
pub const PROMPT_INVALID_CONFIRM: &str = "请选择键盘上的按钮。";
pub const REPLY_CANCELLED: &str = "已取消。";
pub const REPLY_ALREADY_PROCESSED: &str = "这个提交已处理过。";
pub const REPLY_DONE: &str = "✅ 已完成设置。";
pub const REPLY_SESSION_EXPIRED: &str = "会话已过期，请发送 /start 重新开始。";

/// Audit event written once per accepted submission.
pub const SUBMIT_EVENT: &str = "onboarding_submit";

const MODE_KEY: &str = "mode";
const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Onboarding mode offered on the first keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    NewUser,
    Migration,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::NewUser => LABEL_NEW_USER,
            Mode::Migration => LABEL_MIGRATION,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            LABEL_NEW_USER => Some(Mode::NewUser),
            LABEL_MIGRATION => Some(Mode::Migration),
            _ => None,
        }
    }
}

/// Active conversation step. No entry in the state map means no conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingState {
    ChooseMode,
    Confirm,
}

/// One user's conversation. Only messages from the chat it started in drive it.
#[derive(Debug, Clone, Copy)]
struct Conversation {
    chat_id: i64,
    state: OnboardingState,
}

pub fn mode_keyboard() -> ReplyKeyboard {
    ReplyKeyboard::choices(&[&[LABEL_NEW_USER, LABEL_MIGRATION], &[LABEL_CANCEL]])
}

pub fn confirm_keyboard() -> ReplyKeyboard {
    ReplyKeyboard::choices(&[&[LABEL_CONFIRM], &[LABEL_CANCEL]])
}

/// Idempotency key of one user's submission for `mode`.
pub fn idempotency_key(user_id: i64, mode: &str) -> String {
    format!("{}:{}:{}", SUBMIT_EVENT, user_id, mode)
}

pub struct OnboardingFlow {
    bot: Arc<dyn Bot>,
    sessions: Arc<SessionStore>,
    users: Arc<UserStore>,
    audit: Arc<dyn AuditDao>,
    agents: Arc<AgentRegistry>,
    agent_timeout: Duration,
    conversations: RwLock<HashMap<i64, Conversation>>,
}

impl OnboardingFlow {
    pub fn new(
        bot: Arc<dyn Bot>,
        sessions: Arc<SessionStore>,
        users: Arc<UserStore>,
        audit: Arc<dyn AuditDao>,
        agents: Arc<AgentRegistry>,
    ) -> Self {
        Self {
            bot,
            sessions,
            users,
            audit,
            agents,
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
            conversations: RwLock::new(HashMap::new()),
        }
    }

    /// Upper bound for the supplementary agent call.
    pub fn with_agent_timeout(mut self, agent_timeout: Duration) -> Self {
        self.agent_timeout = agent_timeout;
        self
    }

    /// Current step of the user's conversation, `None` when there is none.
    pub async fn state(&self, user_id: i64) -> Option<OnboardingState> {
        self.conversation(user_id).await.map(|c| c.state)
    }

    /// Chat the user's active conversation is bound to.
    pub async fn conversation_chat(&self, user_id: i64) -> Option<i64> {
        self.conversation(user_id).await.map(|c| c.chat_id)
    }

    async fn conversation(&self, user_id: i64) -> Option<Conversation> {
        self.conversations.read().await.get(&user_id).copied()
    }

    async fn set_state(&self, message: &Message, state: OnboardingState) {
        let conversation = Conversation {
            chat_id: message.chat.id,
            state,
        };
        self.conversations
            .write()
            .await
            .insert(message.user.id, conversation);
    }

    /// Ends the conversation and drops its session.
    async fn finish(&self, user_id: i64) {
        self.conversations.write().await.remove(&user_id);
        self.sessions.clear(user_id).await;
    }

    async fn reply(
        &self,
        message: &Message,
        text: &str,
        keyboard: ReplyKeyboard,
    ) -> Result<HandlerResponse> {
        self.bot
            .send_message(&message.chat, text, &keyboard)
            .await?;
        Ok(HandlerResponse::Reply(text.to_string()))
    }

    async fn start(&self, message: &Message) -> Result<HandlerResponse> {
        let user_id = message.user.id;
        info!(user_id, "step: onboarding start");
        self.sessions.clear(user_id).await;
        self.set_state(message, OnboardingState::ChooseMode).await;
        self.reply(message, PROMPT_CHOOSE_MODE, mode_keyboard()).await
    }

    async fn cancel(&self, message: &Message) -> Result<HandlerResponse> {
        let user_id = message.user.id;
        info!(user_id, "step: onboarding cancelled");
        self.finish(user_id).await;
        self.reply(message, REPLY_CANCELLED, ReplyKeyboard::Remove)
            .await
    }

    async fn choose_mode(&self, message: &Message, choice: &str) -> Result<HandlerResponse> {
        let Some(mode) = Mode::from_label(choice) else {
            return self
                .reply(message, PROMPT_INVALID_MODE, mode_keyboard())
                .await;
        };

        let user_id = message.user.id;
        info!(user_id, mode = mode.label(), "step: onboarding mode chosen");
        self.sessions
            .set_value(user_id, MODE_KEY, mode.label())
            .await;
        self.set_state(message, OnboardingState::Confirm).await;

        let text = format!("你选择了：{}\n\n确认提交？", mode.label());
        self.reply(message, &text, confirm_keyboard()).await
    }

    async fn confirm(&self, message: &Message, choice: &str) -> Result<HandlerResponse> {
        if choice != LABEL_CONFIRM {
            return self
                .reply(message, PROMPT_INVALID_CONFIRM, confirm_keyboard())
                .await;
        }

        let user_id = message.user.id;
        let mode = self
            .sessions
            .get_value(user_id, MODE_KEY)
            .await
            .and_then(|v| v.as_str().map(str::to_string));

        let text = match mode {
            Some(mode) => self.commit(message, &mode).await?,
            None => {
                warn!(user_id, "Confirmation without a chosen mode, ending conversation");
                REPLY_SESSION_EXPIRED.to_string()
            }
        };

        self.finish(user_id).await;
        self.reply(message, &text, ReplyKeyboard::Remove).await
    }

    /// Runs the submission side effects and returns the reply text. Leaves state and session
    /// untouched; the caller ends the conversation only when this returns `Ok`.
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn commit(&self, message: &Message, mode: &str) -> Result<String> {
        let user_id = message.user.id;
        let key = idempotency_key(user_id, mode);

        let acquired = self
            .audit
            .try_acquire_idempotency(&key)
            .await
            .map_err(|e| {
                error!(error = %e, user_id, key = %key, "Failed to acquire idempotency key");
                BotError::Database(e.to_string())
            })?;
        if !acquired {
            info!(user_id, key = %key, "step: submission already processed");
            return Ok(REPLY_ALREADY_PROCESSED.to_string());
        }

        let payload = format!("mode={}", mode);
        self.audit
            .log_event(user_id, SUBMIT_EVENT, Some(&payload))
            .await
            .map_err(|e| {
                error!(error = %e, user_id, "Failed to log submission event");
                BotError::Database(e.to_string())
            })?;

        let profile = match self.users.get(user_id).await {
            Some(profile) => profile,
            None => UserProfile::new(
                user_id,
                message.user.username.clone(),
                message.user.first_name.clone(),
            ),
        };
        self.users.upsert(profile).await.map_err(|e| {
            error!(error = %e, user_id, "Failed to save user profile");
            BotError::Store(e.to_string())
        })?;

        let mut text = REPLY_DONE.to_string();
        match self.supplementary_reply(mode).await {
            Ok(Some(agent_reply)) => {
                text.push_str("\n\n");
                text.push_str(&agent_reply);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, user_id, "Onboarding agent failed, replying without it"),
        }

        info!(user_id, mode = %mode, "step: submission committed");
        Ok(text)
    }

    /// Asks the `onboarding` agent for extra text. Empty or missing replies yield `None`.
    async fn supplementary_reply(
        &self,
        mode: &str,
    ) -> std::result::Result<Option<String>, AgentError> {
        let agent = self.agents.get(OnboardingAgent::NAME)?;
        let input = agents::input([(MODE_KEY, mode)]);

        let output = tokio::time::timeout(self.agent_timeout, agent.run(&input))
            .await
            .map_err(|_| AgentError::Timeout(OnboardingAgent::NAME.to_string()))??;

        let reply = match output.get("reply") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        Ok(reply.filter(|s| !s.is_empty()))
    }
}

#[async_trait]
impl Handler for OnboardingFlow {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let user_id = message.user.id;
        let conversation = self.conversation(user_id).await;

        if let Some(active) = conversation {
            if active.chat_id != message.chat.id {
                debug!(
                    user_id,
                    chat_id = message.chat.id,
                    active_chat_id = active.chat_id,
                    "Message outside the chat of the active conversation"
                );
                return Ok(HandlerResponse::Continue);
            }
        }
        let state = conversation.map(|c| c.state);

        if let Some((command, _)) = message.command() {
            return match (command, state) {
                ("start", None) => self.start(message).await,
                ("cancel", Some(_)) => self.cancel(message).await,
                _ => Ok(HandlerResponse::Continue),
            };
        }

        let Some(state) = state else {
            return Ok(HandlerResponse::Continue);
        };

        let choice = message.content.trim();
        if choice == LABEL_CANCEL {
            return self.cancel(message).await;
        }

        match state {
            OnboardingState::ChooseMode => self.choose_mode(message, choice).await,
            OnboardingState::Confirm => self.confirm(message, choice).await,
        }
    }
}
