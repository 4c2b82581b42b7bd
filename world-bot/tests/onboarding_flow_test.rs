//! Integration tests for the onboarding conversation ([`world_bot::OnboardingFlow`]).
//!
//! Each test runs the flow against a temp-file SQLite database, a temp `users.json` and a
//! recording [`MockBot`]; assertions are made on the sent messages and on what was persisted.

mod common;

use agents::{Agent, AgentError, AgentInput, AgentOutput, AgentRegistry};
use async_trait::async_trait;
use serde_json::json;
use services::UserProfile;
use std::sync::Arc;
use std::time::Duration;
use storage::{AuditDao, StorageError};
use tempfile::TempDir;
use world_bot::flows::onboarding::{
    confirm_keyboard, idempotency_key, mode_keyboard, LABEL_CANCEL, LABEL_CONFIRM,
    LABEL_MIGRATION, LABEL_NEW_USER, PROMPT_CHOOSE_MODE, PROMPT_INVALID_CONFIRM,
    PROMPT_INVALID_MODE, REPLY_ALREADY_PROCESSED, REPLY_CANCELLED, REPLY_DONE,
    REPLY_SESSION_EXPIRED, SUBMIT_EVENT,
};
use world_bot::{BotComponents, OnboardingFlow, OnboardingState};
use world_core::{Handler, HandlerResponse, ReplyKeyboard};

use common::{temp_components, text_message, text_message_in, MockBot};

const USER: i64 = 1001;

fn flow(components: &BotComponents, bot: Arc<MockBot>) -> OnboardingFlow {
    flow_with_agents(components, bot, components.agents.clone())
}

fn flow_with_agents(
    components: &BotComponents,
    bot: Arc<MockBot>,
    agents: Arc<AgentRegistry>,
) -> OnboardingFlow {
    let audit: Arc<dyn AuditDao> = components.audit.clone();
    OnboardingFlow::new(
        bot,
        components.sessions.clone(),
        components.users.clone(),
        audit,
        agents,
    )
    .with_agent_timeout(Duration::from_millis(200))
}

async fn send(flow: &OnboardingFlow, text: &str) -> HandlerResponse {
    flow.handle(&text_message(USER, text)).await.expect("flow step")
}

/// **Test: Full onboarding run commits exactly once.**
///
/// **Setup:** Fresh stores, default agent registry.
/// **Action:** `/start` → `新用户模式` → `确认提交`.
/// **Expected:** Prompts with the right keyboards; final reply is the success text plus the stub
/// agent reply; one event, one key, one profile; session and state gone.
#[tokio::test]
async fn test_full_onboarding_scenario() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    send(&flow, "/start").await;
    let sent = bot.last().unwrap();
    assert_eq!(sent.chat_id, USER);
    assert_eq!(sent.text, PROMPT_CHOOSE_MODE);
    assert_eq!(sent.keyboard, mode_keyboard());
    assert_eq!(flow.state(USER).await, Some(OnboardingState::ChooseMode));

    send(&flow, LABEL_NEW_USER).await;
    let sent = bot.last().unwrap();
    assert_eq!(sent.text, "你选择了：新用户模式\n\n确认提交？");
    assert_eq!(sent.keyboard, confirm_keyboard());
    assert_eq!(flow.state(USER).await, Some(OnboardingState::Confirm));
    assert_eq!(
        components.sessions.get_value(USER, "mode").await,
        Some(json!(LABEL_NEW_USER))
    );

    let response = send(&flow, LABEL_CONFIRM).await;
    let sent = bot.last().unwrap();
    assert!(sent.text.starts_with(REPLY_DONE));
    assert!(sent
        .text
        .contains("\n\n[onboarding agent stub]\nmode=新用户模式"));
    assert_eq!(sent.keyboard, ReplyKeyboard::Remove);
    assert_eq!(response, HandlerResponse::Reply(sent.text.clone()));
    assert_eq!(bot.count(), 3);

    assert_eq!(flow.state(USER).await, None);
    assert_eq!(components.sessions.get_value(USER, "mode").await, None);

    let key = idempotency_key(USER, LABEL_NEW_USER);
    assert!(components
        .audit
        .get_idempotency_key(&key)
        .await
        .unwrap()
        .is_some());

    let events = components.audit.recent_events(USER, 10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, SUBMIT_EVENT);
    assert_eq!(events[0].payload.as_deref(), Some("mode=新用户模式"));

    assert_eq!(
        components.users.get(USER).await,
        Some(UserProfile::new(
            USER,
            Some("alice".to_string()),
            Some("Alice".to_string())
        ))
    );
}

/// **Test: Replaying the same submission is reported, not repeated.**
///
/// **Setup:** One completed run for `新用户模式`.
/// **Action:** Run the whole conversation again with the same mode.
/// **Expected:** `这个提交已处理过。` with keyboard removal; still one event; the profile and
/// `users.json` are left exactly as they were before the replay; conversation ended.
#[tokio::test]
async fn test_replay_is_already_processed() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    for text in ["/start", LABEL_NEW_USER, LABEL_CONFIRM] {
        send(&flow, text).await;
    }

    let edited = UserProfile::new(USER, Some("renamed".to_string()), None);
    components.users.upsert(edited.clone()).await.unwrap();
    let file_before = std::fs::read_to_string(components.users.path()).unwrap();

    for text in ["/start", LABEL_NEW_USER, LABEL_CONFIRM] {
        send(&flow, text).await;
    }

    assert_eq!(components.users.get(USER).await, Some(edited));
    let file_after = std::fs::read_to_string(components.users.path()).unwrap();
    assert_eq!(file_after, file_before);

    let sent = bot.last().unwrap();
    assert_eq!(sent.text, REPLY_ALREADY_PROCESSED);
    assert_eq!(sent.keyboard, ReplyKeyboard::Remove);
    assert_eq!(flow.state(USER).await, None);
    assert_eq!(components.sessions.get_value(USER, "mode").await, None);
    assert_eq!(components.audit.recent_events(USER, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_other_mode_is_a_separate_submission() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    for text in ["/start", LABEL_NEW_USER, LABEL_CONFIRM] {
        send(&flow, text).await;
    }
    for text in ["/start", LABEL_MIGRATION, LABEL_CONFIRM] {
        send(&flow, text).await;
    }

    assert!(bot.last().unwrap().text.starts_with(REPLY_DONE));
    let events = components.audit.recent_events(USER, 10).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].payload.as_deref(), Some("mode=老用户迁移"));
}

/// **Test: Unknown input in ChooseMode re-prompts without touching the session.**
#[tokio::test]
async fn test_bad_input_in_choose_mode() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    send(&flow, "/start").await;
    send(&flow, "随便").await;

    let sent = bot.last().unwrap();
    assert_eq!(sent.text, PROMPT_INVALID_MODE);
    assert_eq!(sent.keyboard, mode_keyboard());
    assert_eq!(flow.state(USER).await, Some(OnboardingState::ChooseMode));
    assert_eq!(components.sessions.get_value(USER, "mode").await, None);
}

#[tokio::test]
async fn test_bad_input_in_confirm() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    send(&flow, "/start").await;
    send(&flow, LABEL_MIGRATION).await;
    send(&flow, "好的").await;

    let sent = bot.last().unwrap();
    assert_eq!(sent.text, PROMPT_INVALID_CONFIRM);
    assert_eq!(sent.keyboard, confirm_keyboard());
    assert_eq!(flow.state(USER).await, Some(OnboardingState::Confirm));
    assert_eq!(
        components.sessions.get_value(USER, "mode").await,
        Some(json!(LABEL_MIGRATION))
    );
    assert!(components.audit.recent_events(USER, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_input_is_trimmed() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    send(&flow, "/start").await;
    send(&flow, "  老用户迁移 \n").await;
    assert_eq!(flow.state(USER).await, Some(OnboardingState::Confirm));

    send(&flow, " 确认提交 ").await;
    assert!(bot.last().unwrap().text.starts_with(REPLY_DONE));
}

/// **Test: Cancel in either state ends the conversation without persistent writes.**
///
/// **Setup:** Fresh stores.
/// **Action:** Cancel with `取消` in ChooseMode; then cancel with `/cancel` in Confirm.
/// **Expected:** `已取消。` with keyboard removal each time; no keys, events or profiles.
#[tokio::test]
async fn test_cancel_in_either_state() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    send(&flow, "/start").await;
    send(&flow, LABEL_CANCEL).await;
    let sent = bot.last().unwrap();
    assert_eq!(sent.text, REPLY_CANCELLED);
    assert_eq!(sent.keyboard, ReplyKeyboard::Remove);
    assert_eq!(flow.state(USER).await, None);

    send(&flow, "/start").await;
    send(&flow, LABEL_NEW_USER).await;
    send(&flow, "/cancel").await;
    assert_eq!(bot.last().unwrap().text, REPLY_CANCELLED);
    assert_eq!(flow.state(USER).await, None);
    assert_eq!(components.sessions.get_value(USER, "mode").await, None);

    assert!(components
        .audit
        .get_idempotency_key(&idempotency_key(USER, LABEL_NEW_USER))
        .await
        .unwrap()
        .is_none());
    assert!(components.audit.recent_events(USER, 10).await.unwrap().is_empty());
    assert!(components.users.get(USER).await.is_none());
}

#[tokio::test]
async fn test_messages_outside_conversation_fall_through() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    assert_eq!(send(&flow, "hello").await, HandlerResponse::Continue);
    assert_eq!(send(&flow, LABEL_CANCEL).await, HandlerResponse::Continue);
    assert_eq!(send(&flow, "/cancel").await, HandlerResponse::Continue);
    assert_eq!(bot.count(), 0);
}

/// **Test: Other commands pass through and `/start` does not re-enter an active conversation.**
#[tokio::test]
async fn test_commands_during_conversation() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    send(&flow, "/start").await;
    send(&flow, LABEL_NEW_USER).await;

    assert_eq!(send(&flow, "/help").await, HandlerResponse::Continue);
    assert_eq!(send(&flow, "/start").await, HandlerResponse::Continue);
    assert_eq!(bot.count(), 2);
    assert_eq!(flow.state(USER).await, Some(OnboardingState::Confirm));
    assert_eq!(
        components.sessions.get_value(USER, "mode").await,
        Some(json!(LABEL_NEW_USER))
    );
}

#[tokio::test]
async fn test_existing_profile_is_kept() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());
    let existing = UserProfile::new(USER, Some("old_name".to_string()), None);
    components.users.upsert(existing.clone()).await.unwrap();

    for text in ["/start", LABEL_NEW_USER, LABEL_CONFIRM] {
        send(&flow, text).await;
    }

    assert_eq!(components.users.get(USER).await, Some(existing));
}

#[tokio::test]
async fn test_conversations_are_per_user() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    flow.handle(&text_message(1, "/start")).await.unwrap();
    flow.handle(&text_message(2, "/start")).await.unwrap();
    flow.handle(&text_message(1, LABEL_NEW_USER)).await.unwrap();

    assert_eq!(flow.state(1).await, Some(OnboardingState::Confirm));
    assert_eq!(flow.state(2).await, Some(OnboardingState::ChooseMode));
    assert_eq!(components.sessions.get_value(2, "mode").await, None);
}

/// **Test: Confirmation after the session was lost.**
///
/// **Setup:** Conversation in Confirm; the session is cleared behind the flow's back.
/// **Action:** `确认提交`.
/// **Expected:** Session-expired reply, conversation ended, nothing persisted.
#[tokio::test]
async fn test_confirm_without_mode_ends_conversation() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    send(&flow, "/start").await;
    send(&flow, LABEL_NEW_USER).await;
    components.sessions.clear(USER).await;
    send(&flow, LABEL_CONFIRM).await;

    let sent = bot.last().unwrap();
    assert_eq!(sent.text, REPLY_SESSION_EXPIRED);
    assert_eq!(sent.keyboard, ReplyKeyboard::Remove);
    assert_eq!(flow.state(USER).await, None);
    assert!(components.audit.recent_events(USER, 10).await.unwrap().is_empty());
    assert!(components.users.get(USER).await.is_none());
}

struct BrokenAudit;

#[async_trait]
impl AuditDao for BrokenAudit {
    async fn try_acquire_idempotency(&self, _key: &str) -> Result<bool, StorageError> {
        Err(StorageError::Database("database is locked".to_string()))
    }

    async fn log_event(
        &self,
        _user_id: i64,
        _event: &str,
        _payload: Option<&str>,
    ) -> Result<(), StorageError> {
        Err(StorageError::Database("database is locked".to_string()))
    }

    async fn clear_idempotency_keys(&self) -> Result<u64, StorageError> {
        Ok(0)
    }
}

/// **Test: A storage fault during commit propagates and keeps the conversation retryable.**
#[tokio::test]
async fn test_storage_fault_keeps_confirm_state() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = OnboardingFlow::new(
        bot.clone(),
        components.sessions.clone(),
        components.users.clone(),
        Arc::new(BrokenAudit),
        components.agents.clone(),
    );

    send(&flow, "/start").await;
    send(&flow, LABEL_NEW_USER).await;
    let result = flow.handle(&text_message(USER, LABEL_CONFIRM)).await;

    assert!(result.is_err());
    assert_eq!(bot.count(), 2);
    assert_eq!(flow.state(USER).await, Some(OnboardingState::Confirm));
    assert_eq!(
        components.sessions.get_value(USER, "mode").await,
        Some(json!(LABEL_NEW_USER))
    );
    assert!(components.users.get(USER).await.is_none());
}

/// Claims keys in the real ledger but fails every event write.
struct EventWriteFails(Arc<dyn AuditDao>);

#[async_trait]
impl AuditDao for EventWriteFails {
    async fn try_acquire_idempotency(&self, key: &str) -> Result<bool, StorageError> {
        self.0.try_acquire_idempotency(key).await
    }

    async fn log_event(
        &self,
        _user_id: i64,
        _event: &str,
        _payload: Option<&str>,
    ) -> Result<(), StorageError> {
        Err(StorageError::Database("disk I/O error".to_string()))
    }

    async fn clear_idempotency_keys(&self) -> Result<u64, StorageError> {
        self.0.clear_idempotency_keys().await
    }
}

/// **Test: A fault after the key is claimed turns a retry into "already processed".**
///
/// **Setup:** Ledger that claims keys but cannot write events.
/// **Action:** Confirm (fails), confirm again; then clear the keys and run a working flow.
/// **Expected:** First confirm errors and keeps `Confirm`; the retry is reported as already
/// processed with no profile written; after clearing the keys the submission goes through.
#[tokio::test]
async fn test_fault_after_claim_needs_key_repair() {
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let real: Arc<dyn AuditDao> = components.audit.clone();
    let broken = OnboardingFlow::new(
        bot.clone(),
        components.sessions.clone(),
        components.users.clone(),
        Arc::new(EventWriteFails(real.clone())),
        components.agents.clone(),
    );

    send(&broken, "/start").await;
    send(&broken, LABEL_NEW_USER).await;
    assert!(broken
        .handle(&text_message(USER, LABEL_CONFIRM))
        .await
        .is_err());
    assert_eq!(broken.state(USER).await, Some(OnboardingState::Confirm));

    send(&broken, LABEL_CONFIRM).await;
    assert_eq!(bot.last().unwrap().text, REPLY_ALREADY_PROCESSED);
    assert!(components.users.get(USER).await.is_none());
    assert!(components.audit.recent_events(USER, 10).await.unwrap().is_empty());

    assert_eq!(real.clear_idempotency_keys().await.unwrap(), 1);
    let working = flow(&components, bot.clone());
    for text in ["/start", LABEL_NEW_USER, LABEL_CONFIRM] {
        send(&working, text).await;
    }
    assert!(bot.last().unwrap().text.starts_with(REPLY_DONE));
    assert_eq!(components.audit.recent_events(USER, 10).await.unwrap().len(), 1);
}

struct FailingAgent;

#[async_trait]
impl Agent for FailingAgent {
    fn name(&self) -> &str {
        "onboarding"
    }

    async fn run(&self, _input: &AgentInput) -> Result<AgentOutput, AgentError> {
        Err(AgentError::Failed {
            agent: "onboarding".to_string(),
            reason: "boom".to_string(),
        })
    }
}

struct SlowAgent;

#[async_trait]
impl Agent for SlowAgent {
    fn name(&self) -> &str {
        "onboarding"
    }

    async fn run(&self, _input: &AgentInput) -> Result<AgentOutput, AgentError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(agents::input([("reply", "too late")]))
    }
}

async fn commit_with_agents(agents: AgentRegistry) -> (TempDir, Arc<MockBot>, BotComponents) {
    let (dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow_with_agents(&components, bot.clone(), Arc::new(agents));

    for text in ["/start", LABEL_NEW_USER, LABEL_CONFIRM] {
        send(&flow, text).await;
    }
    (dir, bot, components)
}

/// **Test: Agent failures never fail the submission.**
///
/// **Setup:** Registries with no onboarding agent, a failing one, and one slower than the timeout.
/// **Action:** Complete the conversation with each.
/// **Expected:** Reply is exactly the success text; the event is still recorded.
#[tokio::test]
async fn test_agent_failures_are_swallowed() {
    let mut failing = AgentRegistry::new();
    failing.register_agent(Arc::new(FailingAgent));
    let mut slow = AgentRegistry::new();
    slow.register_agent(Arc::new(SlowAgent));

    for registry in [AgentRegistry::new(), failing, slow] {
        let (_dir, bot, components) = commit_with_agents(registry).await;
        assert_eq!(bot.last().unwrap().text, REPLY_DONE);
        assert_eq!(components.audit.recent_events(USER, 10).await.unwrap().len(), 1);
    }
}

/// **Test: A conversation only consumes messages from the chat it was started in.**
///
/// **Setup:** `/start` in the user's private chat.
/// **Action:** The same user posts text, a mode label, `取消` and `/start` in a group chat.
/// **Expected:** Every group message falls through with nothing sent; the private conversation
/// is untouched and still completes there.
#[tokio::test]
async fn test_conversation_is_bound_to_its_chat() {
    const GROUP: i64 = -500;
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    send(&flow, "/start").await;

    for text in ["hello everyone", LABEL_NEW_USER, LABEL_CANCEL, "/start", "/cancel"] {
        let response = flow
            .handle(&text_message_in(USER, GROUP, text))
            .await
            .unwrap();
        assert_eq!(response, HandlerResponse::Continue);
    }

    assert_eq!(bot.count(), 1);
    assert!(bot.sent().iter().all(|m| m.chat_id == USER));
    assert_eq!(flow.state(USER).await, Some(OnboardingState::ChooseMode));
    assert_eq!(flow.conversation_chat(USER).await, Some(USER));
    assert_eq!(components.sessions.get_value(USER, "mode").await, None);

    send(&flow, LABEL_NEW_USER).await;
    send(&flow, LABEL_CONFIRM).await;
    let sent = bot.last().unwrap();
    assert_eq!(sent.chat_id, USER);
    assert!(sent.text.starts_with(REPLY_DONE));
}

#[tokio::test]
async fn test_conversation_started_in_group_stays_there() {
    const GROUP: i64 = -42;
    let (_dir, components) = temp_components().await;
    let bot = MockBot::new();
    let flow = flow(&components, bot.clone());

    flow.handle(&text_message_in(USER, GROUP, "/start"))
        .await
        .unwrap();
    assert_eq!(flow.conversation_chat(USER).await, Some(GROUP));

    assert_eq!(send(&flow, LABEL_MIGRATION).await, HandlerResponse::Continue);
    assert_eq!(flow.state(USER).await, Some(OnboardingState::ChooseMode));

    flow.handle(&text_message_in(USER, GROUP, LABEL_MIGRATION))
        .await
        .unwrap();
    assert_eq!(flow.state(USER).await, Some(OnboardingState::Confirm));
    assert_eq!(bot.last().unwrap().chat_id, GROUP);
}
