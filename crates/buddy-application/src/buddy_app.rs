//! Top-level application controller.
//!
//! `BuddyApp` is the single owner of the buddy store, the session state
//! machine and the active chat log. Front ends drive it through the async
//! methods below and re-render from the snapshots it returns.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use buddy_core::buddy::{
    Buddy, BuddyRepository, BuddyStore, CreateBuddyRequest, UpdateBuddyRequest,
};
use buddy_core::chat::{ChatLog, ChatMessage, ChatResponder, TemplateResponder};
use buddy_core::config::ChatConfig;
use buddy_core::error::{BuddyError, Result};
use buddy_core::session::{SessionController, Transition, ViewMode};
use buddy_core::storage::KeyValueStore;
use buddy_infrastructure::KeyValueBuddyRepository;

/// What happened to a chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Appended to the log; a reply is pending.
    Sent,
    /// Blank input, nothing appended.
    Blank,
    /// A reply is still pending for this session.
    Busy,
    /// No chat is open.
    NoSession,
}

struct PendingReply {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

struct AppState {
    store: BuddyStore,
    session: SessionController,
    chat: Option<ChatLog>,
    pending: Option<PendingReply>,
}

impl AppState {
    fn end_chat(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
            tracing::debug!("[BuddyApp] Cancelled pending reply");
        }
        self.chat = None;
    }

    /// Keeps the chat log aligned with the session token: a new token starts
    /// a fresh log, no token drops it.
    fn sync_chat(&mut self) {
        let Some(token) = self.session.current_token() else {
            self.end_chat();
            return;
        };
        if self.chat.as_ref().is_some_and(|chat| chat.token() == &token) {
            return;
        }

        self.end_chat();
        if let Some(buddy) = self.store.get(&token.buddy_id) {
            tracing::debug!(
                "[BuddyApp] Starting chat with {} (generation {})",
                buddy.id,
                token.generation
            );
            self.chat = Some(ChatLog::start(token, buddy));
        }
    }
}

/// Application controller for one process.
pub struct BuddyApp {
    state: Arc<Mutex<AppState>>,
    responder: Arc<dyn ChatResponder>,
    reply_delay: Duration,
}

impl BuddyApp {
    /// Loads the buddy collection and starts in the list view.
    pub fn new(repository: Arc<dyn BuddyRepository>, chat_config: &ChatConfig) -> Result<Self> {
        Self::with_responder(repository, chat_config, Arc::new(TemplateResponder))
    }

    /// Like [`BuddyApp::new`], persisting through a key-value store.
    pub fn with_key_value_store(
        store: Arc<dyn KeyValueStore>,
        chat_config: &ChatConfig,
    ) -> Result<Self> {
        Self::new(Arc::new(KeyValueBuddyRepository::new(store)), chat_config)
    }

    pub fn with_responder(
        repository: Arc<dyn BuddyRepository>,
        chat_config: &ChatConfig,
        responder: Arc<dyn ChatResponder>,
    ) -> Result<Self> {
        let mut store = BuddyStore::new(repository);
        let count = store.load()?.len();
        tracing::info!("[BuddyApp] Ready with {} buddies", count);

        Ok(Self {
            state: Arc::new(Mutex::new(AppState {
                store,
                session: SessionController::new(),
                chat: None,
                pending: None,
            })),
            responder,
            reply_delay: Duration::from_millis(chat_config.reply_delay_ms),
        })
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub async fn buddies(&self) -> Vec<Buddy> {
        self.state.lock().await.store.all().to_vec()
    }

    pub async fn buddy(&self, id: &str) -> Option<Buddy> {
        self.state.lock().await.store.get(id).cloned()
    }

    pub async fn view_mode(&self) -> ViewMode {
        self.state.lock().await.session.view_mode()
    }

    pub async fn active_buddy(&self) -> Option<Buddy> {
        let state = self.state.lock().await;
        state
            .session
            .active_buddy_id()
            .and_then(|id| state.store.get(id))
            .cloned()
    }

    /// Messages of the open chat, oldest first.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state
            .lock()
            .await
            .chat
            .as_ref()
            .map(|chat| chat.messages().to_vec())
            .unwrap_or_default()
    }

    /// True while a reply is pending in the open chat.
    pub async fn is_typing(&self) -> bool {
        self.state
            .lock()
            .await
            .chat
            .as_ref()
            .is_some_and(ChatLog::is_typing)
    }

    // ============================================================================
    // Buddy lifecycle
    // ============================================================================

    pub async fn start_create(&self) -> Transition {
        self.state.lock().await.session.start_create()
    }

    pub async fn cancel_create(&self) -> Transition {
        self.state.lock().await.session.cancel_create()
    }

    /// Validates and stores a new buddy, then shows the listing.
    ///
    /// Validation errors never reach the store.
    pub async fn create_buddy(&self, request: &CreateBuddyRequest) -> Result<Buddy> {
        let fields = request.validate()?;

        let mut state = self.state.lock().await;
        let buddy = state.store.create(fields)?;
        state.session.on_buddy_created();
        Ok(buddy)
    }

    /// Replaces a stored buddy wholesale.
    pub async fn update_buddy(&self, buddy: Buddy) -> Result<()> {
        self.state.lock().await.store.update(buddy)
    }

    /// Applies the settings form to the active buddy and returns to chat.
    pub async fn save_settings(&self, request: &UpdateBuddyRequest) -> Result<Buddy> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if state.session.view_mode() != ViewMode::Settings {
            return Err(BuddyError::internal("Settings view is not open"));
        }
        let id = state
            .session
            .active_buddy_id()
            .map(str::to_string)
            .ok_or_else(|| BuddyError::internal("Settings open without an active buddy"))?;
        let current = state
            .store
            .get(&id)
            .ok_or_else(|| BuddyError::not_found("buddy", &id))?;

        let updated = request.apply_to(current)?;
        state.store.update(updated.clone())?;
        state.session.back_from_settings();
        Ok(updated)
    }

    /// Removes a buddy. Ends the session if it was the active one.
    pub async fn delete_buddy(&self, id: &str) -> Result<bool> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let removed = state.store.delete(id)?;
        if state.session.on_buddy_deleted(id).is_applied() {
            state.sync_chat();
        }
        debug_assert!(state.session.is_consistent(&state.store));
        Ok(removed)
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    /// Opens a chat with `id`. Unknown ids leave everything unchanged.
    pub async fn select_buddy(&self, id: &str) -> Transition {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let transition = state.session.select_buddy(id, &state.store);
        if transition.is_applied() {
            state.sync_chat();
        }
        transition
    }

    pub async fn open_settings(&self) -> Transition {
        self.state.lock().await.session.open_settings()
    }

    pub async fn back_from_settings(&self) -> Transition {
        self.state.lock().await.session.back_from_settings()
    }

    /// Leaves the chat, discarding its log and any pending reply.
    pub async fn back_from_chat(&self) -> Transition {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let transition = state.session.back_from_chat();
        if transition.is_applied() {
            state.sync_chat();
        }
        transition
    }

    // ============================================================================
    // Chat
    // ============================================================================

    /// Appends a user message and schedules the buddy's reply.
    ///
    /// The reply lands after the configured delay, and only if the session
    /// that asked for it is still the current one.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        // Surrounding whitespace is kept; it counts towards reply templates
        if text.trim().is_empty() {
            return SendOutcome::Blank;
        }

        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if state.session.view_mode() != ViewMode::Chat {
            return SendOutcome::NoSession;
        }
        let Some(token) = state.session.current_token() else {
            return SendOutcome::NoSession;
        };
        let Some(personality) = state.store.get(&token.buddy_id).map(|b| b.personality) else {
            return SendOutcome::NoSession;
        };
        let Some(chat) = state.chat.as_mut() else {
            return SendOutcome::NoSession;
        };
        if chat.is_typing() {
            return SendOutcome::Busy;
        }
        chat.push_user(text);

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let task_state = Arc::clone(&self.state);
        let responder = Arc::clone(&self.responder);
        let delay = self.reply_delay;
        let user_text = text.to_string();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_cancel.cancelled() => {
                    tracing::debug!("[BuddyApp] Reply for {} cancelled", token.buddy_id);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let reply = responder.generate_reply(personality, &user_text);

            let mut guard = task_state.lock().await;
            let state = &mut *guard;
            if task_cancel.is_cancelled() || !state.session.is_current(&token) {
                tracing::debug!("[BuddyApp] Discarding stale reply for {}", token.buddy_id);
                return;
            }
            if let Some(chat) = state.chat.as_mut()
                && chat.token() == &token
            {
                chat.push_reply(reply);
            }
            state.pending = None;
        });

        state.pending = Some(PendingReply {
            cancel,
            handle: Some(handle),
        });
        SendOutcome::Sent
    }

    /// Waits for the pending reply of the open chat, if any.
    pub async fn settle(&self) {
        let handle = self
            .state
            .lock()
            .await
            .pending
            .as_mut()
            .and_then(|pending| pending.handle.take());

        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::error!("[BuddyApp] Reply task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_core::chat::Sender;
    use buddy_infrastructure::InMemoryKeyValueStore;

    fn app_with_delay(reply_delay_ms: u64) -> BuddyApp {
        let store = Arc::new(InMemoryKeyValueStore::new());
        BuddyApp::with_key_value_store(store, &ChatConfig { reply_delay_ms }).unwrap()
    }

    #[tokio::test]
    async fn test_chat_starts_with_greeting() {
        let app = app_with_delay(0);
        assert!(app.select_buddy("1").await.is_applied());

        let messages = app.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Buddy);
        assert!(messages[0].text.starts_with("Hi there! I'm Alex Assistant"));
    }

    #[tokio::test]
    async fn test_send_and_reply() {
        let app = app_with_delay(0);
        app.select_buddy("1").await;

        assert_eq!(app.send_message("   ").await, SendOutcome::Blank);
        assert_eq!(app.send_message("hello").await, SendOutcome::Sent);
        assert!(app.is_typing().await);
        assert_eq!(app.send_message("again").await, SendOutcome::Busy);

        app.settle().await;
        assert!(!app.is_typing().await);

        let messages = app.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text, "hello");
        assert_eq!(messages[2].text, "I'd be happy to help with that! ");
    }

    #[tokio::test]
    async fn test_send_outside_chat_is_refused() {
        let app = app_with_delay(0);
        assert_eq!(app.send_message("hello").await, SendOutcome::NoSession);

        app.select_buddy("1").await;
        app.open_settings().await;
        assert_eq!(app.send_message("hello").await, SendOutcome::NoSession);
    }

    #[tokio::test]
    async fn test_settings_round_trip_keeps_chat() {
        let app = app_with_delay(0);
        app.select_buddy("2").await;
        app.send_message("hi").await;
        app.settle().await;

        assert!(app.open_settings().await.is_applied());
        let mut form = UpdateBuddyRequest::from_buddy(&app.active_buddy().await.unwrap());
        form.creativity_percent = 40;
        let updated = app.save_settings(&form).await.unwrap();

        assert_eq!(app.view_mode().await, ViewMode::Chat);
        assert_eq!(updated.settings.unwrap().creativity, 0.4);
        assert_eq!(app.messages().await.len(), 3);
    }

    #[tokio::test]
    async fn test_save_settings_requires_settings_view() {
        let app = app_with_delay(0);
        app.select_buddy("1").await;
        let form = UpdateBuddyRequest::from_buddy(&app.active_buddy().await.unwrap());
        assert!(app.save_settings(&form).await.is_err());
    }

    #[tokio::test]
    async fn test_create_form_navigation() {
        let app = app_with_delay(0);
        assert!(app.start_create().await.is_applied());
        assert_eq!(app.view_mode().await, ViewMode::Create);
        assert!(app.cancel_create().await.is_applied());
        assert_eq!(app.view_mode().await, ViewMode::List);

        app.select_buddy("1").await;
        assert!(!app.start_create().await.is_applied());
        assert_eq!(app.view_mode().await, ViewMode::Chat);
    }

    #[tokio::test]
    async fn test_deleting_active_buddy_ends_chat() {
        let app = app_with_delay(0);
        app.select_buddy("3").await;
        assert!(app.delete_buddy("3").await.unwrap());

        assert_eq!(app.view_mode().await, ViewMode::List);
        assert!(app.active_buddy().await.is_none());
        assert!(app.messages().await.is_empty());
    }
}
