//! Chat session: conversation list, composer and the active reply turn.
//!
//! DESIGN
//! ======
//! The session owns the local conversation cache, the sidebar controller and
//! at most one running turn. UI state is injected per call so the chat and
//! dashboard screens share one [`UiState`].
//!
//! A second submission while a turn is running is rejected with
//! [`ChatError::TurnInProgress`]. Switching conversation cancels the running
//! turn, and events from cancelled turns are ignored by turn id.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::reveal::{RevealEvent, RevealSequencer, RevealTimings, TurnHandle, TurnOutcome};
use super::sidebar::{DragEnd, DragUpdate, SettleCommand, SidebarConfig, SidebarGestureController};
use super::ui::{UiAction, UiState};
use crate::rpc::ErrorCode;
use crate::store::{MessageStore, StoreError};
use crate::types::{Conversation, Message};

pub const NEW_CONVERSATION_TITLE: &str = "New Conversation";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyInput,
    #[error("no conversation selected")]
    NoConversation,
    #[error("a reply is still in progress")]
    TurnInProgress,
    #[error("message could not be sent: {0}")]
    SubmissionFailed(StoreError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorCode for ChatError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "E_EMPTY_INPUT",
            Self::NoConversation => "E_NO_CONVERSATION",
            Self::TurnInProgress => "E_TURN_IN_PROGRESS",
            Self::SubmissionFailed(_) => "E_SUBMISSION_FAILED",
            Self::Store(err) => err.error_code(),
        }
    }
}

/// What the renderer shows for the running turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub turn_id: Uuid,
    pub conversation_id: String,
    /// Placeholder ("thinking…") visible.
    pub thinking: bool,
    /// Typewriter text so far.
    pub revealed: String,
}

struct ActiveTurn {
    handle: TurnHandle,
    view: TurnView,
}

pub struct ChatSession {
    store: Arc<dyn MessageStore>,
    sequencer: RevealSequencer,
    sidebar: SidebarGestureController,
    conversations: Vec<Conversation>,
    active: Option<ActiveTurn>,
}

impl ChatSession {
    /// Build a session and the receiver its turn events arrive on. Feed every
    /// received event back through [`ChatSession::apply_event`].
    #[must_use]
    pub fn new(
        store: Arc<dyn MessageStore>,
        sidebar: SidebarConfig,
        timings: RevealTimings,
    ) -> (Self, mpsc::UnboundedReceiver<RevealEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            sequencer: RevealSequencer::new(Arc::clone(&store), timings, tx),
            store,
            sidebar: SidebarGestureController::new(sidebar),
            conversations: Vec::new(),
            active: None,
        };
        (session, rx)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    #[must_use]
    pub fn current_conversation(&self, ui: &UiState) -> Option<&Conversation> {
        let id = ui.selected_conversation_id.as_deref()?;
        self.conversations.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn turn_view(&self) -> Option<&TurnView> {
        self.active.as_ref().map(|a| &a.view)
    }

    #[must_use]
    pub fn is_turn_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn sidebar(&self) -> &SidebarGestureController {
        &self.sidebar
    }

    // =========================================================================
    // CONVERSATIONS
    // =========================================================================

    /// Fetch the conversation list and make sure one is selected.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Store`] when the list cannot be fetched.
    pub async fn load(&mut self, ui: &mut UiState) -> Result<(), ChatError> {
        let conversations = self
            .store
            .list_conversations()
            .await
            .map_err(|e| fail(ui, e.into()))?;
        self.conversations = conversations;

        let selected_exists = ui
            .selected_conversation_id
            .as_deref()
            .is_some_and(|id| self.conversations.iter().any(|c| c.id == id));
        if !selected_exists {
            let first = self.conversations.first().map(|c| c.id.clone());
            ui.apply(UiAction::SelectConversation(first));
        }
        debug!(count = self.conversations.len(), "conversations loaded");
        Ok(())
    }

    /// Switch to a conversation and close the sidebar. A real switch cancels
    /// the running turn; re-selecting the current conversation leaves it alone.
    pub fn select_conversation(&mut self, ui: &mut UiState, id: &str) -> SettleCommand {
        if ui.selected_conversation_id.as_deref() != Some(id) {
            self.cancel_turn();
            ui.apply(UiAction::SelectConversation(Some(id.to_owned())));
        }
        self.close_sidebar(ui)
    }

    /// Create an empty conversation and select it.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Store`] when the store refuses.
    pub async fn create_conversation(&mut self, ui: &mut UiState) -> Result<Conversation, ChatError> {
        let created = self
            .store
            .create_conversation(NEW_CONVERSATION_TITLE)
            .await
            .map_err(|e| fail(ui, e.into()))?;
        self.conversations.push(created.clone());
        self.select_conversation(ui, &created.id);
        info!(conversation_id = %created.id, "conversation created");
        Ok(created)
    }

    /// Delete a conversation. When it was selected, the first remaining one
    /// is selected instead.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Store`] when the store refuses, including
    /// [`StoreError::NotFound`].
    pub async fn delete_conversation(&mut self, ui: &mut UiState, id: &str) -> Result<(), ChatError> {
        self.store
            .delete_conversation(id)
            .await
            .map_err(|e| fail(ui, e.into()))?;
        self.conversations.retain(|c| c.id != id);

        if self.active.as_ref().is_some_and(|a| a.view.conversation_id == id) {
            self.cancel_turn();
        }
        if ui.selected_conversation_id.as_deref() == Some(id) {
            let first = self.conversations.first().map(|c| c.id.clone());
            ui.apply(UiAction::SelectConversation(first));
        }
        Ok(())
    }

    /// Rename a conversation.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Store`] when the store refuses.
    pub async fn rename_conversation(&mut self, ui: &mut UiState, id: &str, title: &str) -> Result<(), ChatError> {
        let renamed = self
            .store
            .rename_conversation(id, title)
            .await
            .map_err(|e| fail(ui, e.into()))?;
        self.replace_conversation(renamed);
        Ok(())
    }

    // =========================================================================
    // TURNS
    // =========================================================================

    /// Send the composer text and start a reply turn.
    ///
    /// # Errors
    ///
    /// - [`ChatError::TurnInProgress`] while a turn is running
    /// - [`ChatError::EmptyInput`] for blank input
    /// - [`ChatError::NoConversation`] when nothing is selected
    /// - [`ChatError::SubmissionFailed`] when the store rejects the message
    pub async fn submit(&mut self, ui: &mut UiState) -> Result<Uuid, ChatError> {
        if self.active.is_some() {
            return Err(ChatError::TurnInProgress);
        }
        let content = ui.input_text.trim().to_owned();
        if content.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let Some(conversation_id) = ui.selected_conversation_id.clone() else {
            return Err(ChatError::NoConversation);
        };
        ui.apply(UiAction::ClearInput);

        let sent = self
            .store
            .send_message(&conversation_id, &content)
            .await
            .map_err(|e| fail(ui, ChatError::SubmissionFailed(e)))?;
        self.push_message(&conversation_id, sent);

        let handle = self.sequencer.start(&conversation_id, &content);
        let turn_id = handle.id();
        let view = TurnView { turn_id, conversation_id, thinking: false, revealed: String::new() };
        self.active = Some(ActiveTurn { handle, view });
        Ok(turn_id)
    }

    /// Fold one sequencer event into the view. Events for turns other than
    /// the running one are dropped.
    pub fn apply_event(&mut self, ui: &mut UiState, event: RevealEvent) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.view.turn_id != event.turn_id() {
            debug!(turn_id = %event.turn_id(), "stale turn event dropped");
            return;
        }

        match event {
            RevealEvent::PlaceholderShown { .. } => active.view.thinking = true,
            RevealEvent::ReplyRequested { .. } => {}
            RevealEvent::TextRevealed { prefix, .. } => {
                active.view.thinking = false;
                active.view.revealed = prefix;
            }
            RevealEvent::ConversationRefreshed { conversation, .. } => self.replace_conversation(conversation),
            RevealEvent::TurnCompleted { outcome, .. } => {
                let conversation_id = active.view.conversation_id.clone();
                self.active = None;
                match outcome {
                    TurnOutcome::Revealed(message) => self.push_message(&conversation_id, message),
                    TurnOutcome::Failed(err) => {
                        warn!(error = %err, "reply failed");
                        ui.notify_error(format!("Reply failed: {err}"));
                    }
                }
            }
        }
    }

    /// Stop the running turn, if any.
    pub fn cancel_turn(&mut self) {
        if let Some(active) = self.active.take() {
            active.handle.cancel();
            info!(turn_id = %active.view.turn_id, "turn cancelled");
        }
    }

    // =========================================================================
    // SIDEBAR
    // =========================================================================

    pub fn open_sidebar(&mut self, ui: &mut UiState) -> SettleCommand {
        let command = self.sidebar.open();
        ui.apply(UiAction::SetSidebarOpen(command.open));
        command
    }

    pub fn close_sidebar(&mut self, ui: &mut UiState) -> SettleCommand {
        let command = self.sidebar.close();
        ui.apply(UiAction::SetSidebarOpen(command.open));
        command
    }

    pub fn toggle_sidebar(&mut self, ui: &mut UiState) -> SettleCommand {
        let command = self.sidebar.toggle();
        ui.apply(UiAction::SetSidebarOpen(command.open));
        command
    }

    pub fn drag_sidebar(&mut self, update: DragUpdate) -> Option<f64> {
        self.sidebar.drag_update(update)
    }

    pub fn release_sidebar(&mut self, ui: &mut UiState, end: DragEnd) -> SettleCommand {
        let command = self.sidebar.drag_end(end);
        ui.apply(UiAction::SetSidebarOpen(command.open));
        command
    }

    pub fn tick_sidebar(&mut self, delta: Duration) -> f64 {
        self.sidebar.tick(delta)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn replace_conversation(&mut self, conversation: Conversation) {
        if let Some(slot) = self.conversations.iter_mut().find(|c| c.id == conversation.id) {
            *slot = conversation;
        }
    }

    fn push_message(&mut self, conversation_id: &str, message: Message) {
        let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == conversation_id) else {
            return;
        };
        if !conversation.messages.iter().any(|m| m.id == message.id) {
            conversation.messages.push(message);
        }
    }
}

/// Surface a failure as a notification and hand it back.
fn fail(ui: &mut UiState, err: ChatError) -> ChatError {
    warn!(code = err.error_code(), error = %err, "chat operation failed");
    ui.notify_error(err.to_string());
    err
}
