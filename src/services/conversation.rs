//! Conversation service: mock chat CRUD and assistant replies.
//!
//! DESIGN
//! ======
//! All operations run against the in-memory `ConversationState` under its
//! `RwLock`. Reads clone out of the lock; mutations hold the write lock for
//! the whole change so every call is atomic with respect to the others.

#[cfg(test)]
#[path = "conversation_test.rs"]
mod conversation_test;

use time::OffsetDateTime;
use tracing::info;

use super::reply;
use crate::state::AppState;
use crate::types::{Conversation, Message, Role};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("conversation not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

impl crate::rpc::ErrorCode for ConversationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_CONVERSATION_NOT_FOUND",
            Self::InvalidInput(_) => "E_INVALID_INPUT",
        }
    }
}

// =============================================================================
// QUERIES
// =============================================================================

pub async fn list_conversations(state: &AppState) -> Vec<Conversation> {
    state.conversations.read().await.conversations.clone()
}

/// Fetch one conversation with its messages.
///
/// # Errors
///
/// Returns [`ConversationError::NotFound`] for an unknown id.
pub async fn get_conversation(state: &AppState, id: &str) -> Result<Conversation, ConversationError> {
    let table = state.conversations.read().await;
    table
        .find(id)
        .cloned()
        .ok_or_else(|| ConversationError::NotFound(id.to_owned()))
}

// =============================================================================
// MUTATIONS
// =============================================================================

pub async fn create_conversation(state: &AppState, title: &str) -> Conversation {
    let mut table = state.conversations.write().await;
    let conversation = Conversation {
        id: table.ids.mint(),
        title: title.to_owned(),
        created_at: OffsetDateTime::now_utc(),
        messages: Vec::new(),
    };
    table.conversations.push(conversation.clone());
    info!(conversation_id = %conversation.id, "conversation created");
    conversation
}

/// Delete a conversation.
///
/// # Errors
///
/// Returns [`ConversationError::NotFound`] for an unknown id.
pub async fn delete_conversation(state: &AppState, id: &str) -> Result<(), ConversationError> {
    let mut table = state.conversations.write().await;
    let Some(index) = table.conversations.iter().position(|c| c.id == id) else {
        return Err(ConversationError::NotFound(id.to_owned()));
    };
    table.conversations.remove(index);
    info!(conversation_id = %id, "conversation deleted");
    Ok(())
}

/// Rename a conversation and return the updated record.
///
/// # Errors
///
/// Returns [`ConversationError::NotFound`] for an unknown id.
pub async fn rename_conversation(state: &AppState, id: &str, title: &str) -> Result<Conversation, ConversationError> {
    let mut table = state.conversations.write().await;
    let conversation = table
        .find_mut(id)
        .ok_or_else(|| ConversationError::NotFound(id.to_owned()))?;
    title.clone_into(&mut conversation.title);
    Ok(conversation.clone())
}

/// Append a user message to a conversation.
///
/// # Errors
///
/// Returns [`ConversationError::InvalidInput`] for blank content and
/// [`ConversationError::NotFound`] for an unknown conversation.
pub async fn send_message(state: &AppState, conversation_id: &str, content: &str) -> Result<Message, ConversationError> {
    if content.trim().is_empty() {
        return Err(ConversationError::InvalidInput("message content is empty"));
    }

    let mut table = state.conversations.write().await;
    let index = table
        .conversations
        .iter()
        .position(|c| c.id == conversation_id)
        .ok_or_else(|| ConversationError::NotFound(conversation_id.to_owned()))?;
    let id = table.ids.mint();
    let conversation = &mut table.conversations[index];

    let message = Message {
        id,
        content: content.to_owned(),
        role: Role::User,
        timestamp: OffsetDateTime::now_utc(),
        chart_data: None,
    };
    conversation.messages.push(message.clone());
    info!(%conversation_id, content_len = content.len(), "user message stored");
    Ok(message)
}

/// Generate and store an assistant reply.
///
/// The reply reacts to `user_message` when given, otherwise to the latest
/// user message in the conversation.
///
/// # Errors
///
/// Returns [`ConversationError::NotFound`] for an unknown conversation.
pub async fn send_ai_response(
    state: &AppState,
    conversation_id: &str,
    user_message: Option<&str>,
) -> Result<Message, ConversationError> {
    let mut table = state.conversations.write().await;
    let index = table
        .conversations
        .iter()
        .position(|c| c.id == conversation_id)
        .ok_or_else(|| ConversationError::NotFound(conversation_id.to_owned()))?;
    let id = table.ids.mint();
    let conversation = &mut table.conversations[index];

    let prompt = user_message
        .filter(|text| !text.is_empty())
        .or_else(|| conversation.last_user_text())
        .unwrap_or_default()
        .to_owned();
    let generated = reply::generate(&prompt, &mut rand::rng());

    let message = Message {
        id,
        content: generated.content,
        role: Role::Assistant,
        timestamp: OffsetDateTime::now_utc(),
        chart_data: generated.chart,
    };
    conversation.messages.push(message.clone());
    info!(%conversation_id, has_chart = message.chart_data.is_some(), "assistant reply stored");
    Ok(message)
}
