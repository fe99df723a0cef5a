//! Store collaborators: the message and dashboard interfaces the
//! controllers talk to.
//!
//! DESIGN
//! ======
//! Both traits are async and object safe so sessions hold them as
//! `Arc<dyn MessageStore>` / `Arc<dyn DashboardStore>`. `AppState`
//! implements them in-process by calling the services directly; the
//! `RpcClient` implements them over HTTP. Every failure collapses into
//! [`StoreError`], which keeps the controllers transport-agnostic.

use crate::rpc::{ErrorCode, RpcError};
use crate::services::conversation::{self, ConversationError};
use crate::services::dashboard::{self, DashboardError};
use crate::state::AppState;
use crate::types::{Conversation, Dashboard, Message, Widget, WidgetKind};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The referenced conversation, dashboard or widget does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The store refused the input.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Rejected(_) => "E_REJECTED",
            Self::Transport(_) => "E_TRANSPORT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<ConversationError> for StoreError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::NotFound(_) => Self::NotFound(err.to_string()),
            ConversationError::InvalidInput(_) => Self::Rejected(err.to_string()),
        }
    }
}

impl From<DashboardError> for StoreError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::NotFound(_) | DashboardError::WidgetNotFound { .. } => Self::NotFound(err.to_string()),
            DashboardError::InvalidInput(_) => Self::Rejected(err.to_string()),
        }
    }
}

impl From<RpcError> for StoreError {
    fn from(err: RpcError) -> Self {
        if err.code.ends_with("NOT_FOUND") {
            Self::NotFound(err.message)
        } else {
            Self::Rejected(err.message)
        }
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// Conversation and message operations.
#[async_trait::async_trait]
pub trait MessageStore: Send + Sync {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError>;

    async fn get_conversation(&self, id: &str) -> Result<Conversation, StoreError>;

    async fn create_conversation(&self, title: &str) -> Result<Conversation, StoreError>;

    async fn delete_conversation(&self, id: &str) -> Result<(), StoreError>;

    async fn rename_conversation(&self, id: &str, title: &str) -> Result<Conversation, StoreError>;

    /// Append a user message.
    async fn send_message(&self, conversation_id: &str, content: &str) -> Result<Message, StoreError>;

    /// Generate and store the assistant reply to `last_user_text`.
    async fn request_reply(&self, conversation_id: &str, last_user_text: &str) -> Result<Message, StoreError>;
}

/// Dashboard and widget operations.
#[async_trait::async_trait]
pub trait DashboardStore: Send + Sync {
    async fn list_dashboards(&self) -> Result<Vec<Dashboard>, StoreError>;

    async fn get_dashboard(&self, id: &str) -> Result<Dashboard, StoreError>;

    async fn create_dashboard(&self, name: &str) -> Result<Dashboard, StoreError>;

    async fn delete_dashboard(&self, id: &str) -> Result<(), StoreError>;

    /// Add a line-chart widget with sample data.
    async fn add_widget(&self, dashboard_id: &str, title: &str) -> Result<Widget, StoreError>;

    async fn delete_widget(&self, dashboard_id: &str, widget_id: &str) -> Result<(), StoreError>;

    async fn reorder_widgets(&self, dashboard_id: &str, widget_ids: &[String]) -> Result<(), StoreError>;
}

// =============================================================================
// IN-PROCESS ADAPTER
// =============================================================================

#[async_trait::async_trait]
impl MessageStore for AppState {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        Ok(conversation::list_conversations(self).await)
    }

    async fn get_conversation(&self, id: &str) -> Result<Conversation, StoreError> {
        Ok(conversation::get_conversation(self, id).await?)
    }

    async fn create_conversation(&self, title: &str) -> Result<Conversation, StoreError> {
        Ok(conversation::create_conversation(self, title).await)
    }

    async fn delete_conversation(&self, id: &str) -> Result<(), StoreError> {
        Ok(conversation::delete_conversation(self, id).await?)
    }

    async fn rename_conversation(&self, id: &str, title: &str) -> Result<Conversation, StoreError> {
        Ok(conversation::rename_conversation(self, id, title).await?)
    }

    async fn send_message(&self, conversation_id: &str, content: &str) -> Result<Message, StoreError> {
        Ok(conversation::send_message(self, conversation_id, content).await?)
    }

    async fn request_reply(&self, conversation_id: &str, last_user_text: &str) -> Result<Message, StoreError> {
        Ok(conversation::send_ai_response(self, conversation_id, Some(last_user_text)).await?)
    }
}

#[async_trait::async_trait]
impl DashboardStore for AppState {
    async fn list_dashboards(&self) -> Result<Vec<Dashboard>, StoreError> {
        Ok(dashboard::list_dashboards(self).await)
    }

    async fn get_dashboard(&self, id: &str) -> Result<Dashboard, StoreError> {
        Ok(dashboard::get_dashboard(self, id).await?)
    }

    async fn create_dashboard(&self, name: &str) -> Result<Dashboard, StoreError> {
        Ok(dashboard::create_dashboard(self, name).await?)
    }

    async fn delete_dashboard(&self, id: &str) -> Result<(), StoreError> {
        Ok(dashboard::delete_dashboard(self, id).await?)
    }

    async fn add_widget(&self, dashboard_id: &str, title: &str) -> Result<Widget, StoreError> {
        Ok(dashboard::add_widget(self, dashboard_id, title, WidgetKind::Line).await?)
    }

    async fn delete_widget(&self, dashboard_id: &str, widget_id: &str) -> Result<(), StoreError> {
        Ok(dashboard::delete_widget(self, dashboard_id, widget_id).await?)
    }

    async fn reorder_widgets(&self, dashboard_id: &str, widget_ids: &[String]) -> Result<(), StoreError> {
        dashboard::reorder_widgets(self, dashboard_id, widget_ids).await?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
