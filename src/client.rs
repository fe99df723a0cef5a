//! HTTP client for the mock RPC backend.
//!
//! Thin `reqwest` wrapper: one `POST /trpc/{procedure}` per call, response
//! decoded through the RPC envelope. Implements both store traits so the
//! sessions run unchanged against a remote backend.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::rpc::{
    AddWidgetInput, CreateConversationInput, CreateDashboardInput, DeleteWidgetInput, Envelope, IdInput, Procedure,
    RenameConversationInput, ReorderWidgetsInput, SendAiResponseInput, SendAiResponseOutput, SendMessageInput,
    SendMessageOutput, SuccessOutput,
};
use crate::store::{DashboardStore, MessageStore, StoreError};
use crate::types::{Conversation, Dashboard, Message, Widget, WidgetKind};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    base_url: String,
}

impl RpcClient {
    /// Build a client for the backend at `base_url` (e.g. `http://127.0.0.1:3001`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<I, O>(&self, procedure: Procedure, input: &I) -> Result<O, StoreError>
    where
        I: Serialize + Sync + ?Sized,
        O: DeserializeOwned,
    {
        let url = format!("{}/trpc/{}", self.base_url, procedure.name());
        debug!(procedure = procedure.name(), "rpc request");

        let response = self
            .http
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        parse_response(status, &text)
    }
}

/// Decode a response body. Pure so it can be tested without a server.
fn parse_response<O: DeserializeOwned>(status: u16, body: &str) -> Result<O, StoreError> {
    let envelope: Envelope<O> = serde_json::from_str(body)
        .map_err(|e| StoreError::Transport(format!("unreadable response (status {status}): {e}")))?;
    Ok(envelope.into_result()?)
}

// =============================================================================
// STORE IMPLS
// =============================================================================

#[async_trait::async_trait]
impl MessageStore for RpcClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        self.call(Procedure::ConversationsGetAll, &serde_json::Value::Null)
            .await
    }

    async fn get_conversation(&self, id: &str) -> Result<Conversation, StoreError> {
        self.call(Procedure::ConversationsGetById, &IdInput { id: id.to_owned() })
            .await
    }

    async fn create_conversation(&self, title: &str) -> Result<Conversation, StoreError> {
        let input = CreateConversationInput { title: title.to_owned() };
        self.call(Procedure::ConversationsCreate, &input).await
    }

    async fn delete_conversation(&self, id: &str) -> Result<(), StoreError> {
        let _: SuccessOutput = self
            .call(Procedure::ConversationsDelete, &IdInput { id: id.to_owned() })
            .await?;
        Ok(())
    }

    async fn rename_conversation(&self, id: &str, title: &str) -> Result<Conversation, StoreError> {
        let input = RenameConversationInput { id: id.to_owned(), title: title.to_owned() };
        self.call(Procedure::ConversationsRename, &input).await
    }

    async fn send_message(&self, conversation_id: &str, content: &str) -> Result<Message, StoreError> {
        let input = SendMessageInput { conversation_id: conversation_id.to_owned(), content: content.to_owned() };
        let output: SendMessageOutput = self
            .call(Procedure::ConversationsSendMessage, &input)
            .await?;
        Ok(output.user_message)
    }

    async fn request_reply(&self, conversation_id: &str, last_user_text: &str) -> Result<Message, StoreError> {
        let input = SendAiResponseInput {
            conversation_id: conversation_id.to_owned(),
            user_message: Some(last_user_text.to_owned()),
        };
        let output: SendAiResponseOutput = self
            .call(Procedure::ConversationsSendAiResponse, &input)
            .await?;
        Ok(output.ai_message)
    }
}

#[async_trait::async_trait]
impl DashboardStore for RpcClient {
    async fn list_dashboards(&self) -> Result<Vec<Dashboard>, StoreError> {
        self.call(Procedure::DashboardsGetAll, &serde_json::Value::Null)
            .await
    }

    async fn get_dashboard(&self, id: &str) -> Result<Dashboard, StoreError> {
        self.call(Procedure::DashboardsGetById, &IdInput { id: id.to_owned() })
            .await
    }

    async fn create_dashboard(&self, name: &str) -> Result<Dashboard, StoreError> {
        let input = CreateDashboardInput { name: name.to_owned() };
        self.call(Procedure::DashboardsCreate, &input).await
    }

    async fn delete_dashboard(&self, id: &str) -> Result<(), StoreError> {
        let _: SuccessOutput = self
            .call(Procedure::DashboardsDelete, &IdInput { id: id.to_owned() })
            .await?;
        Ok(())
    }

    async fn add_widget(&self, dashboard_id: &str, title: &str) -> Result<Widget, StoreError> {
        let input = AddWidgetInput { dashboard_id: dashboard_id.to_owned(), title: title.to_owned(), kind: WidgetKind::Line };
        self.call(Procedure::DashboardsAddWidget, &input).await
    }

    async fn delete_widget(&self, dashboard_id: &str, widget_id: &str) -> Result<(), StoreError> {
        let input = DeleteWidgetInput { dashboard_id: dashboard_id.to_owned(), widget_id: widget_id.to_owned() };
        let _: SuccessOutput = self
            .call(Procedure::DashboardsDeleteWidget, &input)
            .await?;
        Ok(())
    }

    async fn reorder_widgets(&self, dashboard_id: &str, widget_ids: &[String]) -> Result<(), StoreError> {
        let input = ReorderWidgetsInput { dashboard_id: dashboard_id.to_owned(), widget_ids: widget_ids.to_vec() };
        let _: SuccessOutput = self
            .call(Procedure::DashboardsReorderWidgets, &input)
            .await?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
