//! RPC envelope: the wire shape of every mock backend call.
//!
//! ARCHITECTURE
//! ============
//! Clients `POST /trpc/{procedure}` with the procedure input as the JSON body.
//! The router dispatches on the procedure namespace (`conversations.`,
//! `dashboards.`) and answers with either a result envelope or an error
//! envelope.
//!
//! DESIGN
//! ======
//! - Success: `{"result":{"data":<value>}}`.
//! - Failure: `{"error":{"code":"E_...","message":"...","retryable":false}}`.
//! - Typed errors render themselves through [`ErrorCode`].

use serde::{Deserialize, Serialize};

use crate::types::{Message, WidgetKind};

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for structured error envelopes.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// ENVELOPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResult<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub retryable: bool,
}

impl RpcError {
    #[must_use]
    pub fn from_err(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self { code: err.error_code().to_owned(), message: err.to_string(), retryable: err.retryable() }
    }

    /// Error for a request the router could not route or decode.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { code: "E_BAD_REQUEST".into(), message: message.into(), retryable: false }
    }
}

/// One response body. Exactly one of the two keys is present on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope<T> {
    Result(RpcResult<T>),
    Error(RpcError),
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self::Result(RpcResult { data })
    }

    /// Unwrap into a plain `Result`.
    ///
    /// # Errors
    ///
    /// Returns the carried [`RpcError`] for an error envelope.
    pub fn into_result(self) -> Result<T, RpcError> {
        match self {
            Self::Result(r) => Ok(r.data),
            Self::Error(e) => Err(e),
        }
    }
}

// =============================================================================
// PROCEDURES
// =============================================================================

/// Split a procedure name into namespace and operation (`"a.b"` → `("a", "b")`).
#[must_use]
pub fn split_procedure(procedure: &str) -> (&str, &str) {
    procedure.split_once('.').unwrap_or((procedure, ""))
}

/// Every procedure the mock backend answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    ConversationsGetAll,
    ConversationsGetById,
    ConversationsCreate,
    ConversationsDelete,
    ConversationsRename,
    ConversationsSendMessage,
    ConversationsSendAiResponse,
    DashboardsGetAll,
    DashboardsGetById,
    DashboardsCreate,
    DashboardsDelete,
    DashboardsAddWidget,
    DashboardsDeleteWidget,
    DashboardsReorderWidgets,
}

impl Procedure {
    pub const ALL: [Procedure; 14] = [
        Self::ConversationsGetAll,
        Self::ConversationsGetById,
        Self::ConversationsCreate,
        Self::ConversationsDelete,
        Self::ConversationsRename,
        Self::ConversationsSendMessage,
        Self::ConversationsSendAiResponse,
        Self::DashboardsGetAll,
        Self::DashboardsGetById,
        Self::DashboardsCreate,
        Self::DashboardsDelete,
        Self::DashboardsAddWidget,
        Self::DashboardsDeleteWidget,
        Self::DashboardsReorderWidgets,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ConversationsGetAll => "conversations.getAll",
            Self::ConversationsGetById => "conversations.getById",
            Self::ConversationsCreate => "conversations.create",
            Self::ConversationsDelete => "conversations.delete",
            Self::ConversationsRename => "conversations.rename",
            Self::ConversationsSendMessage => "conversations.sendMessage",
            Self::ConversationsSendAiResponse => "conversations.sendAiResponse",
            Self::DashboardsGetAll => "dashboards.getAll",
            Self::DashboardsGetById => "dashboards.getById",
            Self::DashboardsCreate => "dashboards.create",
            Self::DashboardsDelete => "dashboards.delete",
            Self::DashboardsAddWidget => "dashboards.addWidget",
            Self::DashboardsDeleteWidget => "dashboards.deleteWidget",
            Self::DashboardsReorderWidgets => "dashboards.reorderWidgets",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Namespace part of the name (`"conversations"` or `"dashboards"`).
    #[must_use]
    pub fn namespace(self) -> &'static str {
        split_procedure(self.name()).0
    }
}

// =============================================================================
// PROCEDURE INPUTS / OUTPUTS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdInput {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConversationInput {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameConversationInput {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    pub conversation_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAiResponseInput {
    pub conversation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDashboardInput {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWidgetInput {
    pub dashboard_id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: WidgetKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWidgetInput {
    pub dashboard_id: String,
    pub widget_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderWidgetsInput {
    pub dashboard_id: String,
    pub widget_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageOutput {
    pub user_message: Message,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAiResponseOutput {
    pub ai_message: Message,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuccessOutput {
    pub success: bool,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("not found")]
    struct NotFound;

    impl ErrorCode for NotFound {
        fn error_code(&self) -> &'static str {
            "E_NOT_FOUND"
        }
    }

    #[test]
    fn ok_envelope_wraps_data_under_result() {
        let json = serde_json::to_value(Envelope::ok(42)).unwrap();
        assert_eq!(json, serde_json::json!({"result": {"data": 42}}));
    }

    #[test]
    fn error_envelope_carries_code_and_message() {
        let env: Envelope<()> = Envelope::Error(RpcError::from_err(&NotFound));
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["error"]["code"], "E_NOT_FOUND");
        assert_eq!(json["error"]["message"], "not found");
        assert_eq!(json["error"]["retryable"], false);
    }

    #[test]
    fn into_result_round_trips_through_json() {
        let text = r#"{"error":{"code":"E_X","message":"boom"}}"#;
        let env: Envelope<serde_json::Value> = serde_json::from_str(text).unwrap();
        let err = env.into_result().unwrap_err();
        assert_eq!(err.code, "E_X");
        assert!(!err.retryable);
    }

    #[test]
    fn procedure_names_parse_back() {
        for procedure in Procedure::ALL {
            assert_eq!(Procedure::parse(procedure.name()), Some(procedure));
        }
        assert_eq!(Procedure::parse("conversations.nope"), None);
    }

    #[test]
    fn procedure_namespaces() {
        assert_eq!(Procedure::ConversationsSendMessage.namespace(), "conversations");
        assert_eq!(Procedure::DashboardsReorderWidgets.namespace(), "dashboards");
    }

    #[test]
    fn add_widget_input_defaults_kind_to_line() {
        let input: AddWidgetInput = serde_json::from_str(r#"{"dashboardId":"1","title":"t"}"#).unwrap();
        assert_eq!(input.kind, WidgetKind::Line);
    }

    #[test]
    fn split_procedure_extracts_namespace() {
        assert_eq!(split_procedure("conversations.getAll"), ("conversations", "getAll"));
        assert_eq!(split_procedure("healthz"), ("healthz", ""));
    }
}
