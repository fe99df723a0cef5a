//! Conversation procedures.

use axum::http::StatusCode;

use super::{Failure, decode, encode, unknown_procedure};
use crate::rpc::{
    CreateConversationInput, IdInput, Procedure, RenameConversationInput, RpcError, SendAiResponseInput,
    SendAiResponseOutput, SendMessageInput, SendMessageOutput, SuccessOutput,
};
use crate::services::conversation::{self, ConversationError};
use crate::state::AppState;

pub(crate) fn conversation_error_to_status(err: &ConversationError) -> StatusCode {
    match err {
        ConversationError::NotFound(_) => StatusCode::NOT_FOUND,
        ConversationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    }
}

fn failure(err: ConversationError) -> Failure {
    (conversation_error_to_status(&err), RpcError::from_err(&err))
}

pub(crate) async fn dispatch(
    state: &AppState,
    procedure: Procedure,
    input: serde_json::Value,
) -> Result<serde_json::Value, Failure> {
    match procedure {
        Procedure::ConversationsGetAll => encode(conversation::list_conversations(state).await),
        Procedure::ConversationsGetById => {
            let IdInput { id } = decode(input)?;
            let found = conversation::get_conversation(state, &id)
                .await
                .map_err(failure)?;
            encode(found)
        }
        Procedure::ConversationsCreate => {
            let CreateConversationInput { title } = decode(input)?;
            encode(conversation::create_conversation(state, &title).await)
        }
        Procedure::ConversationsDelete => {
            let IdInput { id } = decode(input)?;
            conversation::delete_conversation(state, &id)
                .await
                .map_err(failure)?;
            encode(SuccessOutput { success: true })
        }
        Procedure::ConversationsRename => {
            let RenameConversationInput { id, title } = decode(input)?;
            let renamed = conversation::rename_conversation(state, &id, &title)
                .await
                .map_err(failure)?;
            encode(renamed)
        }
        Procedure::ConversationsSendMessage => {
            let SendMessageInput { conversation_id, content } = decode(input)?;
            let user_message = conversation::send_message(state, &conversation_id, &content)
                .await
                .map_err(failure)?;
            encode(SendMessageOutput { user_message })
        }
        Procedure::ConversationsSendAiResponse => {
            let SendAiResponseInput { conversation_id, user_message } = decode(input)?;
            let ai_message = conversation::send_ai_response(state, &conversation_id, user_message.as_deref())
                .await
                .map_err(failure)?;
            encode(SendAiResponseOutput { ai_message })
        }
        other => Err(unknown_procedure(other.name())),
    }
}
