//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One RPC endpoint, `POST /trpc/{procedure}`, carries every mock backend
//! call. The handler decodes the procedure name, routes on its namespace
//! and wraps the outcome in the RPC envelope. `/healthz` answers liveness.


pub mod conversations;
pub mod dashboards;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::rpc::{Envelope, Procedure, RpcError};
use crate::state::AppState;

/// A failed call: HTTP status plus the error envelope body.
pub(crate) type Failure = (StatusCode, RpcError);

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/trpc/{procedure}", post(call))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run one procedure for `POST /trpc/{procedure}`.
async fn call(State(state): State<AppState>, Path(name): Path<String>, body: Bytes) -> Response {
    debug!(procedure = %name, body_len = body.len(), "rpc call");

    let result = match decode_body(&body) {
        Ok(input) => route(&state, &name, input).await,
        Err(failure) => Err(failure),
    };

    match result {
        Ok(data) => Json(Envelope::ok(data)).into_response(),
        Err((status, err)) => {
            warn!(procedure = %name, %status, code = %err.code, "rpc call failed");
            (status, Json(Envelope::<()>::Error(err))).into_response()
        }
    }
}

async fn route(state: &AppState, name: &str, input: serde_json::Value) -> Result<serde_json::Value, Failure> {
    let Some(procedure) = Procedure::parse(name) else {
        return Err(unknown_procedure(name));
    };
    match procedure.namespace() {
        "conversations" => conversations::dispatch(state, procedure, input).await,
        "dashboards" => dashboards::dispatch(state, procedure, input).await,
        _ => Err(unknown_procedure(name)),
    }
}

/// An empty body is a procedure without input.
fn decode_body(body: &[u8]) -> Result<serde_json::Value, Failure> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| (StatusCode::BAD_REQUEST, RpcError::bad_request(format!("malformed JSON body: {e}"))))
}

pub(crate) fn decode<T: DeserializeOwned>(input: serde_json::Value) -> Result<T, Failure> {
    serde_json::from_value(input)
        .map_err(|e| (StatusCode::BAD_REQUEST, RpcError::bad_request(format!("invalid input: {e}"))))
}

pub(crate) fn encode<T: Serialize>(value: T) -> Result<serde_json::Value, Failure> {
    serde_json::to_value(value).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            RpcError { code: "E_ENCODE".into(), message: e.to_string(), retryable: false },
        )
    })
}

pub(crate) fn unknown_procedure(name: &str) -> Failure {
    (
        StatusCode::NOT_FOUND,
        RpcError { code: "E_UNKNOWN_PROCEDURE".into(), message: format!("unknown procedure: {name}"), retryable: false },
    )
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
