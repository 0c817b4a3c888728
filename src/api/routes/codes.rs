//! Code lookup routes.
//!
//! All three endpoints accept `{"prompt": <string>}` and answer
//! `{"codes": [...]}` on success. Any non-200 status carries an
//! `{"error": <string>}` body instead — an empty code list is a successful
//! response, distinct from a failed one.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::api::server::AppState;
use crate::codes::CodesResult;
use crate::error::{ProviderError, ScoutError};
use crate::orchestrator::EndpointId;

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// POST /codes — simple code list via the Gemini variant.
pub async fn get_codes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PromptRequest>,
) -> (StatusCode, Json<Value>) {
    run(state, EndpointId::Codes, req).await
}

/// POST /codes-detailed — detailed code records via the Gemini variant.
pub async fn get_detailed_codes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PromptRequest>,
) -> (StatusCode, Json<Value>) {
    run(state, EndpointId::CodesDetailed, req).await
}

/// POST /codes-detailed-chatgpt — detailed code records via the OpenAI variant.
pub async fn get_detailed_codes_chatgpt(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PromptRequest>,
) -> (StatusCode, Json<Value>) {
    run(state, EndpointId::CodesDetailedChatgpt, req).await
}

async fn run(
    state: Arc<AppState>,
    endpoint: EndpointId,
    req: PromptRequest,
) -> (StatusCode, Json<Value>) {
    match state.finder.clone().handle(endpoint, &req.prompt).await {
        Ok(result) => (StatusCode::OK, Json(result_body(result))),
        Err(err) => error_response(err),
    }
}

fn result_body(result: CodesResult) -> Value {
    match result {
        CodesResult::Simple(codes) => json!({ "codes": codes }),
        CodesResult::Detailed(codes) => json!({ "codes": codes }),
    }
}

/// Map a lookup failure to a status: 400 for unusable prompts, 503 when
/// retries were exhausted on a transient condition, 502 for everything the
/// upstream rejected outright.
fn error_response(err: ScoutError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        ScoutError::EmptyPrompt => StatusCode::BAD_REQUEST,
        ScoutError::Provider(ProviderError::Transient(_)) => StatusCode::SERVICE_UNAVAILABLE,
        ScoutError::Provider(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(%err, "code lookup failed");
    }
    (status, Json(json!({ "error": err.to_string() })))
}
