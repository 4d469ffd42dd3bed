//! HTTP handlers for the advisory endpoints
//!
//! These handlers connect axum routes to the application service and do
//! no business logic beyond id parsing and error mapping.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{AdvisoryError, AdvisoryService};
use crate::domain::foundation::SessionId;

use super::dto::{ChatRequest, ChatResponse, ErrorResponse, HistoryResponse, ResetResponse, TurnDto};

/// Shared application state for the advisory routes
#[derive(Clone)]
pub struct AdvisoryAppState {
    pub service: Arc<AdvisoryService>,
}

impl AdvisoryAppState {
    pub fn new(service: Arc<AdvisoryService>) -> Self {
        Self { service }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn map_error(err: AdvisoryError) -> HandlerError {
    let status = match &err {
        AdvisoryError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        AdvisoryError::Validation(_) => StatusCode::BAD_REQUEST,
        AdvisoryError::Generation(_) => StatusCode::BAD_GATEWAY,
        AdvisoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::from(err.to_domain_error())))
}

fn parse_session_id(raw: &str) -> Result<SessionId, HandlerError> {
    SessionId::from_str(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session_id format")),
        )
    })
}

/// Run one conversational turn
///
/// POST /api/chat
pub async fn chat(
    State(state): State<AdvisoryAppState>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let session_id = match &req.session_id {
        Some(raw) => parse_session_id(raw)?,
        None => SessionId::new(),
    };

    let reply = state
        .service
        .handle_turn(session_id, &req.message)
        .await
        .map_err(map_error)?;

    Ok(Json(ChatResponse {
        session_id: session_id.to_string(),
        reply,
    }))
}

/// Reset a session's checklist progress
///
/// POST /api/sessions/:id/reset
pub async fn reset_session(
    State(state): State<AdvisoryAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let session_id = parse_session_id(&id)?;

    state
        .service
        .reset_session(session_id)
        .await
        .map_err(map_error)?;

    Ok(Json(ResetResponse {
        session_id: session_id.to_string(),
        message: "Session reset. Tell me about your next initiative.".to_string(),
    }))
}

/// Read a session's conversation history
///
/// GET /api/sessions/:id/history
pub async fn history(
    State(state): State<AdvisoryAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let session_id = parse_session_id(&id)?;

    let turns = state
        .service
        .conversation(session_id)
        .await
        .map_err(map_error)?;

    Ok(Json(HistoryResponse {
        session_id: session_id.to_string(),
        turns: turns.iter().map(TurnDto::from).collect(),
    }))
}

/// Liveness probe
///
/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
