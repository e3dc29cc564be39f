use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::agent::BackendError;
use crate::memory::{Message, SessionStore, DEFAULT_SESSION};
use crate::orchestrator::{FeedbackOption, Narrator, FEEDBACK_OPTIONS};
use crate::response::TurnReply;
use crate::services::ProfanityClient;

/// Header naming the conversation a request belongs to
pub const SESSION_HEADER: &str = "x-session-id";

/// Longest accepted session id, in bytes
pub const MAX_SESSION_ID_LEN: usize = 128;

pub enum ServerError {
    Backend(BackendError),
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::Backend(err) => {
                warn!("Turn failed: {}", err);
                let status = match err {
                    BackendError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                    BackendError::Upstream(_) => StatusCode::BAD_GATEWAY,
                };
                (status, err.to_string())
            }
            ServerError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ServerError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<BackendError> for ServerError {
    fn from(err: BackendError) -> Self {
        ServerError::Backend(err)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub narrator: Arc<Narrator>,
    pub sessions: Arc<SessionStore>,
    pub profanity: Arc<ProfanityClient>,
}

#[derive(Deserialize)]
struct QuestionRequest {
    #[serde(default)]
    prompt: String,
}

#[derive(Deserialize)]
struct FeedbackRequest {
    #[serde(default)]
    feedback_messages: Vec<String>,
}

#[derive(Deserialize)]
struct ProfanityRequest {
    #[serde(default)]
    text: String,
}

fn session_id(headers: &HeaderMap) -> Result<String, ServerError> {
    let id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_SESSION);
    if id.len() > MAX_SESSION_ID_LEN {
        return Err(ServerError::BadRequest(format!(
            "{} must be at most {} bytes",
            SESSION_HEADER, MAX_SESSION_ID_LEN
        )));
    }
    Ok(id.to_string())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/start", get(start_handler))
        .route("/api/question", post(question_handler))
        .route("/api/feedback", post(feedback_handler))
        .route("/api/feedback/options", get(feedback_options_handler))
        .route("/api/history", get(history_handler))
        .route("/api/geoip", post(profanity_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(state: AppState, addr: &str) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Story backend listening at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn start_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TurnReply>, ServerError> {
    let session = state.sessions.session(&session_id(&headers)?).await;
    let mut conversation = session.lock().await;
    let reply = state.narrator.start(&mut conversation).await?;
    Ok(Json(reply))
}

async fn question_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<TurnReply>, ServerError> {
    let session = state.sessions.session(&session_id(&headers)?).await;
    let mut conversation = session.lock().await;
    let reply = state.narrator.question(&mut conversation, req.prompt).await?;
    Ok(Json(reply))
}

async fn feedback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<TurnReply>, ServerError> {
    let session = state.sessions.session(&session_id(&headers)?).await;
    let mut conversation = session.lock().await;
    let reply = state.narrator.feedback(&mut conversation, req.feedback_messages).await?;
    Ok(Json(reply))
}

async fn feedback_options_handler() -> Json<&'static [FeedbackOption]> {
    Json(FEEDBACK_OPTIONS)
}

async fn history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Message>>, ServerError> {
    let id = session_id(&headers)?;
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| ServerError::NotFound(format!("no conversation for session '{}'", id)))?;
    let snapshot = session.lock().await.snapshot();
    Ok(Json(snapshot))
}

async fn profanity_handler(
    State(state): State<AppState>,
    body: Result<Json<ProfanityRequest>, JsonRejection>,
) -> Response {
    let result = match body {
        Ok(Json(req)) => state.profanity.score(&req.text).await.map_err(|e| e.to_string()),
        Err(rejection) => Err(rejection.body_text()),
    };
    match result {
        Ok(json) => Json(json).into_response(),
        Err(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response(),
    }
}
