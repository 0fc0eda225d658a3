//! REST endpoints for sessions, flows, guidance, and audio.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AudioError, Error, FlowError};
use crate::guidance::GuidanceResult;
use crate::results::ArtifactState;

use super::manager::{AnswerAdvance, BackNav, SessionManager};

/// Shared state for session routes.
#[derive(Clone)]
pub struct SessionRouteState {
    pub manager: Arc<SessionManager>,
}

/// Build the session REST routes.
pub fn session_routes(state: SessionRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}/flows", get(list_flows))
        .route("/api/sessions/{id}/flow", post(select_flow))
        .route("/api/sessions/{id}/question", get(current_question))
        .route("/api/sessions/{id}/answer", post(answer))
        .route("/api/sessions/{id}/back", post(go_back))
        .route("/api/sessions/{id}/guidance", get(guidance).post(retry_guidance))
        .route("/api/sessions/{id}/audio", get(audio).post(request_audio))
        .route("/api/sessions/{id}/tab", post(select_tab))
        .route("/api/sessions/{id}/restart", post(restart))
        .with_state(state)
}

/// Error wrapper that maps the taxonomy onto HTTP statuses.
///
/// Lost session state is a 404 the client turns into a redirect;
/// contract violations are 4xx; external-service failures are 502.
struct ApiError(Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Session(_) => StatusCode::NOT_FOUND,
            Error::Flow(FlowError::UnknownFlow { .. }) => StatusCode::NOT_FOUND,
            Error::Flow(FlowError::NoActiveFlow) => StatusCode::CONFLICT,
            Error::Audio(AudioError::NoGuidance) => StatusCode::CONFLICT,
            Error::Flow(FlowError::InvalidOption { .. })
            | Error::Request(_)
            | Error::Presentation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Guidance(_) | Error::Audio(_) => StatusCode::BAD_GATEWAY,
            Error::Catalog(_) | Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    language: String,
}

/// POST /api/sessions
///
/// Opens a session for the chosen language.
async fn create_session(
    State(state): State<SessionRouteState>,
    Json(body): Json<CreateSessionRequest>,
) -> ApiResult<impl IntoResponse> {
    let id = state.manager.create(&body.language).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "sessionId": id, "language": body.language })),
    ))
}

/// GET /api/sessions/{id}/flows
async fn list_flows(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let flows = state.manager.flows(id).await?;
    Ok(Json(json!({ "flows": flows })))
}

#[derive(Debug, Deserialize)]
struct SelectFlowRequest {
    #[serde(rename = "flowId")]
    flow_id: String,
}

/// POST /api/sessions/{id}/flow
async fn select_flow(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectFlowRequest>,
) -> ApiResult<impl IntoResponse> {
    let view = state.manager.select_flow(id, &body.flow_id).await?;
    Ok(Json(json!({ "question": view })))
}

/// GET /api/sessions/{id}/question
async fn current_question(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let view = state.manager.question(id).await?;
    Ok(Json(json!({ "question": view })))
}

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    value: String,
}

/// POST /api/sessions/{id}/answer
async fn answer(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnswerRequest>,
) -> ApiResult<impl IntoResponse> {
    let advance = state.manager.answer(id, &body.value).await?;
    let body = match advance {
        AnswerAdvance::Question(view) => json!({ "complete": false, "question": view }),
        AnswerAdvance::Complete => json!({ "complete": true }),
    };
    Ok(Json(body))
}

/// POST /api/sessions/{id}/back
async fn go_back(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let nav = state.manager.go_back(id).await?;
    let body = match nav {
        BackNav::Question(view) => json!({ "exit": false, "question": view }),
        BackNav::Exit => json!({ "exit": true }),
    };
    Ok(Json(body))
}

/// GET /api/sessions/{id}/guidance
async fn guidance(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state.manager.guidance(id).await?;
    Ok(Json(guidance_body(&snapshot)))
}

/// POST /api/sessions/{id}/guidance
///
/// Re-fires generation after a failure; a no-op while one is in flight.
async fn retry_guidance(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state.manager.retry_generation(id).await?;
    Ok(Json(guidance_body(&snapshot)))
}

fn guidance_body(snapshot: &ArtifactState<GuidanceResult>) -> serde_json::Value {
    match snapshot {
        ArtifactState::Ready(result) => json!({ "state": "ready", "result": result }),
        ArtifactState::Failed(message) => json!({ "state": "failed", "error": message }),
        other => json!({ "state": other.name() }),
    }
}

/// GET /api/sessions/{id}/audio
async fn audio(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state.manager.audio(id).await?;
    Ok(Json(audio_body(&snapshot)))
}

/// POST /api/sessions/{id}/audio
///
/// Triggers synthesis; a repeat trigger while one is loading is a no-op.
async fn request_audio(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state.manager.request_audio(id).await?;
    Ok(Json(audio_body(&snapshot)))
}

fn audio_body(snapshot: &ArtifactState<String>) -> serde_json::Value {
    match snapshot {
        ArtifactState::Ready(url) => json!({ "state": "ready", "audioUrl": url }),
        ArtifactState::Failed(message) => json!({ "state": "failed", "error": message }),
        other => json!({ "state": other.name() }),
    }
}

#[derive(Debug, Deserialize)]
struct SelectTabRequest {
    tab: String,
}

/// POST /api/sessions/{id}/tab
async fn select_tab(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectTabRequest>,
) -> ApiResult<impl IntoResponse> {
    let tab = state.manager.select_tab(id, &body.tab).await?;
    Ok(Json(json!({ "activeTab": tab })))
}

/// POST /api/sessions/{id}/restart
async fn restart(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.manager.restart(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
