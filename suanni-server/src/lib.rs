//! HTTP front for the interpretation pipeline.
//!
//! Routes:
//! - `GET  /health`
//! - `POST /api/interpret` (server-sent events)
//! - `POST /api/preview`
//! - `POST /api/interpret-relationship`

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use futures::{Stream, StreamExt};
use serde::Serialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use suanni_core::{
    CalendarFacts, InterpretError, InterpretRequest, Interpreter, Preview, RelationshipAnalyzer,
    RelationshipError, RelationshipReport, RelationshipRequest, StarFacts,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub interpreter: Interpreter,
    pub analyzer: RelationshipAnalyzer,
}

impl AppState {
    pub fn new(interpreter: Interpreter, analyzer: RelationshipAnalyzer) -> Self {
        Self {
            interpreter,
            analyzer,
        }
    }
}

type SharedState = Arc<AppState>;

/// Errors surfaced to HTTP callers as `{"error": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    MissingChart,
    IncompleteChart,
    Unavailable,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::MissingChart | ApiError::IncompleteChart => StatusCode::BAD_REQUEST,
            ApiError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApiError::MissingChart => "缺少命盤資料",
            ApiError::IncompleteChart => "命盤資料不完整",
            ApiError::Unavailable => "AI 服務暫時不可用",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

impl From<InterpretError> for ApiError {
    fn from(err: InterpretError) -> Self {
        match err {
            InterpretError::MissingChart => ApiError::MissingChart,
            InterpretError::Upstream(_) => ApiError::Unavailable,
        }
    }
}

impl From<RelationshipError> for ApiError {
    fn from(err: RelationshipError) -> Self {
        match err {
            RelationshipError::IncompleteChart => ApiError::IncompleteChart,
            RelationshipError::Upstream(_) => ApiError::Unavailable,
        }
    }
}

/// Build the router with every route and layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/interpret", post(interpret_handler))
        .route("/api/preview", post(preview_handler))
        .route("/api/interpret-relationship", post(relationship_handler))
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /api/interpret`: relay events as SSE, or one JSON error before streaming.
async fn interpret_handler(
    State(state): State<SharedState>,
    Json(request): Json<InterpretRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let relay = state.interpreter.interpret(&request).await?;
    let events = relay.map(|event| Ok(Event::default().data(event.to_json().to_string())));
    Ok(Sse::new(events))
}

/// `POST /api/preview`: the stem-table teaser, no generative call.
async fn preview_handler(Json(request): Json<InterpretRequest>) -> Result<Json<Preview>, ApiError> {
    let calendar = request
        .calendar_chart
        .as_ref()
        .filter(|chart| !chart.is_null())
        .ok_or(ApiError::MissingChart)?;

    let calendar = CalendarFacts::from_chart(calendar);
    let star = request
        .star_chart
        .as_ref()
        .map(StarFacts::from_chart)
        .unwrap_or_default();
    let preview = Preview::from_facts(&calendar, &star);
    info!(day_master = %preview.day_master, "preview served");
    Ok(Json(preview))
}

/// `POST /api/interpret-relationship`: one non-streaming analysis.
async fn relationship_handler(
    State(state): State<SharedState>,
    Json(request): Json<RelationshipRequest>,
) -> Result<Json<RelationshipReport>, ApiError> {
    let report = state.analyzer.analyze(&request).await?;
    Ok(Json(report))
}
