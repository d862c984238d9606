//! Reflect HTTP API
//!
//! Axum-based HTTP server for the reflection dialogue, the self-assessment,
//! and lifecycle analytics.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a pure
//! inner function. The inner functions are directly testable without axum dispatch
//! machinery.
//!
//! Endpoints:
//! - GET  /health              : health check with generation mode
//! - GET  /version             : server version info
//! - POST /chat                : advance the reflection dialogue
//! - GET  /chat/opening        : opening greeting for a new dialogue
//! - POST /analytics           : append a lifecycle event
//! - GET  /analytics           : aggregate event counts
//! - GET  /assessment/questions: self-assessment question bank
//! - POST /assessment          : score a completed self-assessment
//! - GET  /programs            : program catalog

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use reflect_core::assessment::{self, QUESTIONS};
use reflect_core::dialogue::OPENING_MESSAGE;
use reflect_core::{AnalyticsEvent, ChatMessage, Program, ReflectConfig};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::subsystems::analytics::EventLog;
use crate::subsystems::dialogue::DialogueController;

/// Shared state for all HTTP handlers
pub struct HttpState {
    pub config: ReflectConfig,
    pub controller: DialogueController,
    pub events: EventLog,
}

impl HttpState {
    pub fn from_config(config: ReflectConfig) -> Self {
        let controller = DialogueController::from_config(&config.generation);
        let events = EventLog::new(&config.analytics.log_path);
        Self {
            config,
            controller,
            events,
        }
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/chat", post(chat_handler))
        .route("/chat/opening", get(opening_handler))
        .route("/analytics", post(record_event_handler).get(analytics_summary_handler))
        .route("/assessment/questions", get(questions_handler))
        .route("/assessment", post(assessment_handler))
        .route("/programs", get(programs_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<HttpState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", state.config.http.host, state.config.http.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Reflect HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub answers: BTreeMap<u8, String>,
}

/// Standard HTTP error body
pub fn error_body(msg: impl Into<String>) -> serde_json::Value {
    serde_json::json!({
        "error": msg.into(),
        "status": "error",
    })
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner health: reports whether live generation is configured.
pub fn health_inner(controller: &DialogueController) -> serde_json::Value {
    serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "generation": if controller.is_live() { "live" } else { "fallback" },
    })
}

/// Inner version: returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "reflect/1",
    })
}

/// Inner chat: an empty transcript is a client error; everything else is 200.
pub async fn chat_inner(
    controller: &DialogueController,
    req: ChatRequest,
) -> (StatusCode, serde_json::Value) {
    match controller.advance(&req.messages).await {
        Ok(advance) => {
            tracing::debug!(
                complete = advance.is_complete(),
                source = ?advance.source,
                turns = req.messages.len(),
                "Dialogue advanced"
            );
            (StatusCode::OK, advance.to_json())
        }
        Err(e) => (StatusCode::BAD_REQUEST, error_body(e.to_string())),
    }
}

pub fn opening_inner() -> serde_json::Value {
    serde_json::json!({ "message": OPENING_MESSAGE })
}

/// Inner record: storage failures are logged and still reported as success.
pub async fn record_event_inner(
    events: &EventLog,
    event: AnalyticsEvent,
) -> (StatusCode, serde_json::Value) {
    if let Err(e) = event.validate() {
        return (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "success": false, "error": e.to_string() }),
        );
    }
    events.append(event).await;
    (StatusCode::OK, serde_json::json!({ "success": true }))
}

/// Inner summary: zero counts when no log exists yet.
pub async fn analytics_summary_inner(events: &EventLog) -> (StatusCode, serde_json::Value) {
    match events.aggregate().await {
        Ok(summary) => match serde_json::to_value(summary) {
            Ok(v) => (StatusCode::OK, v),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())),
        },
        Err(e) => {
            tracing::error!(error = %e, "Analytics retrieval error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Failed to retrieve analytics"),
            )
        }
    }
}

pub fn questions_inner() -> serde_json::Value {
    serde_json::json!({ "questions": &QUESTIONS })
}

/// Inner assessment: all five questions must be answered with their own options.
pub fn assessment_inner(req: AssessmentRequest) -> (StatusCode, serde_json::Value) {
    match assessment::score(&req.answers) {
        Ok(profile) => (StatusCode::OK, serde_json::json!(profile)),
        Err(e) => (StatusCode::BAD_REQUEST, error_body(e.to_string())),
    }
}

pub fn programs_inner() -> serde_json::Value {
    let programs: Vec<serde_json::Value> =
        Program::ALL.iter().map(|p| p.catalog_entry()).collect();
    serde_json::json!({ "programs": programs })
}

// ============================================================================
// Axum handler wrappers (thin: delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(health_inner(&state.controller)))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn chat_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let (status, body) = chat_inner(&state.controller, req).await;
    (status, Json(body))
}

pub async fn opening_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(opening_inner()))
}

pub async fn record_event_handler(
    State(state): State<Arc<HttpState>>,
    Json(event): Json<AnalyticsEvent>,
) -> impl IntoResponse {
    let (status, body) = record_event_inner(&state.events, event).await;
    (status, Json(body))
}

pub async fn analytics_summary_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = analytics_summary_inner(&state.events).await;
    (status, Json(body))
}

pub async fn questions_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(questions_inner()))
}

pub async fn assessment_handler(Json(req): Json<AssessmentRequest>) -> impl IntoResponse {
    let (status, body) = assessment_inner(req);
    (status, Json(body))
}

pub async fn programs_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(programs_inner()))
}

// ============================================================================
// Unit Tests: call inner functions directly
// ============================================================================
