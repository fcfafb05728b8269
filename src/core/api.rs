//! HTTP API for the talk engine
//!
//! Endpoints:
//! - GET  /health            - Health check
//! - POST /talks/validate    - Validate a talk document
//! - POST /talks             - Validate and store a talk
//! - GET  /talks/:id         - Fetch a stored talk
//! - POST /talks/capture     - Linear capture from transcript lines
//! - POST /talks/:id/step    - Resolve one conversational step
//! - POST /talks/:id/aggregate - Aggregate survey responses
//!
//! Engine errors map to 400 with a stable code; capture-internal failures
//! map to 500 because they indicate a defect, not bad input.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{
    talk_key, LinearCapture, MemoryStore, RuleChecker, StepOutcome, SurveyAggregator, TalkGraph,
    TalkStore,
};
use crate::types::{QuestionStats, StoreError, SurveyResponse, Talk};

/// App state shared by all handlers
pub struct AppState {
    pub store: Box<dyn TalkStore>,
}

/// Error payload returned on every non-2xx response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

type ErrorResponse = (StatusCode, Json<ApiError>);

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub talks_stored: usize,
}

/// Validation response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub talk_id: String,
}

/// Linear capture request
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub author_id: String,
    pub lines: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Step resolution request
#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub question_id: String,
    pub answer_id: String,
}

/// Step resolution response
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question_id: Option<String>,
}

/// Create the API router
pub fn create_router(store: impl TalkStore + 'static) -> Router {
    let state = Arc::new(AppState {
        store: Box::new(store),
    });

    Router::new()
        .route("/health", get(health))
        .route("/talks", post(create_talk))
        .route("/talks/validate", post(validate_talk))
        .route("/talks/capture", post(capture_talk))
        .route("/talks/:id", get(get_talk))
        .route("/talks/:id/step", post(step_talk))
        .route("/talks/:id/aggregate", post(aggregate_talk))
        .with_state(state)
}

fn bad_request(error: String, code: &str) -> ErrorResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error,
            code: code.to_string(),
        }),
    )
}

fn not_found(talk_id: &str) -> ErrorResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error: format!("talk {} not found", talk_id),
            code: "TALK_NOT_FOUND".to_string(),
        }),
    )
}

fn store_failure(err: StoreError) -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError {
            error: err.to_string(),
            code: "STORE_FAILURE".to_string(),
        }),
    )
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ErrorResponse> {
    let talks_stored = state.store.count().map_err(store_failure)?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        talks_stored,
    }))
}

/// Validate a talk document without storing it
async fn validate_talk(Json(talk): Json<Talk>) -> Result<Json<ValidateResponse>, ErrorResponse> {
    match RuleChecker::validate_talk(&talk) {
        Ok(()) => Ok(Json(ValidateResponse {
            valid: true,
            talk_id: talk.id,
        })),
        Err(err) => Err(bad_request(err.to_string(), err.code())),
    }
}

/// Validate and store a talk
async fn create_talk(
    State(state): State<Arc<AppState>>,
    Json(talk): Json<Talk>,
) -> Result<(StatusCode, Json<Talk>), ErrorResponse> {
    if let Err(err) = RuleChecker::validate_talk(&talk) {
        return Err(bad_request(err.to_string(), err.code()));
    }

    state
        .store
        .put(&talk_key(&talk.id), &talk)
        .map_err(store_failure)?;

    Ok((StatusCode::CREATED, Json(talk)))
}

/// Fetch a stored talk
async fn get_talk(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Talk>, ErrorResponse> {
    let talk = state
        .store
        .get(&talk_key(&id))
        .map_err(store_failure)?
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(talk))
}

/// Capture a linear talk from transcript lines and store it
async fn capture_talk(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CaptureRequest>,
) -> Result<(StatusCode, Json<Talk>), ErrorResponse> {
    let talk = match LinearCapture::create_linear_talk(&req.author_id, &req.lines, &req.tags) {
        Ok(talk) => talk,
        Err(err) if err.is_internal() => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: err.to_string(),
                    code: err.code().to_string(),
                }),
            ));
        }
        Err(err) => return Err(bad_request(err.to_string(), err.code())),
    };

    state
        .store
        .put(&talk_key(&talk.id), &talk)
        .map_err(store_failure)?;

    Ok((StatusCode::CREATED, Json(talk)))
}

/// Resolve one conversational step on a stored talk
async fn step_talk(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StepRequest>,
) -> Result<Json<StepResponse>, ErrorResponse> {
    let talk = state
        .store
        .get(&talk_key(&id))
        .map_err(store_failure)?
        .ok_or_else(|| not_found(&id))?;

    let graph = TalkGraph::new(&talk);
    match graph.next_step(&req.question_id, &req.answer_id) {
        Ok(outcome) => {
            let next_question_id = match &outcome {
                StepOutcome::Next(next) => Some(next.clone()),
                _ => None,
            };
            Ok(Json(StepResponse {
                outcome: outcome.to_string(),
                next_question_id,
            }))
        }
        Err(err) => Err(bad_request(err.to_string(), err.code())),
    }
}

/// Aggregate survey responses against a stored talk
async fn aggregate_talk(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(responses): Json<Vec<SurveyResponse>>,
) -> Result<Json<Vec<QuestionStats>>, ErrorResponse> {
    let talk = state
        .store
        .get(&talk_key(&id))
        .map_err(store_failure)?
        .ok_or_else(|| not_found(&id))?;

    match SurveyAggregator::aggregate(&talk, &responses) {
        Ok(stats) => Ok(Json(stats)),
        Err(err) => Err(bad_request(err.to_string(), err.code())),
    }
}

/// Run the API server
pub async fn run_server(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(MemoryStore::new());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("talkflow API running on {}", addr);
    println!("  GET  /health               - Health check");
    println!("  POST /talks/validate       - Validate a talk");
    println!("  POST /talks                - Create a talk");
    println!("  GET  /talks/:id            - Fetch a talk");
    println!("  POST /talks/capture        - Linear capture");
    println!("  POST /talks/:id/step       - Resolve a step");
    println!("  POST /talks/:id/aggregate  - Aggregate survey responses");
    axum::serve(listener, router).await?;
    Ok(())
}
