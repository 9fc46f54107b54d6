use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use crate::api::health::HealthState;
use crate::error::AppError;
use crate::runner::{unix_now, AppRunner};
use crate::types::RunOutcome;

#[derive(Clone)]
pub struct ApiState {
    pub runner: Arc<AppRunner>,
    /// Held for the duration of a run; concurrent triggers queue behind it
    /// instead of racing the watermark.
    pub run_lock: Arc<tokio::sync::Mutex<()>>,
    pub health: Arc<HealthState>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/run", post(trigger_run))
        .route("/health", get(get_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub watermark: Option<i64>,
    pub last_run_at: i64,
    pub runs_delivered: u64,
    pub runs_empty: u64,
    pub runs_failed: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn trigger_run(State(state): State<ApiState>) -> Result<Json<RunOutcome>, AppError> {
    let _guard = state.run_lock.lock().await;

    match state.runner.run_once().await {
        Ok(outcome) => {
            match &outcome {
                RunOutcome::NoActivity => state.health.record_empty(unix_now()),
                RunOutcome::Delivered { .. } => state.health.record_delivered(unix_now()),
            }
            Ok(Json(outcome))
        }
        Err(e) => {
            state.health.record_failure(unix_now());
            error!("Run failed: {e}");
            Err(e)
        }
    }
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        watermark: state.runner.watermark(),
        last_run_at: state.health.last_run_at(),
        runs_delivered: state.health.runs_delivered(),
        runs_empty: state.health.runs_empty(),
        runs_failed: state.health.runs_failed(),
    })
}
