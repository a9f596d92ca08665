//! Route handlers.
//!
//! `/predict` walks a request through
//! `Received → Validated → Mapped → Scored → Persisted → Responded`.
//! Body, validation and mapping failures stop at `Rejected` before the model
//! is touched; a scoring failure stops at `Failed` before anything is
//! recorded. Recording is handed off and cannot change the response.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::features::{self, ChurnRequest, OneHotGroup, FEATURE_COUNT, FEATURE_NAMES, ONE_HOT_GROUPS};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::model::{PredictionResult, ScoringError};
use crate::observability::metrics;

/// `POST /predict`
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<ChurnRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    tracing::info!("request_received");

    let outcome = run_prediction(&state, payload).await;

    let status = match &outcome {
        Ok(_) => 200,
        Err(e) => e.status().as_u16(),
    };
    metrics::record_request(status);

    outcome.map(Json)
}

async fn run_prediction(
    state: &AppState,
    payload: Result<Json<ChurnRequest>, JsonRejection>,
) -> Result<PredictionResult, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "invalid_customer_input");
        ApiError::from(rejection)
    })?;

    features::validate_with(&request, state.validation_mode).map_err(|e| {
        tracing::warn!(group = e.group(), error = %e, "invalid_customer_input");
        e
    })?;

    // Only reachable on schema/contract drift, which is a deployment fault.
    let row = features::map(&request).map_err(|e| {
        tracing::error!(error = %e, "feature_mapping_failed");
        e
    })?;

    tracing::info!(num_features = row.len(), "input_mapped_to_features");

    let predictor = state.predictor.clone();
    let started = Instant::now();
    let scored = tokio::task::spawn_blocking(move || predictor.score(&row))
        .await
        .map_err(|e| ScoringError::Runtime(e.to_string()))
        .and_then(|result| result);
    let latency = started.elapsed();

    let result = scored.map_err(|e| {
        tracing::error!(error = %e, "prediction_failed");
        e
    })?;

    tracing::info!(
        latency_ms = latency.as_secs_f64() * 1000.0,
        churn_label = result.churn_label,
        probability = result.probability,
        model_version = %result.model_version,
        "prediction_completed"
    );
    metrics::record_prediction(result.churn_label, latency);

    state
        .recorder
        .record(&result.model_version, result.probability, result.churn_label)
        .detach();

    Ok(result)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_name: String,
    pub model_version: String,
    pub persistence_enabled: bool,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        model_name: state.predictor.model_name().to_string(),
        model_version: state.predictor.model_version().to_string(),
        persistence_enabled: state.recorder.is_enabled(),
    })
}

#[derive(Debug, Serialize)]
pub struct ContractView {
    pub feature_count: usize,
    pub features: &'static [&'static str],
    pub groups: &'static [OneHotGroup],
}

/// `GET /contract`
pub async fn contract() -> Json<ContractView> {
    Json(ContractView {
        feature_count: FEATURE_COUNT,
        features: &FEATURE_NAMES,
        groups: &ONE_HOT_GROUPS,
    })
}
