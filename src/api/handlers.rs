//! API request handlers

use super::models::{
    BatchClassifyRequest, BatchClassifyResponse, CategoriesResponse, ClassifyRequest,
    HealthResponse, RootResponse,
};
use super::routes::AppState;
use crate::classifier::{ClassificationResult, ModelStatus};
use crate::error::ApiError;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

/// GET / - Service banner
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        service: "News Classifier Service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.classifier.model_config().repo_id.clone(),
        status: state.classifier.status().await,
    })
}

/// GET /health - Readiness, model metadata and uptime
///
/// Responds 503 until the model is ready.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let model_info = state.classifier.describe_model().await;
    let code = if model_info.status == ModelStatus::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(HealthResponse {
            status: HealthResponse::status_label(model_info.status).to_string(),
            model_loaded: model_info.is_loaded,
            model_info,
            uptime_secs: state.started_at.elapsed().as_secs_f64(),
            timestamp: chrono::Utc::now(),
        }),
    )
}

/// GET /metrics - Prometheus metrics
pub async fn metrics(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

/// POST /classify - Classify one text
pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let Json(req) = payload?;
    let result = state.classifier.classify(&req.text).await?;
    Ok(Json(result))
}

/// POST /classify/batch - Classify news items, preserving input order
pub async fn classify_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchClassifyRequest>, JsonRejection>,
) -> Result<Json<BatchClassifyResponse>, ApiError> {
    let Json(req) = payload?;
    let loaded = state.classifier.loaded().await?;

    if req.items.len() > state.max_batch_items {
        return Err(ApiError::Unprocessable(format!(
            "Batch contains {} items, limit is {}",
            req.items.len(),
            state.max_batch_items
        )));
    }

    crate::metrics::record_batch(req.items.len());

    // A large batch holds the CPU for a while; run it on the blocking pool
    let results = tokio::task::spawn_blocking(move || loaded.classify_batch(&req.items))
        .await
        .map_err(|e| anyhow::anyhow!("Batch classification task failed: {}", e))?;

    Ok(Json(BatchClassifyResponse { results }))
}

/// GET /categories - Native label mapping and project categories
pub async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse::from_table(state.classifier.categories()))
}
