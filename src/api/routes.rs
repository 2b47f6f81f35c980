//! API route definitions

use crate::classifier::NewsClassifier;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<NewsClassifier>,
    pub prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
    pub started_at: Instant,
    pub max_batch_items: usize,
}

impl AppState {
    pub fn new(
        classifier: Arc<NewsClassifier>,
        prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
        max_batch_items: usize,
    ) -> Self {
        Self {
            classifier,
            prometheus_handle,
            started_at: Instant::now(),
            max_batch_items,
        }
    }
}

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        // Health and status
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        // Classification
        .route("/classify", post(handlers::classify))
        .route("/classify/batch", post(handlers::classify_batch))
        .route("/categories", get(handlers::categories))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
