//! Prometheus metrics

use crate::categories::CategoryId;
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::time::Duration;

/// How a classification result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Label came from the model
    Model,
    /// Input was empty after normalization
    Empty,
    /// Inference failed and the default category was used
    Error,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }
}

/// Setup Prometheus metrics exporter
/// Returns a handle that can be used to retrieve metrics
pub fn setup_metrics() -> Result<metrics_exporter_prometheus::PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    tracing::info!("Prometheus metrics exporter installed");

    Ok(handle)
}

/// Record one classification result
pub fn record_classification(category_id: CategoryId, outcome: Outcome) {
    metrics::counter!("news_classifier_classifications_total",
        "category" => category_id.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record time spent in a single inference call
pub fn record_inference_duration(elapsed: Duration) {
    metrics::histogram!("news_classifier_inference_seconds").record(elapsed.as_secs_f64());
}

/// Record a batch request and its size
pub fn record_batch(items: usize) {
    metrics::counter!("news_classifier_batch_requests_total").increment(1);
    metrics::histogram!("news_classifier_batch_items").record(items as f64);
}

/// Update model readiness gauge
pub fn set_model_ready(ready: bool) {
    metrics::gauge!("news_classifier_model_ready").set(if ready { 1.0 } else { 0.0 });
}
