//! Common test fixtures: a keyword-driven stand-in for the fastText model

#![allow(dead_code)]

use news_classifier::{
    CategoryTable, ClassifierError, ClassifierResult, InferenceBackend, NewsClassifier,
    Prediction, ServiceConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Text containing this marker makes the stub backend fail
pub const FAIL_MARKER: &str = "FAIL_INFERENCE";

/// Shipped sample configuration
pub fn sample_config() -> ServiceConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/classifier.toml");
    ServiceConfig::from_toml_str(&std::fs::read_to_string(path).expect("Failed to read config"))
        .expect("Failed to parse sample config")
}

/// Predicts labels from keywords, the way the real model would for these headlines
#[derive(Default)]
pub struct KeywordBackend {
    calls: AtomicUsize,
}

impl KeywordBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InferenceBackend for KeywordBackend {
    fn predict_top1(&self, text: &str) -> ClassifierResult<Prediction> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if text.contains(FAIL_MARKER) {
            return Err(ClassifierError::Inference("stub failure".to_string()));
        }

        let lower = text.to_lowercase();
        let (label, score) = if lower.contains("ставк") || lower.contains("центробанк") {
            ("__label__economy", 0.91)
        } else if lower.contains("матч") || lower.contains("футбол") {
            ("__label__sports", 0.88)
        } else if lower.contains("extreme") {
            ("__label__sports_extreme", 0.5)
        } else {
            ("__label__society", 0.42)
        };

        Ok(Prediction::from_raw(label, score))
    }

    fn name(&self) -> &str {
        "keyword-stub"
    }
}

/// Classifier in the `Uninitialized` state, built from the sample config
pub fn unloaded_classifier() -> Arc<NewsClassifier> {
    let config = sample_config();
    let table = CategoryTable::from_config(&config.categories).expect("Invalid sample categories");
    Arc::new(NewsClassifier::new(table, config.model))
}

/// Classifier in the `Ready` state backed by `backend`
pub async fn ready_classifier(backend: Arc<KeywordBackend>) -> Arc<NewsClassifier> {
    let classifier = unloaded_classifier();
    classifier.begin_loading().await.expect("begin_loading");
    classifier
        .mark_ready(backend, PathBuf::from("/tmp/fasttext_news_classifier.bin"))
        .await
        .expect("mark_ready");
    classifier
}
