//! Classifier facade
//!
//! Wraps the inference handle and the category table. Text is normalized,
//! passed to the model for a top-1 prediction, and the native label is
//! translated into a project category. Once the model is loaded,
//! classification always answers: empty input and inference failures resolve
//! to the default category instead of surfacing an error.

use crate::categories::{Category, CategoryId, CategoryTable};
use crate::config::ModelConfig;
use crate::error::{ClassifierError, ClassifierResult};
use crate::metrics;
use crate::models::backend::InferenceBackend;
use crate::models::cache::artifact_size;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Native label reported when the input is empty after normalization
pub const EMPTY_LABEL: &str = "unknown";
/// Native label reported when inference fails
pub const ERROR_LABEL: &str = "error";

/// Lifecycle of the model handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    /// Nothing attempted yet
    Uninitialized,
    /// Artifact is being acquired or loaded
    Loading,
    /// Handle is initialized and serving
    Ready,
    /// Acquisition or load failed; the process should not serve traffic
    Failed,
}

impl ModelStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub native_label: String,
    pub native_score: f64,
    pub category_id: CategoryId,
    pub category_name: String,
    /// Copy of `native_score`
    pub confidence: f64,
}

impl ClassificationResult {
    fn fallback(native_label: &str, category: &Category) -> Self {
        Self {
            native_label: native_label.to_string(),
            native_score: 0.0,
            category_id: category.id,
            category_name: category.name.clone(),
            confidence: 0.0,
        }
    }
}

/// Batch input item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl BatchItem {
    /// Text submitted to the model: `"{title}. {description}"`, trimmed
    pub fn text(&self) -> String {
        format!("{}. {}", self.title, self.description)
            .trim()
            .to_string()
    }
}

/// Classification tagged with the caller's batch index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedClassification {
    pub index: i64,
    #[serde(flatten)]
    pub result: ClassificationResult,
}

/// Static model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub repo_id: String,
    pub filename: String,
    pub revision: String,
    pub model_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    pub is_loaded: bool,
    pub status: ModelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Native labels in the mapping table
    pub categories: usize,
    /// Project categories
    pub target_categories: usize,
}

/// Strip surrounding whitespace and turn each run of line breaks into one space
pub fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut in_break = false;

    for ch in text.trim().chars() {
        if ch == '\n' || ch == '\r' {
            if !in_break {
                normalized.push(' ');
                in_break = true;
            }
        } else {
            normalized.push(ch);
            in_break = false;
        }
    }

    normalized
}

enum ModelState {
    Uninitialized,
    Loading,
    Ready {
        backend: Arc<dyn InferenceBackend>,
        path: PathBuf,
        size_bytes: Option<u64>,
    },
    Failed {
        reason: String,
    },
}

impl ModelState {
    fn status(&self) -> ModelStatus {
        match self {
            Self::Uninitialized => ModelStatus::Uninitialized,
            Self::Loading => ModelStatus::Loading,
            Self::Ready { .. } => ModelStatus::Ready,
            Self::Failed { .. } => ModelStatus::Failed,
        }
    }
}

fn expect_status(
    current: ModelStatus,
    expected: ModelStatus,
    next: ModelStatus,
) -> ClassifierResult<()> {
    if current == expected {
        Ok(())
    } else {
        Err(ClassifierError::InvalidTransition {
            from: current.as_str(),
            to: next.as_str(),
        })
    }
}

/// Process-wide classifier facade, shared through `Arc`
pub struct NewsClassifier {
    table: Arc<CategoryTable>,
    model: ModelConfig,
    state: RwLock<ModelState>,
}

impl NewsClassifier {
    /// Create an uninitialized classifier
    pub fn new(table: CategoryTable, model: ModelConfig) -> Self {
        Self {
            table: Arc::new(table),
            model,
            state: RwLock::new(ModelState::Uninitialized),
        }
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.table
    }

    pub fn model_config(&self) -> &ModelConfig {
        &self.model
    }

    /// Uninitialized → Loading
    pub async fn begin_loading(&self) -> ClassifierResult<()> {
        let mut state = self.state.write().await;
        expect_status(state.status(), ModelStatus::Uninitialized, ModelStatus::Loading)?;
        *state = ModelState::Loading;
        Ok(())
    }

    /// Loading → Ready
    pub async fn mark_ready(
        &self,
        backend: Arc<dyn InferenceBackend>,
        path: PathBuf,
    ) -> ClassifierResult<()> {
        let size_bytes = artifact_size(&path);

        let mut state = self.state.write().await;
        expect_status(state.status(), ModelStatus::Loading, ModelStatus::Ready)?;

        tracing::info!(path = ?path, size_bytes = ?size_bytes, backend = backend.name(), "Classifier ready");
        *state = ModelState::Ready {
            backend,
            path,
            size_bytes,
        };
        metrics::set_model_ready(true);
        Ok(())
    }

    /// Loading → Failed
    pub async fn mark_failed(&self, reason: String) -> ClassifierResult<()> {
        let mut state = self.state.write().await;
        expect_status(state.status(), ModelStatus::Loading, ModelStatus::Failed)?;

        tracing::error!(reason = %reason, "Classifier failed to load");
        *state = ModelState::Failed { reason };
        metrics::set_model_ready(false);
        Ok(())
    }

    pub async fn status(&self) -> ModelStatus {
        self.state.read().await.status()
    }

    /// True iff the model handle has been initialized
    pub async fn is_ready(&self) -> bool {
        self.status().await == ModelStatus::Ready
    }

    /// Snapshot of the loaded model for synchronous classification
    pub async fn loaded(&self) -> ClassifierResult<LoadedClassifier> {
        match &*self.state.read().await {
            ModelState::Ready { backend, .. } => Ok(LoadedClassifier {
                backend: backend.clone(),
                table: self.table.clone(),
            }),
            _ => Err(ClassifierError::NotReady),
        }
    }

    /// Classify one text
    ///
    /// Only fails with `NotReady` when the model has not been loaded.
    pub async fn classify(&self, text: &str) -> ClassifierResult<ClassificationResult> {
        Ok(self.loaded().await?.classify(text))
    }

    /// Classify batch items, preserving input order
    pub async fn classify_batch(
        &self,
        items: &[BatchItem],
    ) -> ClassifierResult<Vec<IndexedClassification>> {
        Ok(self.loaded().await?.classify_batch(items))
    }

    /// Model metadata; no side effects
    pub async fn describe_model(&self) -> ModelInfo {
        let state = self.state.read().await;

        let (model_path, model_size_bytes, backend, error) = match &*state {
            ModelState::Ready {
                backend,
                path,
                size_bytes,
            } => (
                Some(path.clone()),
                *size_bytes,
                Some(backend.name().to_string()),
                None,
            ),
            ModelState::Failed { reason } => (None, None, None, Some(reason.clone())),
            _ => (None, None, None, None),
        };

        ModelInfo {
            repo_id: self.model.repo_id.clone(),
            filename: self.model.filename.clone(),
            revision: self.model.revision.clone(),
            model_size_bytes,
            model_path,
            backend,
            is_loaded: state.status() == ModelStatus::Ready,
            status: state.status(),
            error,
            categories: self.table.mapping_len(),
            target_categories: self.table.names_len(),
        }
    }
}

/// A ready model paired with the category table
///
/// Cheap to clone; classification through it never fails.
#[derive(Clone)]
pub struct LoadedClassifier {
    backend: Arc<dyn InferenceBackend>,
    table: Arc<CategoryTable>,
}

impl LoadedClassifier {
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let text = normalize_text(text);

        if text.is_empty() {
            tracing::warn!("Empty text provided for classification");
            let category = self.table.default_category();
            metrics::record_classification(category.id, metrics::Outcome::Empty);
            return ClassificationResult::fallback(EMPTY_LABEL, category);
        }

        let started = Instant::now();
        let prediction = self.backend.predict_top1(&text);
        metrics::record_inference_duration(started.elapsed());

        match prediction {
            Ok(prediction) => {
                let category = self.table.resolve(&prediction.label);
                tracing::debug!(
                    native_label = %prediction.label,
                    native_score = prediction.score,
                    category_id = category.id,
                    "Text classified"
                );
                metrics::record_classification(category.id, metrics::Outcome::Model);

                ClassificationResult {
                    native_label: prediction.label,
                    native_score: prediction.score,
                    category_id: category.id,
                    category_name: category.name.clone(),
                    confidence: prediction.score,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Classification error");
                let category = self.table.default_category();
                metrics::record_classification(category.id, metrics::Outcome::Error);
                ClassificationResult::fallback(ERROR_LABEL, category)
            }
        }
    }

    pub fn classify_batch(&self, items: &[BatchItem]) -> Vec<IndexedClassification> {
        items
            .iter()
            .map(|item| IndexedClassification {
                index: item.index,
                result: self.classify(&item.text()),
            })
            .collect()
    }
}
