//! Model loading
//!
//! Drives the classifier through `Loading` into `Ready` or `Failed`:
//! acquire the artifact, then initialize the inference handle from it.

use super::backend::{self, InferenceBackend};
use super::download;
use crate::classifier::NewsClassifier;
use crate::error::{ClassifierError, ClassifierResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Turns a local artifact into an inference handle
pub type Initializer =
    Arc<dyn Fn(&Path) -> ClassifierResult<Arc<dyn InferenceBackend>> + Send + Sync>;

/// Model loader
pub struct ModelLoader {
    initializer: Initializer,
}

impl ModelLoader {
    /// Create a loader using the compiled-in backend
    pub fn new() -> Self {
        Self {
            initializer: Arc::new(backend::initialize),
        }
    }

    /// Create a loader with a custom initializer
    pub fn with_initializer<F>(initializer: F) -> Self
    where
        F: Fn(&Path) -> ClassifierResult<Arc<dyn InferenceBackend>> + Send + Sync + 'static,
    {
        Self {
            initializer: Arc::new(initializer),
        }
    }

    /// Acquire and initialize the model for `classifier`
    ///
    /// Any failure leaves the classifier in `Failed` and is returned to the
    /// caller; it is fatal to startup.
    pub async fn load(&self, classifier: &NewsClassifier) -> ClassifierResult<PathBuf> {
        classifier.begin_loading().await?;

        tracing::info!(
            repo_id = %classifier.model_config().repo_id,
            filename = %classifier.model_config().filename,
            "Loading model"
        );

        match self.acquire_and_initialize(classifier).await {
            Ok((path, backend)) => {
                classifier.mark_ready(backend, path.clone()).await?;
                Ok(path)
            }
            Err(e) => {
                classifier.mark_failed(e.to_string()).await?;
                Err(e)
            }
        }
    }

    async fn acquire_and_initialize(
        &self,
        classifier: &NewsClassifier,
    ) -> ClassifierResult<(PathBuf, Arc<dyn InferenceBackend>)> {
        let path = download::acquire(classifier.model_config()).await?;

        // Loading a large artifact blocks; keep it off the async workers
        let initializer = self.initializer.clone();
        let load_path = path.clone();
        let backend = tokio::task::spawn_blocking(move || initializer(&load_path))
            .await
            .map_err(|e| ClassifierError::Load {
                path: path.clone(),
                message: format!("load task failed: {}", e),
            })??;

        Ok((path, backend))
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}
