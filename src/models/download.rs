//! Model artifact acquisition using hf-hub
//!
//! Returns the cached artifact when present, otherwise downloads it from the
//! Hub into the configured cache directory. The download is bounded by the
//! configured timeout and is never retried.

use super::cache::cached_artifact;
use crate::config::ModelConfig;
use crate::error::{ClassifierError, ClassifierResult};
use hf_hub::api::tokio::ApiBuilder;
use hf_hub::{Repo, RepoType};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;

/// Ensure the artifact described by `model` is available locally
///
/// # Returns
/// * `Ok(PathBuf)` - Path to the artifact inside the cache directory
/// * `Err(ClassifierError::Download)` - Repository or file unreachable
/// * `Err(ClassifierError::DownloadTimeout)` - Download exceeded `download_timeout_secs`
pub async fn acquire(model: &ModelConfig) -> ClassifierResult<PathBuf> {
    tokio::fs::create_dir_all(&model.cache_dir)
        .await
        .map_err(|e| {
            download_error(
                model,
                format!("cannot create cache directory {:?}: {}", model.cache_dir, e),
            )
        })?;

    if let Some(path) = cached_artifact(
        &model.cache_dir,
        &model.repo_id,
        &model.revision,
        &model.filename,
    ) {
        tracing::info!(path = ?path, "Using cached model artifact");
        return Ok(path);
    }

    tracing::info!(
        repo_id = %model.repo_id,
        filename = %model.filename,
        revision = %model.revision,
        cache_dir = ?model.cache_dir,
        "Starting model download via hf-hub"
    );

    match timeout(
        Duration::from_secs(model.download_timeout_secs),
        download_artifact(model),
    )
    .await
    {
        Ok(Ok(path)) => {
            tracing::info!(path = ?path, "Model downloaded");
            Ok(path)
        }
        Ok(Err(e)) => {
            tracing::error!(repo_id = %model.repo_id, error = %e, "Model download failed");
            Err(e)
        }
        Err(_) => {
            tracing::error!(
                repo_id = %model.repo_id,
                timeout_secs = model.download_timeout_secs,
                "Model download timed out"
            );
            Err(ClassifierError::DownloadTimeout {
                repo_id: model.repo_id.clone(),
                filename: model.filename.clone(),
                timeout_secs: model.download_timeout_secs,
            })
        }
    }
}

async fn download_artifact(model: &ModelConfig) -> ClassifierResult<PathBuf> {
    let mut builder = ApiBuilder::new()
        .with_cache_dir(model.cache_dir.clone())
        .with_progress(false);
    if let Some(endpoint) = &model.endpoint {
        builder = builder.with_endpoint(endpoint.clone());
    }

    let api = builder
        .build()
        .map_err(|e| download_error(model, format!("failed to create HF API client: {}", e)))?;

    let repo = api.repo(Repo::with_revision(
        model.repo_id.clone(),
        RepoType::Model,
        model.revision.clone(),
    ));

    repo.get(&model.filename)
        .await
        .map_err(|e| download_error(model, e.to_string()))
}

fn download_error(model: &ModelConfig, message: String) -> ClassifierError {
    ClassifierError::Download {
        repo_id: model.repo_id.clone(),
        filename: model.filename.clone(),
        message,
    }
}
