//! API request and response models

use crate::categories::{Category, CategoryId, CategoryTable};
use crate::classifier::{BatchItem, IndexedClassification, ModelInfo, ModelStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Service banner
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub service: String,
    pub version: String,
    pub model: String,
    pub status: ModelStatus,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy", "loading" or "unhealthy"
    pub status: String,
    pub model_loaded: bool,
    pub model_info: ModelInfo,
    pub uptime_secs: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthResponse {
    pub fn status_label(status: ModelStatus) -> &'static str {
        match status {
            ModelStatus::Ready => "healthy",
            ModelStatus::Uninitialized | ModelStatus::Loading => "loading",
            ModelStatus::Failed => "unhealthy",
        }
    }
}

/// Request to classify a single text
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

/// Request to classify several news items
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchClassifyRequest {
    pub items: Vec<BatchItem>,
}

/// Batch results in input order
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchClassifyResponse {
    pub results: Vec<IndexedClassification>,
}

/// Dump of the category tables
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub native_labels: Vec<String>,
    pub categories: BTreeMap<CategoryId, String>,
    pub mapping: BTreeMap<String, CategoryId>,
    pub default_category: Category,
}

impl CategoriesResponse {
    pub fn from_table(table: &CategoryTable) -> Self {
        Self {
            native_labels: table.native_labels().map(String::from).collect(),
            categories: table
                .names()
                .map(|(id, name)| (id, name.to_string()))
                .collect(),
            mapping: table
                .mapping()
                .map(|(label, id)| (label.to_string(), id))
                .collect(),
            default_category: table.default_category().clone(),
        }
    }
}
