//! News Classifier - fastText news classification service
//!
//! Serves a pretrained Russian-language news classifier over HTTP and maps the
//! model's native labels onto a fixed set of project categories.

pub mod api;
pub mod categories;
pub mod classifier;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;

pub use categories::{Category, CategoryId, CategoryTable};
pub use classifier::{
    BatchItem, ClassificationResult, IndexedClassification, LoadedClassifier, ModelInfo,
    ModelStatus, NewsClassifier,
};
pub use config::{CategoryConfig, ModelConfig, ServerConfig, ServiceConfig};
pub use error::{ApiError, ClassifierError, ClassifierResult};
pub use models::{InferenceBackend, ModelLoader, Prediction};
