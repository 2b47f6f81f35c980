//! Model management module
//!
//! Provides functionality for:
//! - Resolving artifacts already present in the HuggingFace cache
//! - Downloading artifacts from HuggingFace Hub
//! - Initializing the inference backend from a local artifact
//! - Driving the classifier through its loading states

pub mod backend;
pub mod cache;
pub mod download;
pub mod loader;

pub use backend::{InferenceBackend, Prediction, initialize};
pub use cache::{cached_artifact, default_cache_dir};
pub use download::acquire;
pub use loader::ModelLoader;
