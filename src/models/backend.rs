//! Inference backends
//!
//! The classifier only needs top-1 prediction from the pretrained artifact.
//! `InferenceBackend` is the seam between the facade and the model library.

use crate::error::{ClassifierError, ClassifierResult};
use fasttext::FastText;
use std::path::Path;
use std::sync::Arc;

/// Label prefix fastText puts on every class in supervised models
pub const FASTTEXT_LABEL_PREFIX: &str = "__label__";

/// Top-1 prediction in the model's own vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Probability in [0, 1]
    pub score: f64,
}

impl Prediction {
    /// Build a prediction from raw backend output
    ///
    /// Strips the fastText label prefix and clamps the score into [0, 1];
    /// fastText probabilities can overshoot 1.0 by a rounding epsilon.
    pub fn from_raw(label: &str, score: f64) -> Self {
        let label = label
            .strip_prefix(FASTTEXT_LABEL_PREFIX)
            .unwrap_or(label)
            .to_string();
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        Self { label, score }
    }
}

/// Read-only inference handle
///
/// Implementations must be safe to call from many request tasks at once.
pub trait InferenceBackend: Send + Sync {
    /// Predict the single most likely native label for normalized text
    fn predict_top1(&self, text: &str) -> ClassifierResult<Prediction>;

    /// Short backend name for logs and model info
    fn name(&self) -> &str;
}

/// Load the artifact at `path` into an inference handle
pub fn initialize(path: &Path) -> ClassifierResult<Arc<dyn InferenceBackend>> {
    if !path.is_file() {
        return Err(ClassifierError::Load {
            path: path.to_path_buf(),
            message: "artifact file does not exist".to_string(),
        });
    }

    let backend = FastTextBackend::load(path)?;
    tracing::info!(
        path = ?path,
        backend = backend.name(),
        labels = backend.model.dict().nlabels(),
        "Model loaded successfully"
    );
    Ok(Arc::new(backend))
}

/// fastText supervised model
pub struct FastTextBackend {
    model: FastText,
}

impl FastTextBackend {
    pub fn load(path: &Path) -> ClassifierResult<Self> {
        let model = FastText::load_model(path).map_err(|e| ClassifierError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self { model })
    }
}

impl InferenceBackend for FastTextBackend {
    fn predict_top1(&self, text: &str) -> ClassifierResult<Prediction> {
        self.model
            .predict(text, 1, 0.0)
            .into_iter()
            .next()
            .map(|p| Prediction::from_raw(&p.label, f64::from(p.prob)))
            .ok_or_else(|| ClassifierError::Inference("model returned no labels".to_string()))
    }

    fn name(&self) -> &str {
        "fasttext"
    }
}

/// Train a small supervised model on economy/sports headlines and save it to `path`
#[cfg(test)]
pub(crate) fn train_test_model(path: &Path) {
    use fasttext::args::Args;

    let dir = path.parent().expect("model path has a parent");
    let input = dir.join("train.txt");

    let mut lines = Vec::new();
    for _ in 0..30 {
        lines.push("__label__economy центробанк повысил ключевую ставку инфляция рубль");
        lines.push("__label__economy банк ставка кредит биржа рубль");
        lines.push("__label__sports футбольный матч сборная гол чемпионат");
        lines.push("__label__sports хоккей матч команда победа турнир");
    }
    std::fs::write(&input, lines.join("\n")).unwrap();

    let mut args = Args::default();
    args.input = input;
    args.output = dir.join("model");
    args.apply_supervised_defaults();
    args.dim = 10;
    args.epoch = 25;
    args.thread = 1;
    args.verbose = 0;

    let model = FastText::train(args).expect("training should succeed");
    model.save_model(path).expect("saving should succeed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_strips_label_prefix() {
        let p = Prediction::from_raw("__label__economy", 0.93);
        assert_eq!(p.label, "economy");
        assert!((p.score - 0.93).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_keeps_plain_label() {
        let p = Prediction::from_raw("sports", 0.5);
        assert_eq!(p.label, "sports");
    }

    #[test]
    fn test_prediction_clamps_score() {
        assert_eq!(Prediction::from_raw("a", 1.00001).score, 1.0);
        assert_eq!(Prediction::from_raw("a", -0.1).score, 0.0);
        assert_eq!(Prediction::from_raw("a", f64::NAN).score, 0.0);
    }

    #[test]
    fn test_initialize_missing_file() {
        let result = initialize(Path::new("/nonexistent/model-12345.bin"));
        assert!(matches!(result, Err(ClassifierError::Load { .. })));
    }

    #[test]
    fn test_initialize_corrupt_artifact() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("model.bin");
        std::fs::write(&path, b"definitely not a fasttext model").unwrap();

        match initialize(&path) {
            Err(ClassifierError::Load { message, .. }) => {
                assert!(message.contains("magic"), "unexpected message: {}", message)
            }
            Err(other) => panic!("expected Load error, got {:?}", other),
            Ok(_) => panic!("corrupt artifact should not load"),
        }
    }

    #[test]
    fn test_initialize_trained_model() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("model.bin");
        train_test_model(&path);

        let backend = initialize(&path).unwrap();
        assert_eq!(backend.name(), "fasttext");

        let prediction = backend
            .predict_top1("центробанк повысил ключевую ставку")
            .unwrap();
        assert_eq!(prediction.label, "economy");
        assert!((0.0..=1.0).contains(&prediction.score));

        let prediction = backend.predict_top1("футбольный матч сборная").unwrap();
        assert_eq!(prediction.label, "sports");
        assert!(!prediction.label.starts_with(FASTTEXT_LABEL_PREFIX));
    }

    #[test]
    fn test_backend_is_shareable_across_threads() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("model.bin");
        train_test_model(&path);
        let backend = initialize(&path).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let backend = backend.clone();
                std::thread::spawn(move || backend.predict_top1("хоккей матч").unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().label, "sports");
        }
    }
}
