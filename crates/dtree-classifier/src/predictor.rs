//! Module-level entry points used by the serving pipeline.
//!
//! Each function is a thin wrapper over [`Classifier`]; the pipeline calls
//! these instead of the methods so every predictor exposes the same names.
use std::fs;
use std::path::Path;

use ndarray::{Array1, Array2};

use crate::config::Hyperparameters;
use crate::error::Result;
use crate::models::classifier_trait::BinaryClassifier;
use crate::models::decision_tree::Classifier;

pub use crate::models::decision_tree::{PREDICTOR_FILE_NAME, USE_CONFIGURED_THRESHOLD};

/// Output of [`predict_with_model`].
#[derive(Debug, Clone, PartialEq)]
pub enum Predictions {
    Labels(Array1<bool>),
    Probabilities(Array2<f64>),
}

impl Predictions {
    pub fn len(&self) -> usize {
        match self {
            Predictions::Labels(labels) => labels.len(),
            Predictions::Probabilities(probs) => probs.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Instantiate and train the predictor model.
pub fn train_predictor_model(
    train_inputs: &Array2<f64>,
    train_targets: &Array1<i32>,
    hyperparameters: &Hyperparameters,
) -> Result<Classifier> {
    let mut classifier = Classifier::new(hyperparameters.clone())?;
    classifier.fit(train_inputs, train_targets)?;
    Ok(classifier)
}

/// Predict labels, or class probabilities when `return_probs` is set.
pub fn predict_with_model(
    classifier: &Classifier,
    data: &Array2<f64>,
    return_probs: bool,
) -> Result<Predictions> {
    if return_probs {
        return Ok(Predictions::Probabilities(classifier.predict_proba(data)?));
    }
    Ok(Predictions::Labels(classifier.predict(data, None)?))
}

/// Save the classifier, creating `predictor_dir_path` if it does not exist.
pub fn save_predictor_model<P: AsRef<Path>>(model: &Classifier, predictor_dir_path: P) -> Result<()> {
    let dir = predictor_dir_path.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    model.save(dir)
}

pub fn load_predictor_model<P: AsRef<Path>>(predictor_dir_path: P) -> Result<Classifier> {
    Classifier::load(predictor_dir_path)
}

/// F1 score of the model on a test set. `None` (or `-1.0`) uses the
/// model's configured threshold.
pub fn evaluate_predictor_model(
    model: &Classifier,
    x_test: &Array2<f64>,
    y_test: &Array1<i32>,
    decision_threshold: Option<f64>,
) -> Result<f64> {
    model.evaluate(x_test, y_test, decision_threshold)
}

pub fn set_decision_threshold(model: &mut Classifier, decision_threshold: f64) -> Result<()> {
    model.set_decision_threshold(decision_threshold)
}
