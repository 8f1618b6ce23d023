use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::{validate_threshold, Hyperparameters, POSITIVE_CLASS_WEIGHT};
use crate::data_handling::{check_rows, validate_binary_targets};
use crate::error::{ClassifierError, Result};
use crate::models::cart::{grow_tree, GrowthLimits};
use crate::models::classifier_trait::BinaryClassifier;
use crate::models::fitted_tree::FittedTree;

/// File name of the persisted predictor inside a model directory.
pub const PREDICTOR_FILE_NAME: &str = "predictor.bin";

/// Threshold value meaning "use the threshold configured on the model".
pub const USE_CONFIGURED_THRESHOLD: f64 = -1.0;

/// Decision tree binary classifier.
///
/// An unpruned Gini CART tree with a weighted positive class. Leaf
/// probabilities are the class-weighted fractions of the training rows in
/// each leaf, and the whole object persists to a single file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Classifier {
    params: Hyperparameters,
    model: Option<FittedTree>,
}

impl Classifier {
    pub const MODEL_NAME: &'static str = "Decision Tree Binary Classifier";

    /// Create an untrained classifier from validated hyperparameters.
    pub fn new(params: Hyperparameters) -> Result<Self> {
        params.validate()?;
        Ok(Classifier {
            params,
            model: None,
        })
    }

    /// Node size limits, counted in rows regardless of class weight.
    fn growth_limits(&self) -> GrowthLimits {
        GrowthLimits {
            min_samples_split: self.params.min_samples_split,
            min_samples_leaf: self.params.min_samples_leaf,
        }
    }

    /// `(negative, positive)` class weights.
    fn class_weights(&self) -> (f64, f64) {
        (1.0, self.params.positive_class_weight)
    }

    fn fitted(&self) -> Result<&FittedTree> {
        self.model.as_ref().ok_or(ClassifierError::NotFitted)
    }

    fn resolve_threshold(&self, decision_threshold: Option<f64>) -> f64 {
        match decision_threshold {
            Some(threshold) if threshold != USE_CONFIGURED_THRESHOLD => threshold,
            _ => self.params.decision_threshold,
        }
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.params
    }

    pub fn decision_threshold(&self) -> f64 {
        self.params.decision_threshold
    }

    pub fn set_decision_threshold(&mut self, decision_threshold: f64) -> Result<()> {
        validate_threshold(decision_threshold)?;
        self.params.decision_threshold = decision_threshold;
        Ok(())
    }

    /// Number of feature columns seen during fit.
    pub fn n_features(&self) -> Option<usize> {
        self.model.as_ref().map(FittedTree::n_features)
    }

    pub fn depth(&self) -> Option<usize> {
        self.model.as_ref().map(FittedTree::depth)
    }

    pub fn n_leaves(&self) -> Option<usize> {
        self.model.as_ref().map(FittedTree::n_leaves)
    }

    /// Write the classifier to `model_dir_path/predictor.bin`.
    ///
    /// The directory must exist. Fails with [`ClassifierError::NotFitted`]
    /// before anything is written if the model was never trained.
    pub fn save<P: AsRef<Path>>(&self, model_dir_path: P) -> Result<()> {
        if !self.is_trained() {
            return Err(ClassifierError::NotFitted);
        }
        let path = model_dir_path.as_ref().join(PREDICTOR_FILE_NAME);
        let mut writer = BufWriter::new(File::create(&path)?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        log::info!("Saved predictor to {}", path.display());
        Ok(())
    }

    /// Read a classifier previously written by [`Classifier::save`].
    ///
    /// Both the hyperparameters and the tree are checked, so a damaged file
    /// fails here instead of at prediction time.
    pub fn load<P: AsRef<Path>>(model_dir_path: P) -> Result<Self> {
        let path = model_dir_path.as_ref().join(PREDICTOR_FILE_NAME);
        let reader = BufReader::new(File::open(&path)?);
        let classifier: Classifier = bincode::deserialize_from(reader)?;
        classifier.params.validate()?;
        if let Some(model) = &classifier.model {
            model.validate()?;
        }
        log::info!("Loaded predictor from {}", path.display());
        Ok(classifier)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            params: Hyperparameters::default(),
            model: None,
        }
    }
}

impl BinaryClassifier for Classifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<i32>) -> Result<()> {
        check_rows(x.nrows(), y.len())?;
        if let Some(((row, column), _)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ClassifierError::NonFiniteInput { row, column });
        }
        let labels = validate_binary_targets(y.view())?;

        let class_weights = self.class_weights();
        let positives = labels.iter().filter(|&&l| l).count();
        let total_weight = (labels.len() - positives) as f64 * class_weights.0
            + positives as f64 * class_weights.1;
        if !total_weight.is_finite() {
            return Err(ClassifierError::invalid_hyperparameter(
                POSITIVE_CLASS_WEIGHT,
                format!(
                    "{} overflows the total weight of {} positive rows",
                    class_weights.1, positives
                ),
            ));
        }

        log::debug!(
            "Fitting decision tree: rows={}, cols={}, positives={}",
            x.nrows(),
            x.ncols(),
            positives
        );

        let fitted = grow_tree(x.view(), labels.view(), class_weights, self.growth_limits());
        log::debug!(
            "Grown tree: depth={}, leaves={}",
            fitted.depth(),
            fitted.n_leaves()
        );
        self.model = Some(fitted);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>, decision_threshold: Option<f64>) -> Result<Array1<bool>> {
        let threshold = self.resolve_threshold(decision_threshold);
        let probs = self.predict_proba(x)?;
        Ok(probs.column(1).mapv(|p| p >= threshold))
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fitted()?.predict_proba(x.view())
    }

    fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    fn name(&self) -> &str {
        Self::MODEL_NAME
    }
}

impl fmt::Display for Classifier {
    // parameters in alphabetical order
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Model name: {} (min_samples_leaf: {}, min_samples_split: {})",
            Self::MODEL_NAME,
            self.params.min_samples_leaf,
            self.params.min_samples_split
        )
    }
}
