use ndarray::{Array1, Array2};

use crate::data_handling::validate_binary_targets;
use crate::error::Result;
use crate::stats::f1_score;

/// Uniform contract for binary predictors that a serving pipeline can hold
/// behind a `Box<dyn BinaryClassifier>`.
///
/// Targets use the 0/1 convention (1 = positive class). Predicted labels are
/// `true` for the positive class.
pub trait BinaryClassifier {
    /// Fit the model in place on `x` (one row per sample) and targets `y`.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<i32>) -> Result<()>;

    /// Label rows positive when their positive-class probability reaches the
    /// threshold. `None` uses the threshold the model was configured with.
    fn predict(&self, x: &Array2<f64>, decision_threshold: Option<f64>) -> Result<Array1<bool>>;

    /// Class probabilities as an `n x 2` matrix: `[P(0), P(1)]` per row.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    /// F1 score of thresholded predictions against `y`.
    fn evaluate(
        &self,
        x: &Array2<f64>,
        y: &Array1<i32>,
        decision_threshold: Option<f64>,
    ) -> Result<f64> {
        let truth = validate_binary_targets(y.view())?;
        let labels = self.predict(x, decision_threshold)?;
        f1_score(truth.view(), labels.view())
    }

    fn is_trained(&self) -> bool;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
