use ndarray::ArrayView1;

use crate::error::{ClassifierError, Result};

/// Confusion counts of a binary prediction, positive class = `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    /// Tally predicted labels against true labels.
    ///
    /// # Arguments
    ///
    /// * `y_true` - Ground truth labels.
    /// * `y_pred` - Predicted labels, same length and order as `y_true`.
    pub fn from_labels(y_true: ArrayView1<bool>, y_pred: ArrayView1<bool>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(ClassifierError::LengthMismatch {
                expected: y_true.len(),
                found: y_pred.len(),
            });
        }

        let mut counts = ConfusionCounts::default();
        for (&truth, &pred) in y_true.iter().zip(y_pred.iter()) {
            match (truth, pred) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (false, false) => counts.true_negatives += 1,
                (true, false) => counts.false_negatives += 1,
            }
        }
        Ok(counts)
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Harmonic mean of precision and recall, `2tp / (2tp + fp + fn)`.
    ///
    /// Returns 0.0 when there are no positive predictions and no positive
    /// labels.
    pub fn f1_score(&self) -> f64 {
        ratio(
            2 * self.true_positives,
            2 * self.true_positives + self.false_positives + self.false_negatives,
        )
    }
}

/// F1 score of `y_pred` against `y_true`.
pub fn f1_score(y_true: ArrayView1<bool>, y_pred: ArrayView1<bool>) -> Result<f64> {
    Ok(ConfusionCounts::from_labels(y_true, y_pred)?.f1_score())
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
