//! Labeled dataset container and target validation.
//!
//! Targets follow the 0/1 convention: 1 marks the positive class. Anything
//! else is rejected before it reaches the tree learner.
use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{ClassifierError, Result};

#[derive(Debug, Clone)]
pub struct LabeledData {
    /// Feature matrix, one row per sample.
    pub x: Array2<f64>,
    /// Binary targets (0 or 1), row-aligned with `x`.
    pub y: Array1<i32>,
    /// Column names of `x`, in order.
    pub feature_names: Vec<String>,
}

impl LabeledData {
    pub fn new(x: Array2<f64>, y: Array1<i32>, feature_names: Vec<String>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(ClassifierError::LengthMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        if feature_names.len() != x.ncols() {
            return Err(ClassifierError::FeatureMismatch {
                expected: x.ncols(),
                found: feature_names.len(),
            });
        }
        Ok(Self { x, y, feature_names })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn log_summary(&self) {
        let positives = self.y.iter().filter(|&&v| v == 1).count();
        log::info!(
            "{} samples ({} positive, {} negative), {} feature columns",
            self.n_samples(),
            positives,
            self.n_samples() - positives,
            self.n_features()
        );
    }
}

/// Convert 0/1 targets into booleans, rejecting any other value.
pub fn validate_binary_targets(y: ArrayView1<i32>) -> Result<Array1<bool>> {
    y.iter()
        .enumerate()
        .map(|(row, &value)| match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ClassifierError::InvalidLabel { row, value }),
        })
        .collect()
}

/// Ensure `x` and `y` describe the same, non-empty set of rows.
pub(crate) fn check_rows(x_rows: usize, y_len: usize) -> Result<()> {
    if x_rows == 0 {
        return Err(ClassifierError::EmptyInput);
    }
    if x_rows != y_len {
        return Err(ClassifierError::LengthMismatch {
            expected: x_rows,
            found: y_len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn maps_zero_one_to_bool() {
        let y = array![0, 1, 1, 0];
        let labels = validate_binary_targets(y.view()).unwrap();
        assert_eq!(labels, array![false, true, true, false]);
    }

    #[test]
    fn rejects_labels_outside_zero_one() {
        let y = array![1, -1, 1];
        match validate_binary_targets(y.view()) {
            Err(ClassifierError::InvalidLabel { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, -1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn new_checks_alignment() {
        let x = Array2::<f64>::zeros((3, 2));
        let names = vec!["a".to_string(), "b".to_string()];
        assert!(LabeledData::new(x.clone(), array![0, 1], names.clone()).is_err());
        assert!(LabeledData::new(x.clone(), array![0, 1, 0], vec!["a".to_string()]).is_err());
        let data = LabeledData::new(x, array![0, 1, 0], names).unwrap();
        assert_eq!(data.n_samples(), 3);
        assert_eq!(data.n_features(), 2);
    }

    #[test]
    fn check_rows_rejects_empty() {
        assert!(matches!(check_rows(0, 0), Err(ClassifierError::EmptyInput)));
        assert!(check_rows(2, 2).is_ok());
    }
}
