use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Failures raised by the classifier adapter.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model is not fitted yet.")]
    NotFitted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize predictor: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("invalid hyperparameter '{name}': {reason}")]
    InvalidHyperparameter { name: String, reason: String },

    #[error("invalid label {value} at row {row}; expected 0 or 1")]
    InvalidLabel { row: usize, value: i32 },

    #[error("length mismatch: expected {expected} rows, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("model was fitted on {expected} features, input has {found}")]
    FeatureMismatch { expected: usize, found: usize },

    #[error("input contains no samples")]
    EmptyInput,

    #[error("non-finite feature value at row {row}, column {column}")]
    NonFiniteInput { row: usize, column: usize },

    #[error("malformed predictor: {0}")]
    MalformedModel(String),
}

impl ClassifierError {
    pub(crate) fn invalid_hyperparameter(name: &str, reason: impl Into<String>) -> Self {
        ClassifierError::InvalidHyperparameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
