//! dtree-classifier: a decision tree binary classifier behind a uniform
//! predictor interface.
//!
//! The crate grows an unpruned, class-weighted CART tree and puts it behind a
//! fixed lifecycle (fit, predict, predict_proba, evaluate, save, load) so it
//! can be dropped into a model serving pipeline next to other predictors.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod predictor;
pub mod stats;

pub use config::Hyperparameters;
pub use error::{ClassifierError, Result};
pub use models::classifier_trait::BinaryClassifier;
pub use models::decision_tree::Classifier;
pub use predictor::{
    evaluate_predictor_model, load_predictor_model, predict_with_model, save_predictor_model,
    set_decision_threshold, train_predictor_model, Predictions, PREDICTOR_FILE_NAME,
};
