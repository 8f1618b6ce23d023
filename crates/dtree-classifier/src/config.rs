//! Hyperparameters for the decision tree classifier.
//!
//! Pipelines hand hyperparameters over as a loosely typed JSON object, so
//! besides the typed struct this module provides the coercion rules used to
//! read one: integers may arrive as floats or numeric strings, floats as
//! numeric strings, and keys the classifier does not know are skipped.
use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClassifierError, Result};

pub const MIN_SAMPLES_SPLIT: &str = "min_samples_split";
pub const MIN_SAMPLES_LEAF: &str = "min_samples_leaf";
pub const DECISION_THRESHOLD: &str = "decision_threshold";
pub const POSITIVE_CLASS_WEIGHT: &str = "positive_class_weight";

const RECOGNIZED_KEYS: [&str; 4] = [
    MIN_SAMPLES_SPLIT,
    MIN_SAMPLES_LEAF,
    DECISION_THRESHOLD,
    POSITIVE_CLASS_WEIGHT,
];

/// Decision tree hyperparameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Hyperparameters {
    /// Minimum number of samples required to split an internal node.
    pub min_samples_split: usize,
    /// Minimum number of samples required at a leaf.
    pub min_samples_leaf: usize,
    /// Positive-class probability at or above which a row is labelled positive.
    pub decision_threshold: f64,
    /// Weight of the positive class during training; the negative class weighs 1.
    pub positive_class_weight: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            min_samples_split: 2,
            min_samples_leaf: 1,
            decision_threshold: 0.5,
            positive_class_weight: 1.0,
        }
    }
}

impl Hyperparameters {
    pub fn new(
        min_samples_split: usize,
        min_samples_leaf: usize,
        decision_threshold: f64,
        positive_class_weight: f64,
    ) -> Result<Self> {
        let params = Self {
            min_samples_split,
            min_samples_leaf,
            decision_threshold,
            positive_class_weight,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(ClassifierError::invalid_hyperparameter(
                MIN_SAMPLES_SPLIT,
                format!("must be at least 2, got {}", self.min_samples_split),
            ));
        }
        if self.min_samples_leaf < 1 {
            return Err(ClassifierError::invalid_hyperparameter(
                MIN_SAMPLES_LEAF,
                format!("must be at least 1, got {}", self.min_samples_leaf),
            ));
        }
        validate_threshold(self.decision_threshold)?;
        if !self.positive_class_weight.is_finite() || self.positive_class_weight <= 0.0 {
            return Err(ClassifierError::invalid_hyperparameter(
                POSITIVE_CLASS_WEIGHT,
                format!("must be a positive number, got {}", self.positive_class_weight),
            ));
        }
        Ok(())
    }

    /// Build hyperparameters from a JSON object.
    ///
    /// Missing keys keep their defaults. Unrecognized keys are ignored and
    /// only reported at debug level, so configs written for other predictors
    /// in the same pipeline can be passed through unchanged.
    pub fn from_json_map(map: &Map<String, Value>) -> Result<Self> {
        let mut params = Self::default();

        if let Some(value) = map.get(MIN_SAMPLES_SPLIT) {
            params.min_samples_split = coerce_count(MIN_SAMPLES_SPLIT, value)?;
        }
        if let Some(value) = map.get(MIN_SAMPLES_LEAF) {
            params.min_samples_leaf = coerce_count(MIN_SAMPLES_LEAF, value)?;
        }
        if let Some(value) = map.get(DECISION_THRESHOLD) {
            params.decision_threshold = coerce_float(DECISION_THRESHOLD, value)?;
        }
        if let Some(value) = map.get(POSITIVE_CLASS_WEIGHT) {
            params.positive_class_weight = coerce_float(POSITIVE_CLASS_WEIGHT, value)?;
        }

        let ignored: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|key| !RECOGNIZED_KEYS.contains(key))
            .collect();
        if !ignored.is_empty() {
            log::debug!("Ignoring unrecognized hyperparameters: {:?}", ignored);
        }

        params.validate()?;
        Ok(params)
    }

    /// Build hyperparameters from any JSON value; it must be an object.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_json_map(map),
            other => Err(ClassifierError::invalid_hyperparameter(
                "<root>",
                format!("expected a JSON object, got {}", other),
            )),
        }
    }

    /// Load hyperparameters from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> AnyResult<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read hyperparameters: {}", path.as_ref().display())
        })?;
        let value: Value = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse hyperparameters: {}", path.as_ref().display())
        })?;
        let params = Self::from_json_value(&value).with_context(|| {
            format!("Invalid hyperparameters in {}", path.as_ref().display())
        })?;
        Ok(params)
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ClassifierError::invalid_hyperparameter(
            DECISION_THRESHOLD,
            format!("must lie in [0, 1], got {}", threshold),
        ));
    }
    Ok(())
}

/// Integer coercion: floats are truncated toward zero, strings must hold an integer.
fn coerce_count(name: &str, value: &Value) -> Result<usize> {
    let raw = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64().filter(|f| f.is_finite()).ok_or_else(|| {
                    ClassifierError::invalid_hyperparameter(name, format!("{} is out of range", n))
                })?;
                f.trunc() as i64
            }
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            ClassifierError::invalid_hyperparameter(name, format!("'{}' is not an integer", s))
        })?,
        other => {
            return Err(ClassifierError::invalid_hyperparameter(
                name,
                format!("expected an integer, got {}", other),
            ))
        }
    };
    usize::try_from(raw).map_err(|_| {
        ClassifierError::invalid_hyperparameter(name, format!("must not be negative, got {}", raw))
    })
}

fn coerce_float(name: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ClassifierError::invalid_hyperparameter(name, format!("expected a number, got {}", value))
    })
}
