//! Integration tests for the predictor lifecycle: train, predict, evaluate,
//! save and load.

use std::fs;

use ndarray::{array, Array1, Array2};
use serde_json::json;

use dtree_classifier::{
    evaluate_predictor_model, load_predictor_model, predict_with_model, save_predictor_model,
    set_decision_threshold, train_predictor_model, BinaryClassifier, Classifier, ClassifierError,
    Hyperparameters, Predictions, PREDICTOR_FILE_NAME,
};

fn small_dataset() -> (Array2<f64>, Array1<i32>) {
    let x = array![
        [0.1, 1.0, 5.0],
        [0.4, -1.0, 5.0],
        [0.6, 1.0, 5.0],
        [0.9, -1.0, 5.0],
        [1.2, 1.0, 5.0],
    ];
    let y = array![0, 1, 0, 1, 1];
    (x, y)
}

/// Overlapping classes so that some leaves stay mixed.
fn noisy_dataset() -> (Array2<f64>, Array1<i32>) {
    let x = array![
        [0.0, 0.0],
        [0.0, 0.0],
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 0.0],
        [1.0, 0.0],
        [2.0, 1.0],
        [2.0, 1.0],
        [3.0, 1.0],
        [3.0, 1.0],
    ];
    let y = array![0, 0, 1, 0, 1, 1, 1, 1, 0, 1];
    (x, y)
}

// ---------------------------------------------------------------------------
// Construction and fitting
// ---------------------------------------------------------------------------

#[test]
fn construction_never_trains() {
    for params in [
        Hyperparameters::default(),
        Hyperparameters::new(10, 4, 0.3, 2.5).unwrap(),
        Hyperparameters::new(2, 1, 1.0, 0.1).unwrap(),
    ] {
        let clf = Classifier::new(params).unwrap();
        assert!(!clf.is_trained());
    }
}

#[test]
fn predict_returns_one_label_per_row() {
    let (x, y) = small_dataset();
    let clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();
    assert!(clf.is_trained());
    let labels = clf.predict(&x, None).unwrap();
    assert_eq!(labels.len(), x.nrows());
}

#[test]
fn extreme_thresholds_give_uniform_labels() {
    let (x, y) = small_dataset();
    let clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();

    let all_positive = clf.predict(&x, Some(0.0)).unwrap();
    assert!(all_positive.iter().all(|&l| l));

    let all_negative = clf.predict(&x, Some(1.01)).unwrap();
    assert!(all_negative.iter().all(|&l| !l));
}

#[test]
fn predict_matches_thresholded_probabilities() {
    let (x, y) = noisy_dataset();
    let clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();
    let probs = clf.predict_proba(&x).unwrap();
    assert_eq!(probs.ncols(), 2);

    for step in 0..=20 {
        let t = step as f64 / 20.0;
        let expected: Vec<bool> = probs.column(1).iter().map(|&p| p >= t).collect();
        assert_eq!(clf.predict(&x, Some(t)).unwrap().to_vec(), expected, "threshold {}", t);
    }

    let configured: Vec<bool> = probs
        .column(1)
        .iter()
        .map(|&p| p >= clf.decision_threshold())
        .collect();
    assert_eq!(clf.predict(&x, Some(-1.0)).unwrap().to_vec(), configured);
    assert_eq!(clf.predict(&x, None).unwrap().to_vec(), configured);
}

#[test]
fn min_samples_leaf_limits_tree_growth() {
    let (x, y) = noisy_dataset();
    let deep = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();
    let shallow = train_predictor_model(
        &x,
        &y,
        &Hyperparameters {
            min_samples_leaf: 10,
            ..Hyperparameters::default()
        },
    )
    .unwrap();
    assert_eq!(shallow.n_leaves(), Some(1));
    assert!(deep.n_leaves().unwrap() >= shallow.n_leaves().unwrap());

    // a single leaf predicts the class balance of the training set
    let probs = shallow.predict_proba(&x).unwrap();
    for row in probs.outer_iter() {
        assert!((row[1] - 0.6).abs() < 1e-12);
    }
}

#[test]
fn wrong_feature_count_is_rejected() {
    let (x, y) = small_dataset();
    let clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();
    let narrow = array![[0.1, 1.0]];
    assert!(matches!(
        clf.predict_proba(&narrow),
        Err(ClassifierError::FeatureMismatch { expected: 3, found: 2 })
    ));
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[test]
fn evaluate_returns_f1_in_unit_interval() {
    let (x, y) = noisy_dataset();
    let clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();
    for threshold in [None, Some(0.0), Some(0.3), Some(0.7), Some(1.0)] {
        let score = evaluate_predictor_model(&clf, &x, &y, threshold).unwrap();
        assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
    }
}

#[test]
fn evaluate_on_separable_training_data_is_perfect() {
    let (x, y) = small_dataset();
    let clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();
    let score = evaluate_predictor_model(&clf, &x, &y, None).unwrap();
    assert!((score - 1.0).abs() < 1e-12);
}

#[test]
fn evaluate_checks_target_length() {
    let (x, y) = small_dataset();
    let clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();
    let short = array![0, 1];
    assert!(matches!(
        clf.evaluate(&x, &short, None),
        Err(ClassifierError::LengthMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Module-level helpers
// ---------------------------------------------------------------------------

#[test]
fn predict_with_model_dispatches_on_flag() {
    let (x, y) = small_dataset();
    let clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();

    match predict_with_model(&clf, &x, false).unwrap() {
        Predictions::Labels(labels) => assert_eq!(labels.len(), 5),
        other => panic!("expected labels, got {:?}", other),
    }
    match predict_with_model(&clf, &x, true).unwrap() {
        Predictions::Probabilities(probs) => assert_eq!(probs.dim(), (5, 2)),
        other => panic!("expected probabilities, got {:?}", other),
    }
}

#[test]
fn set_decision_threshold_updates_default() {
    let (x, y) = small_dataset();
    let mut clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();
    set_decision_threshold(&mut clf, 0.9).unwrap();
    assert!((clf.decision_threshold() - 0.9).abs() < 1e-12);
    assert!(set_decision_threshold(&mut clf, -0.5).is_err());
    assert!((clf.decision_threshold() - 0.9).abs() < 1e-12);
}

#[test]
fn train_from_hyperparameter_map_ignores_unknown_keys() {
    let (x, y) = small_dataset();
    let params = Hyperparameters::from_json_value(&json!({
        "min_samples_split": 3,
        "min_samples_leaf": "1",
        "positive_class_weight": 2,
        "max_depth": 7,
        "criterion": "entropy"
    }))
    .unwrap();
    let clf = train_predictor_model(&x, &y, &params).unwrap();
    assert_eq!(
        clf.to_string(),
        "Model name: Decision Tree Binary Classifier (min_samples_leaf: 1, min_samples_split: 3)"
    );
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn save_then_load_round_trips_outputs() {
    let (x, y) = noisy_dataset();
    let clf = train_predictor_model(
        &x,
        &y,
        &Hyperparameters::new(2, 1, 0.4, 1.7).unwrap(),
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("model").join("artifacts");
    save_predictor_model(&clf, &model_dir).unwrap();
    assert!(model_dir.join(PREDICTOR_FILE_NAME).is_file());

    let loaded = load_predictor_model(&model_dir).unwrap();
    assert!(loaded.is_trained());
    assert_eq!(loaded.hyperparameters(), clf.hyperparameters());
    assert_eq!(loaded.predict_proba(&x).unwrap(), clf.predict_proba(&x).unwrap());
    assert_eq!(loaded.predict(&x, None).unwrap(), clf.predict(&x, None).unwrap());
    assert_eq!(loaded.to_string(), clf.to_string());
}

#[test]
fn saving_untrained_model_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let clf = Classifier::default();
    assert!(matches!(clf.save(dir.path()), Err(ClassifierError::NotFitted)));
    assert!(matches!(
        save_predictor_model(&clf, dir.path()),
        Err(ClassifierError::NotFitted)
    ));
    assert!(!dir.path().join(PREDICTOR_FILE_NAME).exists());
}

#[test]
fn method_save_requires_existing_directory() {
    let (x, y) = small_dataset();
    let clf = train_predictor_model(&x, &y, &Hyperparameters::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-created");
    assert!(matches!(clf.save(&missing), Err(ClassifierError::Io(_))));
}

#[test]
fn load_reports_missing_and_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_predictor_model(dir.path()),
        Err(ClassifierError::Io(_))
    ));

    fs::write(dir.path().join(PREDICTOR_FILE_NAME), b"not a predictor").unwrap();
    assert!(matches!(
        load_predictor_model(dir.path()),
        Err(ClassifierError::Serialization(_))
    ));
}
