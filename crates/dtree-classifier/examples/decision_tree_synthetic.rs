use ndarray::{Array1, Array2};

use dtree_classifier::logging::init_logger;
use dtree_classifier::{
    evaluate_predictor_model, load_predictor_model, predict_with_model, save_predictor_model,
    train_predictor_model, Hyperparameters, Predictions,
};

fn main() -> anyhow::Result<()> {
    init_logger("error,dtree_classifier=debug");

    // Tiny synthetic dataset: 8 samples, 2 features
    // positive when the first feature is large, with one noisy label
    let x = Array2::from_shape_vec(
        (8, 2),
        vec![
            0.1, 3.0, //
            0.2, 1.0, //
            0.3, 2.5, //
            0.4, 0.5, //
            0.9, 2.0, //
            1.0, 1.5, //
            1.1, 0.2, //
            1.2, 2.2, //
        ],
    )?;
    let y = Array1::from_vec(vec![0, 0, 1, 0, 1, 1, 0, 1]);

    let params = Hyperparameters::new(2, 2, 0.5, 1.5)?;
    let clf = train_predictor_model(&x, &y, &params)?;
    println!("{}", clf);

    if let Predictions::Probabilities(probs) = predict_with_model(&clf, &x, true)? {
        println!("P(positive) = {:?}", probs.column(1).to_vec());
    }
    println!("F1 = {:.3}", evaluate_predictor_model(&clf, &x, &y, None)?);

    let dir = std::env::temp_dir().join("dtree_classifier_demo");
    save_predictor_model(&clf, &dir)?;
    let reloaded = load_predictor_model(&dir)?;
    println!("Reloaded: {}", reloaded);

    Ok(())
}
