pub(crate) mod cart;
pub mod classifier_trait;
pub mod decision_tree;
pub mod fitted_tree;
