//! Trained decision tree handle.
//!
//! The tree is stored as a flat node arena. Leaves keep the class-weighted
//! totals of the training rows that reached them, so the positive-class
//! probability of a row is the weighted positive fraction of its leaf.
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) enum Node {
    /// Rows with `x[feature] <= threshold` go left, all others right.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        negative_weight: f64,
        positive_weight: f64,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FittedTree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl FittedTree {
    pub(crate) fn from_nodes(nodes: Vec<Node>, n_features: usize) -> Self {
        FittedTree { nodes, n_features }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Number of split levels between the root and the deepest leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            match &self.nodes[index] {
                Node::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Node::Leaf { .. } => deepest = deepest.max(depth),
            }
        }
        deepest
    }

    /// Check the arena read back from disk before it is used.
    ///
    /// Children always sit after their parent, which keeps every traversal
    /// finite, and every index must be in bounds.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ClassifierError::MalformedModel("tree has no nodes".to_string()));
        }
        let len = self.nodes.len();
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    for child in [*left, *right] {
                        if child <= index || child >= len {
                            return Err(ClassifierError::MalformedModel(format!(
                                "node {} points to invalid child {}",
                                index, child
                            )));
                        }
                    }
                    if *feature >= self.n_features {
                        return Err(ClassifierError::MalformedModel(format!(
                            "node {} splits on feature {} of {}",
                            index, feature, self.n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ClassifierError::MalformedModel(format!(
                            "node {} has a NaN threshold",
                            index
                        )));
                    }
                }
                Node::Leaf {
                    negative_weight,
                    positive_weight,
                } => {
                    let total = negative_weight + positive_weight;
                    if *negative_weight < 0.0 || *positive_weight < 0.0 || !(total.is_finite() && total > 0.0) {
                        return Err(ClassifierError::MalformedModel(format!(
                            "leaf {} has invalid class weights",
                            index
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Class probabilities, one row per sample: `[P(negative), P(positive)]`.
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features {
            return Err(ClassifierError::FeatureMismatch {
                expected: self.n_features,
                found: x.ncols(),
            });
        }

        let mut probs = Array2::<f64>::zeros((x.nrows(), 2));
        for (row, mut out) in x.outer_iter().zip(probs.outer_iter_mut()) {
            let positive = self.leaf_positive_probability(self.leaf_index(row));
            out[0] = 1.0 - positive;
            out[1] = positive;
        }
        Ok(probs)
    }

    fn leaf_index(&self, row: ArrayView1<f64>) -> usize {
        let mut index = 0;
        while let Node::Split {
            feature,
            threshold,
            left,
            right,
        } = &self.nodes[index]
        {
            index = if row[*feature] <= *threshold { *left } else { *right };
        }
        index
    }

    fn leaf_positive_probability(&self, index: usize) -> f64 {
        match &self.nodes[index] {
            Node::Leaf {
                negative_weight,
                positive_weight,
            } => {
                let total = negative_weight + positive_weight;
                if total > 0.0 {
                    positive_weight / total
                } else {
                    0.0
                }
            }
            Node::Split { .. } => unreachable!("leaf_index always stops at a leaf"),
        }
    }
}
