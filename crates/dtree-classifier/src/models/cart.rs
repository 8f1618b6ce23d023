//! Weighted CART growth for binary targets.
//!
//! Splits minimise the class-weighted Gini impurity of the children. Size
//! limits count rows, not weights. Trees are grown until leaves are pure or
//! no admissible split is left, and are never pruned, so every leaf keeps
//! the class totals of exactly the rows routed to it.
use ndarray::{ArrayView1, ArrayView2};

use crate::models::fitted_tree::{FittedTree, Node};

/// Row-count limits on node growth.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GrowthLimits {
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

/// Weighted `(negative, positive)` totals of a set of rows.
#[derive(Debug, Clone, Copy, Default)]
struct ClassTotals {
    negative: f64,
    positive: f64,
}

impl ClassTotals {
    fn add(&mut self, label: bool, class_weights: (f64, f64)) {
        if label {
            self.positive += class_weights.1;
        } else {
            self.negative += class_weights.0;
        }
    }

    fn total(&self) -> f64 {
        self.negative + self.positive
    }

    fn gini(&self) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }
        let p = self.positive / total;
        let n = self.negative / total;
        1.0 - p * p - n * n
    }
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    improvement: f64,
}

/// Grow a tree on `x` with boolean labels and `(negative, positive)` class weights.
pub(crate) fn grow_tree(
    x: ArrayView2<f64>,
    labels: ArrayView1<bool>,
    class_weights: (f64, f64),
    limits: GrowthLimits,
) -> FittedTree {
    let placeholder = Node::Leaf {
        negative_weight: 0.0,
        positive_weight: 0.0,
    };
    let mut nodes = vec![placeholder.clone()];
    let mut pending = vec![(0usize, (0..x.nrows()).collect::<Vec<usize>>())];

    while let Some((index, rows)) = pending.pop() {
        let mut totals = ClassTotals::default();
        for &row in &rows {
            totals.add(labels[row], class_weights);
        }

        let splittable = rows.len() >= limits.min_samples_split
            && rows.len() >= 2 * limits.min_samples_leaf
            && totals.gini() > f64::EPSILON;
        let split = if splittable {
            best_split(x, labels, class_weights, &rows, totals, limits.min_samples_leaf)
        } else {
            None
        };

        match split {
            Some(split) => {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                    .into_iter()
                    .partition(|&row| x[[row, split.feature]] <= split.threshold);
                let left = nodes.len();
                let right = left + 1;
                nodes.push(placeholder.clone());
                nodes.push(placeholder.clone());
                nodes[index] = Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                };
                pending.push((right, right_rows));
                pending.push((left, left_rows));
            }
            None => {
                nodes[index] = Node::Leaf {
                    negative_weight: totals.negative,
                    positive_weight: totals.positive,
                };
            }
        }
    }

    FittedTree::from_nodes(nodes, x.ncols())
}

/// Best admissible split of `rows`, or `None` if every feature is constant
/// on them or no threshold leaves `min_samples_leaf` rows on both sides.
///
/// Any admissible split is accepted, including one with zero gain; ties
/// keep the lowest feature index and the lowest threshold.
fn best_split(
    x: ArrayView2<f64>,
    labels: ArrayView1<bool>,
    class_weights: (f64, f64),
    rows: &[usize],
    parent: ClassTotals,
    min_samples_leaf: usize,
) -> Option<Split> {
    let n = rows.len();
    let parent_total = parent.total();
    let parent_gini = parent.gini();
    let mut best: Option<Split> = None;
    let mut sorted: Vec<(f64, bool)> = Vec::with_capacity(n);

    for feature in 0..x.ncols() {
        sorted.clear();
        sorted.extend(rows.iter().map(|&row| (x[[row, feature]], labels[row])));
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left = ClassTotals::default();
        for i in 1..n {
            left.add(sorted[i - 1].1, class_weights);
            let (lower, upper) = (sorted[i - 1].0, sorted[i].0);
            if upper <= lower || i < min_samples_leaf || n - i < min_samples_leaf {
                continue;
            }

            let right = ClassTotals {
                negative: parent.negative - left.negative,
                positive: parent.positive - left.positive,
            };
            let improvement = parent_gini
                - (left.total() / parent_total) * left.gini()
                - (right.total() / parent_total) * right.gini();

            if best.map_or(true, |b| improvement > b.improvement) {
                best = Some(Split {
                    feature,
                    threshold: split_threshold(lower, upper),
                    improvement,
                });
            }
        }
    }

    best
}

/// Midpoint of two adjacent distinct values, kept strictly below `upper` so
/// `<=` routing reproduces the partition the split was scored on.
fn split_threshold(lower: f64, upper: f64) -> f64 {
    let mid = lower / 2.0 + upper / 2.0;
    if mid >= upper || !mid.is_finite() {
        lower
    } else {
        mid
    }
}
