//! Binary decision-tree classifier with Gini impurity splits.
//!
//! Greedy top-down induction: at each node every feature's candidate
//! thresholds (midpoints between adjacent distinct values) are scored by
//! weighted Gini reduction, and the best split wins. The fit is fully
//! deterministic; randomness lives in the dataset split, not here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Seed for the train/test shuffle; the tree itself is deterministic.
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            min_samples_split: 10,
            min_samples_leaf: 4,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    /// Split feature and threshold; `None` marks a leaf.
    split: Option<(usize, f64)>,
    /// Fraction of up-labelled samples that reached this node.
    prob_up: f64,
    n_samples: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(labels: &[u8]) -> Self {
        Self {
            split: None,
            prob_up: prob_up(labels),
            n_samples: labels.len(),
            left: None,
            right: None,
        }
    }

}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<Node>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    /// Fit on scaled feature rows and binary labels.
    pub fn fit(&mut self, feature_names: &[String], rows: &[Vec<f64>], labels: &[u8]) {
        let n_features = rows.first().map(|r| r.len()).unwrap_or(0);
        self.feature_names = feature_names.to_vec();
        self.feature_importances = vec![0.0; n_features];

        let indices: Vec<usize> = (0..rows.len()).collect();
        self.root = Some(self.build(rows, labels, &indices, 0));

        let total: f64 = self.feature_importances.iter().sum();
        if total > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= total;
            }
        }
    }

    fn build(&mut self, rows: &[Vec<f64>], labels: &[u8], indices: &[usize], depth: usize) -> Node {
        let node_labels: Vec<u8> = indices.iter().map(|&i| labels[i]).collect();
        let impurity = gini(&node_labels);

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || impurity < 1e-10
        {
            return Node::leaf(&node_labels);
        }

        let Some(best) = self.best_split(rows, labels, indices, impurity) else {
            return Node::leaf(&node_labels);
        };

        if best.left.len() < self.config.min_samples_leaf
            || best.right.len() < self.config.min_samples_leaf
        {
            return Node::leaf(&node_labels);
        }

        self.feature_importances[best.feature] += best.gain * indices.len() as f64;

        let left = self.build(rows, labels, &best.left, depth + 1);
        let right = self.build(rows, labels, &best.right, depth + 1);

        Node {
            split: Some((best.feature, best.threshold)),
            prob_up: prob_up(&node_labels),
            n_samples: indices.len(),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    fn best_split(
        &self,
        rows: &[Vec<f64>],
        labels: &[u8],
        indices: &[usize],
        parent_impurity: f64,
    ) -> Option<Split> {
        let n_features = rows[indices[0]].len();
        let n_total = indices.len() as f64;
        let mut best: Option<Split> = None;

        for feature in 0..n_features {
            let mut values: Vec<f64> = indices.iter().map(|&i| rows[i][feature]).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;

                let (left, right): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| rows[i][feature] <= threshold);
                if left.is_empty() || right.is_empty() {
                    continue;
                }

                let left_labels: Vec<u8> = left.iter().map(|&i| labels[i]).collect();
                let right_labels: Vec<u8> = right.iter().map(|&i| labels[i]).collect();

                let weighted = (left.len() as f64 * gini(&left_labels)
                    + right.len() as f64 * gini(&right_labels))
                    / n_total;
                let gain = parent_impurity - weighted;

                if gain > best.as_ref().map(|s| s.gain).unwrap_or(0.0) {
                    best = Some(Split {
                        feature,
                        threshold,
                        gain,
                        left,
                        right,
                    });
                }
            }
        }

        best
    }

    /// Probability of the up class for a single sample.
    pub fn predict_proba_one(&self, row: &[f64]) -> f64 {
        let Some(mut node) = self.root.as_ref() else {
            return 0.5;
        };
        while let Some((feature, threshold)) = node.split {
            let child = if row[feature] <= threshold {
                node.left.as_deref()
            } else {
                node.right.as_deref()
            };
            match child {
                Some(c) => node = c,
                None => break,
            }
        }
        node.prob_up
    }

    pub fn predict_one(&self, row: &[f64]) -> u8 {
        u8::from(self.predict_proba_one(row) > 0.5)
    }

    pub fn accuracy(&self, rows: &[Vec<f64>], labels: &[u8]) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }
        let correct = rows
            .iter()
            .zip(labels)
            .filter(|(row, &label)| self.predict_one(row) == label)
            .count();
        correct as f64 / rows.len() as f64
    }

    pub fn feature_importances(&self) -> Vec<(&str, f64)> {
        self.feature_names
            .iter()
            .map(String::as_str)
            .zip(self.feature_importances.iter().copied())
            .collect()
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

fn prob_up(labels: &[u8]) -> f64 {
    if labels.is_empty() {
        return 0.5;
    }
    labels.iter().filter(|&&l| l == 1).count() as f64 / labels.len() as f64
}

/// Gini impurity for binary labels: 2p(1-p).
fn gini(labels: &[u8]) -> f64 {
    let p = prob_up(labels);
    2.0 * p * (1.0 - p)
}
