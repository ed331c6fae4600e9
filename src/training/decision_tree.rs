//! Decision tree classifier (CART)

use crate::error::{Result, TrainJobError};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf predicting the class at `class_idx`
    Leaf {
        class_idx: usize,
        n_samples: usize,
    },
    /// Internal node; rows with `x[feature_idx] <= threshold` go left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Impurity criterion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Criterion {
    /// Gini impurity
    Gini,
    /// Shannon entropy
    Entropy,
}

impl Criterion {
    fn impurity(self, counts: &[usize], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let n = total as f64;
        match self {
            Criterion::Gini => {
                1.0 - counts
                    .iter()
                    .map(|&c| (c as f64 / n).powi(2))
                    .sum::<f64>()
            }
            Criterion::Entropy => -counts
                .iter()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / n;
                    p * p.ln()
                })
                .sum::<f64>(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Gini => "gini",
            Criterion::Entropy => "entropy",
        }
    }
}

/// Decision tree classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    /// Maximum depth (`None` grows until leaves are pure)
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Impurity criterion
    pub criterion: Criterion,
    n_features: usize,
    /// Sorted distinct label values seen during fit
    classes: Vec<f64>,
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Unconstrained tree with Gini impurity
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: Criterion::Gini,
            n_features: 0,
            classes: Vec::new(),
            feature_importances: None,
        }
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(TrainJobError::ShapeMismatch {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(TrainJobError::Training("cannot fit a tree on zero rows".to_string()));
        }
        if self.min_samples_split < 2 || self.min_samples_leaf < 1 {
            return Err(TrainJobError::InvalidParameter {
                name: "min_samples_split/min_samples_leaf".to_string(),
                value: format!("{}/{}", self.min_samples_split, self.min_samples_leaf),
                reason: "need min_samples_split >= 2 and min_samples_leaf >= 1".to_string(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(TrainJobError::Training("features contain NaN or infinite values".to_string()));
        }

        let mut classes: Vec<f64> = y.to_vec();
        classes.sort_by(|a, b| a.total_cmp(b));
        classes.dedup();

        let labels: Vec<usize> = y
            .iter()
            .map(|v| classes.partition_point(|c| c < v))
            .collect();

        self.n_features = x.ncols();
        self.classes = classes;

        let mut importances = vec![0.0; self.n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_tree(x, &labels, &indices, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|imp| *imp /= total);
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn class_counts(&self, labels: &[usize], indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.classes.len()];
        for &i in indices {
            counts[labels[i]] += 1;
        }
        counts
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        labels: &[usize],
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let counts = self.class_counts(labels, indices);
        let leaf = TreeNode::Leaf {
            class_idx: majority(&counts),
            n_samples,
        };

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        if pure
            || n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
        {
            return leaf;
        }

        let Some((feature_idx, threshold, gain)) = self.find_best_split(x, labels, indices, &counts) else {
            return leaf;
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature_idx]] <= threshold);

        importances[feature_idx] += n_samples as f64 * gain.max(0.0);

        let left = Box::new(self.build_tree(x, labels, &left_indices, depth + 1, importances));
        let right = Box::new(self.build_tree(x, labels, &right_indices, depth + 1, importances));

        TreeNode::Split {
            feature_idx,
            threshold,
            left,
            right,
            n_samples,
            impurity: self.criterion.impurity(&counts, n_samples),
        }
    }

    /// Best `(feature, threshold, impurity decrease)` over all features.
    ///
    /// Each feature is scanned once in sorted order, moving rows from the
    /// right child to the left one. Ties keep the lowest feature index and
    /// the lowest threshold. A split with zero gain is still taken, so an
    /// impure node only becomes a leaf when its rows cannot be separated.
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        labels: &[usize],
        indices: &[usize],
        parent_counts: &[usize],
    ) -> Option<(usize, f64, f64)> {
        let n = indices.len();
        let parent_impurity = self.criterion.impurity(parent_counts, n);

        let per_feature: Vec<Option<(usize, f64, f64)>> = (0..self.n_features)
            .into_par_iter()
            .map(|feature_idx| {
                let mut order = indices.to_vec();
                order.sort_by(|&a, &b| x[[a, feature_idx]].total_cmp(&x[[b, feature_idx]]));

                let mut left = vec![0usize; parent_counts.len()];
                let mut right = parent_counts.to_vec();
                let mut best: Option<(f64, f64)> = None;

                for pos in 0..n - 1 {
                    let row = order[pos];
                    left[labels[row]] += 1;
                    right[labels[row]] -= 1;

                    let lo = x[[row, feature_idx]];
                    let hi = x[[order[pos + 1], feature_idx]];
                    if lo == hi {
                        continue;
                    }

                    let n_left = pos + 1;
                    let n_right = n - n_left;
                    if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                        continue;
                    }

                    let weighted = (n_left as f64 * self.criterion.impurity(&left, n_left)
                        + n_right as f64 * self.criterion.impurity(&right, n_right))
                        / n as f64;
                    let gain = parent_impurity - weighted;

                    if gain > best.map_or(f64::NEG_INFINITY, |(g, _)| g) {
                        let mut threshold = (lo + hi) / 2.0;
                        if threshold >= hi {
                            threshold = lo;
                        }
                        best = Some((gain, threshold));
                    }
                }

                best.map(|(gain, threshold)| (feature_idx, threshold, gain))
            })
            .collect();

        per_feature
            .into_iter()
            .flatten()
            .fold(None, |acc: Option<(usize, f64, f64)>, cand| match acc {
                Some(best) if best.2 >= cand.2 => Some(best),
                _ => Some(cand),
            })
    }

    /// Predict the class value of each row
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(TrainJobError::ModelNotFitted)?;
        if x.ncols() != self.n_features {
            return Err(TrainJobError::ShapeMismatch {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.rows()
            .into_iter()
            .map(|row| self.classes[leaf_class(root, row)])
            .collect())
    }

    /// Sorted distinct label values seen during fit
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Normalized total impurity decrease per feature
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    pub fn get_depth(&self) -> usize {
        fn depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        self.root.as_ref().map_or(0, depth)
    }

    pub fn get_n_leaves(&self) -> usize {
        fn leaves(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => leaves(left) + leaves(right),
            }
        }
        self.root.as_ref().map_or(0, leaves)
    }
}

/// Most frequent class; ties go to the lowest index
fn majority(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .fold((0, 0), |(best_idx, best), (idx, &c)| {
            if c > best {
                (idx, c)
            } else {
                (best_idx, best)
            }
        })
        .0
}

fn leaf_class(mut node: &TreeNode, row: ArrayView1<f64>) -> usize {
    loop {
        match node {
            TreeNode::Leaf { class_idx, .. } => return *class_idx,
            TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                node = if row[*feature_idx] <= *threshold { left } else { right };
            }
        }
    }
}
