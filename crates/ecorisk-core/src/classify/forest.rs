//! Random forest of CART decision trees: gini splits, bootstrap resampling,
//! random feature subsets, leaf class distributions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Feature vector layout: vegetation index, land-use code, temperature, water index.
pub const N_FEATURES: usize = 4;
pub const N_CLASSES: usize = 3;

/// Features considered per split (~√N_FEATURES).
const FEATURES_PER_SPLIT: usize = 2;
/// Nodes with fewer samples become leaves.
const MIN_SPLIT_SAMPLES: usize = 2;
/// Stream constant separating per-tree RNG streams.
const TREE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Forest geometry and training seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self { n_trees: 100, max_depth: 10, seed: 42 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Split { feature: usize, threshold: f64, left: usize, right: usize },
    Leaf { distribution: [f64; N_CLASSES] },
}

/// One CART tree. Node 0 is the root; children are stored by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree over the given bootstrap sample indices.
    fn fit(
        samples: &[[f64; N_FEATURES]],
        labels: &[usize],
        indices: Vec<usize>,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build(samples, labels, indices, 0, max_depth, rng);
        tree
    }

    /// Recursively grow the subtree for `indices`; returns its root node index.
    fn build(
        &mut self,
        samples: &[[f64; N_FEATURES]],
        labels: &[usize],
        indices: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> usize {
        let counts = class_counts(labels, &indices);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

        if depth >= max_depth || indices.len() < MIN_SPLIT_SAMPLES || pure {
            return self.push_leaf(&counts, indices.len());
        }

        let Some((feature, threshold)) = best_split(samples, labels, &indices, &counts, rng)
        else {
            return self.push_leaf(&counts, indices.len());
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| samples[i][feature] <= threshold);

        // Placeholder so children can be built before the split is linked in.
        let node = self.nodes.len();
        self.nodes.push(Node::Leaf { distribution: [0.0; N_CLASSES] });
        let left = self.build(samples, labels, left_idx, depth + 1, max_depth, rng);
        let right = self.build(samples, labels, right_idx, depth + 1, max_depth, rng);
        self.nodes[node] = Node::Split { feature, threshold, left, right };
        node
    }

    fn push_leaf(&mut self, counts: &[usize; N_CLASSES], total: usize) -> usize {
        let mut distribution = [0.0; N_CLASSES];
        if total > 0 {
            for (slot, &c) in distribution.iter_mut().zip(counts) {
                *slot = c as f64 / total as f64;
            }
        }
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }

    /// Walk the tree to a leaf and return its class distribution.
    pub fn predict(&self, features: &[f64; N_FEATURES]) -> [f64; N_CLASSES] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split { feature, threshold, left, right } => {
                    idx = if features[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { distribution } => return *distribution,
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

fn class_counts(labels: &[usize], indices: &[usize]) -> [usize; N_CLASSES] {
    let mut counts = [0usize; N_CLASSES];
    for &i in indices {
        counts[labels[i]] += 1;
    }
    counts
}

fn gini(counts: &[usize; N_CLASSES], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let mut sum_sq = 0.0;
    for &c in counts {
        let p = c as f64 / total as f64;
        sum_sq += p * p;
    }
    1.0 - sum_sq
}

/// Exhaustive threshold sweep over a random feature subset. Returns the
/// (feature, threshold) minimizing weighted child gini, or None when no
/// split improves on the parent.
fn best_split(
    samples: &[[f64; N_FEATURES]],
    labels: &[usize],
    indices: &[usize],
    parent_counts: &[usize; N_CLASSES],
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let n = indices.len();
    let parent_gini = gini(parent_counts, n);
    let mut best: Option<(f64, usize, f64)> = None;

    for feature in rand::seq::index::sample(rng, N_FEATURES, FEATURES_PER_SPLIT) {
        let mut ordered: Vec<(f64, usize)> = indices
            .iter()
            .map(|&i| (samples[i][feature], labels[i]))
            .collect();
        ordered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut left = [0usize; N_CLASSES];
        let mut right = *parent_counts;
        for k in 0..n - 1 {
            let (value, label) = ordered[k];
            left[label] += 1;
            right[label] -= 1;
            // A boundary only exists between distinct values.
            if value == ordered[k + 1].0 {
                continue;
            }
            let n_left = k + 1;
            let n_right = n - n_left;
            let weighted = (gini(&left, n_left) * n_left as f64
                + gini(&right, n_right) * n_right as f64)
                / n as f64;
            if best.map_or(true, |(score, _, _)| weighted < score) {
                best = Some((weighted, feature, (value + ordered[k + 1].0) / 2.0));
            }
        }
    }

    match best {
        Some((score, feature, threshold)) if score < parent_gini - 1e-12 => {
            Some((feature, threshold))
        }
        _ => None,
    }
}

/// Bootstrap ensemble of decision trees with an averaged probability vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit `config.n_trees` trees, each on its own bootstrap resample, each
    /// with its own seeded RNG stream.
    pub fn fit(config: ForestConfig, samples: &[[f64; N_FEATURES]], labels: &[usize]) -> Self {
        let n = samples.len();
        let trees = (0..config.n_trees)
            .map(|t| {
                let mut rng =
                    StdRng::seed_from_u64(config.seed ^ (t as u64).wrapping_mul(TREE_STREAM));
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(samples, labels, bootstrap, config.max_depth, &mut rng)
            })
            .collect();
        Self { config, trees }
    }

    /// Average the per-tree leaf distributions. Non-negative, sums to 1
    /// within floating tolerance.
    pub fn predict_proba(&self, features: &[f64; N_FEATURES]) -> [f64; N_CLASSES] {
        let mut acc = [0.0; N_CLASSES];
        for tree in &self.trees {
            let dist = tree.predict(features);
            for (a, d) in acc.iter_mut().zip(&dist) {
                *a += d;
            }
        }
        for a in acc.iter_mut() {
            *a /= self.trees.len() as f64;
        }
        acc
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Two well-separated clusters on feature 0.
    fn toy_set() -> (Vec<[f64; N_FEATURES]>, Vec<usize>) {
        let mut samples = Vec::new();
        let mut labels = Vec::new();
        for k in 0..20 {
            let jitter = k as f64 * 0.001;
            samples.push([0.1 + jitter, 0.0, 25.0, 0.5]);
            labels.push(0);
            samples.push([0.8 + jitter, 2.0, 35.0, 0.1]);
            labels.push(2);
        }
        (samples, labels)
    }

    #[test]
    fn forest_separates_toy_clusters() {
        let (samples, labels) = toy_set();
        let config = ForestConfig { n_trees: 10, max_depth: 4, seed: 7 };
        let forest = RandomForest::fit(config, &samples, &labels);

        let low = forest.predict_proba(&[0.12, 0.0, 25.0, 0.5]);
        assert!(low[0] > 0.9, "low cluster got p(low) = {}", low[0]);

        let high = forest.predict_proba(&[0.85, 2.0, 35.0, 0.1]);
        assert!(high[2] > 0.9, "high cluster got p(high) = {}", high[2]);
    }

    #[test]
    fn probabilities_are_a_distribution() {
        let (samples, labels) = toy_set();
        let forest = RandomForest::fit(ForestConfig::default(), &samples, &labels);
        for features in [[0.5, 1.0, 30.0, 0.3], [0.0, 3.0, 40.0, 0.0]] {
            let proba = forest.predict_proba(&features);
            let sum: f64 = proba.iter().sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-6);
            assert!(proba.iter().all(|&p| p >= 0.0));
        }
    }

    #[test]
    fn fitting_is_deterministic() {
        let (samples, labels) = toy_set();
        let config = ForestConfig { n_trees: 5, max_depth: 3, seed: 11 };
        let a = RandomForest::fit(config, &samples, &labels);
        let b = RandomForest::fit(config, &samples, &labels);
        assert_eq!(a, b, "same config + data must grow the same forest");
    }

    #[test]
    fn pure_node_becomes_a_leaf() {
        let samples = vec![[0.5, 0.0, 25.0, 0.5]; 8];
        let labels = vec![1usize; 8];
        let mut rng = StdRng::seed_from_u64(3);
        let tree = DecisionTree::fit(&samples, &labels, (0..8).collect(), 10, &mut rng);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict(&[0.5, 0.0, 25.0, 0.5]), [0.0, 1.0, 0.0]);
    }
}
