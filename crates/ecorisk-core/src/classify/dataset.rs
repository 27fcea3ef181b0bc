//! Synthetic training corpus for the learned classifier.
//!
//! Labels come from an auxiliary additive rule, deliberately independent of
//! the production scorer but aligned with its ecology: low vegetation, urban
//! ground cover, high heat, and low water each add risk.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::forest::N_FEATURES;

pub const N_SAMPLES: usize = 1000;

/// Label a feature vector with the auxiliary rule:
/// vegetation < 0.3 → +2, urban code → +3, temperature > 33 → +2,
/// water < 0.2 → +2; score ≥6 High (2), ≥3 Medium (1), else Low (0).
pub fn synthetic_label(features: &[f64; N_FEATURES]) -> usize {
    let mut score = 0;
    if features[0] < 0.3 {
        score += 2;
    }
    if features[1] == 2.0 {
        score += 3;
    }
    if features[2] > 33.0 {
        score += 2;
    }
    if features[3] < 0.2 {
        score += 2;
    }

    if score >= 6 {
        2
    } else if score >= 3 {
        1
    } else {
        0
    }
}

/// Draw the fixed-seed training set: vegetation U[0.1,0.9], land-use code
/// uniform over {0,1,2,3}, temperature U[20,40], water U[0,1].
pub fn synthetic_training_set(seed: u64) -> (Vec<[f64; N_FEATURES]>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(N_SAMPLES);
    let mut labels = Vec::with_capacity(N_SAMPLES);

    for _ in 0..N_SAMPLES {
        let features = [
            rng.gen_range(0.1..0.9),
            rng.gen_range(0..4) as f64,
            rng.gen_range(20.0..40.0),
            rng.gen_range(0.0..1.0),
        ];
        labels.push(synthetic_label(&features));
        samples.push(features);
    }
    (samples, labels)
}
