/// Classifier maintenance tool: train (or retrain) the risk-classifier
/// artifact and report agreement with the synthetic label rule on a held-out
/// evaluation draw.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use ecorisk_core::classify::dataset::{synthetic_label, synthetic_training_set};
use ecorisk_core::classify::forest::ForestConfig;
use ecorisk_core::classify::{RiskClass, RiskClassifier, DEFAULT_ARTIFACT_PATH};
use ecorisk_core::LandUse;

#[derive(Parser, Debug)]
#[command(
    name = "classifier",
    about = "Train and evaluate the persisted biodiversity risk classifier"
)]
struct Args {
    /// Classifier artifact path
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    artifact: PathBuf,

    /// Retrain even when a loadable artifact exists
    #[arg(long)]
    retrain: bool,

    /// Trees in the forest
    #[arg(long, default_value = "100")]
    n_trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "10")]
    max_depth: usize,

    /// Training seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Seed for the held-out evaluation draw
    #[arg(long, default_value = "1337")]
    eval_seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ForestConfig {
        n_trees: args.n_trees,
        max_depth: args.max_depth,
        seed: args.seed,
    };

    let classifier = if args.retrain {
        let classifier = RiskClassifier::train(config);
        classifier.save(&args.artifact)?;
        classifier
    } else {
        RiskClassifier::load_or_train(&args.artifact)
    };
    let config = classifier.config();
    println!(
        "forest: {} trees, depth {}, seed {} ({})",
        config.n_trees,
        config.max_depth,
        config.seed,
        args.artifact.display()
    );

    // Held-out draw from a different seed than training.
    let (samples, labels) = synthetic_training_set(args.eval_seed);
    let mut agree = 0usize;
    let mut per_class = [[0usize; 3]; 3];
    for (features, &label) in samples.iter().zip(&labels) {
        debug_assert_eq!(label, synthetic_label(features));
        let land_use = match features[1] as usize {
            1 => LandUse::Agriculture,
            2 => LandUse::Urban,
            3 => LandUse::Water,
            _ => LandUse::Forest,
        };
        let prediction = classifier.predict(features[0], land_use, features[2], features[3]);
        let predicted = prediction.predicted_class.index();
        per_class[label][predicted] += 1;
        if predicted == label {
            agree += 1;
        }
    }

    println!(
        "holdout agreement: {agree}/{} ({:.1}%)",
        samples.len(),
        agree as f64 / samples.len() as f64 * 100.0
    );
    for (i, row) in per_class.iter().enumerate() {
        let total: usize = row.iter().sum();
        println!(
            "  {:<12} n={total:<4} → Low {} / Medium {} / High {}",
            RiskClass::from_index(i).label(),
            row[0],
            row[1],
            row[2]
        );
    }
    Ok(())
}
