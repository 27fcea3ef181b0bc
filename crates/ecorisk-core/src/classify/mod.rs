//! Learned risk classifier: a random forest trained once on synthetic data,
//! used as a cross-check on the rule-based scorer, never as the authority.
//!
//! Initialization is the only I/O in the crate: a JSON parameter artifact is
//! loaded if present and valid, otherwise the forest is retrained and the
//! artifact rewritten. Artifact problems are recovered here and never
//! surfaced to callers.

pub mod dataset;
pub mod forest;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::grid::LandUse;
use forest::{ForestConfig, RandomForest, N_CLASSES, N_FEATURES};

/// Default artifact location, overridable via `ECORISK_CLASSIFIER`.
pub const DEFAULT_ARTIFACT_PATH: &str = "data/risk_classifier.json";

const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Classifier output classes, index-aligned with forest class codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskClass {
    Low,
    Medium,
    High,
}

impl RiskClass {
    pub fn index(self) -> usize {
        match self {
            RiskClass::Low    => 0,
            RiskClass::Medium => 1,
            RiskClass::High   => 2,
        }
    }

    pub fn from_index(i: usize) -> Self {
        match i {
            0 => RiskClass::Low,
            1 => RiskClass::Medium,
            _ => RiskClass::High,
        }
    }

    /// Report label, matching the published response vocabulary.
    pub fn label(self) -> &'static str {
        match self {
            RiskClass::Low    => "Low Risk",
            RiskClass::Medium => "Medium Risk",
            RiskClass::High   => "High Risk",
        }
    }
}

/// Full-precision classifier output for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierPrediction {
    pub predicted_class: RiskClass,
    /// Probability mass of the predicted class.
    pub confidence: f64,
    /// Distribution over classes, index-aligned with `RiskClass`.
    pub probabilities: [f64; N_CLASSES],
}

impl ClassifierPrediction {
    pub fn probability(&self, class: RiskClass) -> f64 {
        self.probabilities[class.index()]
    }

    /// Report shape: named class keys, values rounded to 2 decimals.
    pub fn rounded(&self) -> PredictionReport {
        let round2 = |v: f64| (v * 100.0).round() / 100.0;
        PredictionReport {
            prediction: self.predicted_class.label(),
            confidence: round2(self.confidence),
            probabilities: ProbabilityTable {
                low: round2(self.probabilities[0]),
                medium: round2(self.probabilities[1]),
                high: round2(self.probabilities[2]),
            },
        }
    }
}

/// Serialized classifier section of a cell report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub prediction: &'static str,
    pub confidence: f64,
    pub probabilities: ProbabilityTable,
}

/// Per-class probability map with stable key names and ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityTable {
    #[serde(rename = "Low Risk")]
    pub low: f64,
    #[serde(rename = "Medium Risk")]
    pub medium: f64,
    #[serde(rename = "High Risk")]
    pub high: f64,
}

/// Versioned on-disk wrapper around the fitted forest.
#[derive(Serialize, Deserialize)]
struct ClassifierArtifact {
    format_version: u32,
    forest: RandomForest,
}

/// The trained classifier. Read-only after construction; share freely.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskClassifier {
    forest: RandomForest,
}

impl RiskClassifier {
    /// Fit a fresh forest on the synthetic corpus.
    pub fn train(config: ForestConfig) -> Self {
        info!(
            n_trees = config.n_trees,
            max_depth = config.max_depth,
            seed = config.seed,
            "training risk classifier on synthetic corpus"
        );
        let (samples, labels) = dataset::synthetic_training_set(config.seed);
        Self { forest: RandomForest::fit(config, &samples, &labels) }
    }

    /// Load the artifact at `path`, or retrain with the default config and
    /// rewrite it. Missing, corrupt, or stale artifacts are recovered by
    /// retraining; a failed rewrite keeps the in-memory model. Never fails.
    pub fn load_or_train(path: &Path) -> Self {
        match Self::load(path) {
            Ok(classifier) => {
                info!(path = %path.display(), "loaded risk classifier artifact");
                return classifier;
            }
            Err(err) => {
                if path.exists() {
                    warn!(path = %path.display(), %err, "unusable classifier artifact, retraining");
                }
            }
        }

        let classifier = Self::train(ForestConfig::default());
        if let Err(err) = classifier.save(path) {
            warn!(path = %path.display(), %err, "failed to persist classifier artifact");
        }
        classifier
    }

    fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path)?;
        let artifact: ClassifierArtifact = serde_json::from_slice(&bytes)?;
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            anyhow::bail!(
                "artifact format v{} (expected v{ARTIFACT_FORMAT_VERSION})",
                artifact.format_version
            );
        }
        Ok(Self { forest: artifact.forest })
    }

    /// Serialize the fitted parameters to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let artifact = ClassifierArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            forest: self.forest.clone(),
        };
        fs::write(path, serde_json::to_vec(&artifact)?)?;
        Ok(())
    }

    /// Predict the risk class for four indicators. Full precision; the report
    /// layer rounds. First maximum wins on probability ties.
    pub fn predict(
        &self,
        vegetation_index: f64,
        land_use: LandUse,
        temperature: f64,
        water_index: f64,
    ) -> ClassifierPrediction {
        let features: [f64; N_FEATURES] = [
            vegetation_index,
            land_use.code() as f64,
            temperature,
            water_index,
        ];
        let probabilities = self.forest.predict_proba(&features);

        let mut best = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            if p > probabilities[best] {
                best = i;
            }
        }

        ClassifierPrediction {
            predicted_class: RiskClass::from_index(best),
            confidence: probabilities[best],
            probabilities,
        }
    }

    pub fn config(&self) -> ForestConfig {
        self.forest.config
    }
}

/// Process-wide classifier, initialized once on first access. The artifact
/// path comes from `ECORISK_CLASSIFIER` or falls back to the default.
pub fn shared() -> &'static RiskClassifier {
    static SHARED: OnceLock<RiskClassifier> = OnceLock::new();
    SHARED.get_or_init(|| {
        let path = std::env::var_os("ECORISK_CLASSIFIER")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_PATH));
        RiskClassifier::load_or_train(&path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Small forest keeps the test suite fast; geometry does not change the
    /// contract under test.
    fn small_classifier() -> RiskClassifier {
        RiskClassifier::train(ForestConfig { n_trees: 15, max_depth: 8, seed: 42 })
    }

    #[test]
    fn probabilities_sum_to_one_and_confidence_matches() {
        let classifier = small_classifier();
        let cases = [
            (0.2, LandUse::Urban, 35.0, 0.1),
            (0.7, LandUse::Forest, 25.0, 0.5),
            (0.45, LandUse::Agriculture, 31.0, 0.3),
            (0.05, LandUse::Water, 22.0, 0.9),
        ];
        for (v, lu, t, w) in cases {
            let p = classifier.predict(v, lu, t, w);
            let sum: f64 = p.probabilities.iter().sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-6);
            assert_eq!(p.confidence, p.probability(p.predicted_class));
            assert!(p.probabilities.iter().all(|&x| x >= 0.0));
        }
    }

    #[test]
    fn stressed_urban_cell_outranks_healthy_forest() {
        let classifier = small_classifier();
        let stressed = classifier.predict(0.15, LandUse::Urban, 36.0, 0.05);
        let healthy = classifier.predict(0.8, LandUse::Forest, 24.0, 0.6);
        assert_eq!(stressed.predicted_class, RiskClass::High);
        assert_eq!(healthy.predicted_class, RiskClass::Low);
    }

    #[test]
    fn artifact_round_trip_preserves_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risk_classifier.json");

        let trained = small_classifier();
        trained.save(&path).unwrap();
        let reloaded = RiskClassifier::load_or_train(&path);

        let cases = [
            (0.2, LandUse::Urban, 35.0, 0.1),
            (0.6, LandUse::Forest, 25.0, 0.5),
            (0.35, LandUse::Agriculture, 33.5, 0.15),
        ];
        for (v, lu, t, w) in cases {
            let a = trained.predict(v, lu, t, w);
            let b = reloaded.predict(v, lu, t, w);
            assert_eq!(a.probabilities, b.probabilities, "round-trip drift at {v}/{t}/{w}");
        }
    }

    #[test]
    fn corrupt_artifact_falls_back_to_retraining() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risk_classifier.json");
        std::fs::write(&path, b"{ not json").unwrap();

        // Recovery retrains with the default 100-tree config and must not fail.
        let classifier = RiskClassifier::load_or_train(&path);
        let p = classifier.predict(0.5, LandUse::Forest, 25.0, 0.5);
        let sum: f64 = p.probabilities.iter().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-6);

        // The bad artifact was replaced with a loadable one.
        let reloaded = RiskClassifier::load_or_train(&path);
        assert_eq!(classifier, reloaded);
    }

    #[test]
    fn stale_format_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risk_classifier.json");

        let trained = RiskClassifier::train(ForestConfig { n_trees: 3, max_depth: 3, seed: 1 });
        let artifact = ClassifierArtifact {
            format_version: 99,
            forest: trained.forest.clone(),
        };
        std::fs::write(&path, serde_json::to_vec(&artifact).unwrap()).unwrap();

        assert!(RiskClassifier::load(&path).is_err());
    }

    #[test]
    fn rounded_report_uses_published_labels() {
        let p = ClassifierPrediction {
            predicted_class: RiskClass::Medium,
            confidence: 0.456,
            probabilities: [0.333, 0.456, 0.211],
        };
        let report = p.rounded();
        assert_eq!(report.prediction, "Medium Risk");
        assert_eq!(report.confidence, 0.46);
        assert_eq!(report.probabilities.low, 0.33);
        assert_eq!(report.probabilities.medium, 0.46);
        assert_eq!(report.probabilities.high, 0.21);
    }

    #[test]
    fn class_labels_and_indices_agree() {
        for i in 0..3 {
            assert_eq!(RiskClass::from_index(i).index(), i);
        }
        assert_eq!(RiskClass::Low.label(), "Low Risk");
        assert_eq!(RiskClass::High.label(), "High Risk");
    }
}
