//! Biodiversity risk evaluation pipeline.
//!
//! Indicator synthesis → rule-based scoring → species-impact and intervention
//! mapping → learned-classifier cross-check. All stages are pure computations
//! over in-memory values; the only I/O is the classifier's one-time artifact
//! load/save.

pub mod classify;
pub mod error;
pub mod grid;
pub mod impact;
pub mod pipeline;
pub mod scenario;
pub mod score;
pub mod synth;

pub use classify::{ClassifierPrediction, RiskClass, RiskClassifier};
pub use error::{EcoriskError, EcoriskResult};
pub use grid::{GridCell, LandUse, RegionBounds};
pub use impact::{interventions, species_impacts, SpeciesImpact};
pub use pipeline::{analyze_cell, analyze_point, analyze_region, CellReport, RegionReport};
pub use scenario::Scenario;
pub use score::{evaluate, evaluate_cell, RiskAssessment, RiskFactor, RiskLevel};
