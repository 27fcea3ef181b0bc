//! Report assembly: runs every pipeline stage for each cell and shapes the
//! serialized response.
//!
//! Cells are independent, so region evaluation fans out with rayon when the
//! `threading` feature is enabled; output order stays row-major either way.
//! The centre cell of the row-major sequence is the representative summary.

#[cfg(feature = "threading")]
use rayon::prelude::*;
use serde::Serialize;

use crate::classify::{PredictionReport, RiskClassifier};
use crate::error::EcoriskResult;
use crate::grid::{GridCell, RegionBounds};
use crate::impact::{self, SpeciesImpact};
use crate::scenario::Scenario;
use crate::score::{self, RiskLevel};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Serialized rule-engine section of a cell report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleReport {
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub color: &'static str,
    pub reasons: Vec<&'static str>,
}

/// Full evaluation of one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellReport {
    pub grid_id: String,
    pub location: Location,
    pub indicators: GridCell,
    pub rules: RuleReport,
    pub ml: PredictionReport,
    pub impacts: Vec<SpeciesImpact>,
    pub interventions: Vec<&'static str>,
}

/// Region response: the centre cell's report flattened as the summary, plus
/// the full grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    #[serde(flatten)]
    pub summary: CellReport,
    pub grid: Vec<CellReport>,
}

/// Run scorer, impact mapper, and classifier over one (already perturbed) cell.
pub fn analyze_cell(cell: &GridCell, classifier: &RiskClassifier) -> CellReport {
    let assessment = score::evaluate_cell(cell);
    let prediction = classifier.predict(
        cell.vegetation_index,
        cell.land_use,
        cell.temperature,
        cell.water_index,
    );

    CellReport {
        grid_id: cell.grid_id.clone(),
        location: Location { lat: cell.lat, lng: cell.lng },
        rules: RuleReport {
            risk_score: assessment.risk_score,
            risk_level: assessment.risk_level,
            color: assessment.color(),
            reasons: assessment.reasons(),
        },
        ml: prediction.rounded(),
        impacts: impact::species_impacts(&assessment.factors),
        interventions: impact::interventions(&assessment.factors),
        indicators: cell.clone(),
    }
}

/// Synthesize, perturb, and evaluate a region.
pub fn analyze_region(
    bounds: &RegionBounds,
    grid_size: usize,
    scenario: &Scenario,
    classifier: &RiskClassifier,
) -> EcoriskResult<RegionReport> {
    let mut cells = crate::synth::generate(bounds, grid_size)?;
    scenario.apply(&mut cells, bounds.seed());

    #[cfg(feature = "threading")]
    let reports: Vec<CellReport> =
        cells.par_iter().map(|cell| analyze_cell(cell, classifier)).collect();
    #[cfg(not(feature = "threading"))]
    let reports: Vec<CellReport> =
        cells.iter().map(|cell| analyze_cell(cell, classifier)).collect();

    let summary = reports[reports.len() / 2].clone();
    Ok(RegionReport { summary, grid: reports })
}

/// Single-point analysis over the default box around (lat, lng).
pub fn analyze_point(
    lat: f64,
    lng: f64,
    grid_size: usize,
    scenario: &Scenario,
    classifier: &RiskClassifier,
) -> EcoriskResult<RegionReport> {
    analyze_region(&RegionBounds::around(lat, lng), grid_size, scenario, classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::forest::ForestConfig;
    use crate::error::EcoriskError;
    use crate::grid::LandUse;
    use crate::impact::DEFAULT_INTERVENTION;

    fn classifier() -> RiskClassifier {
        RiskClassifier::train(ForestConfig { n_trees: 10, max_depth: 8, seed: 42 })
    }

    fn stressed_cell() -> GridCell {
        GridCell {
            grid_id: "0_0".into(),
            lat: 1.0,
            lng: 2.0,
            vegetation_index: 0.2,
            land_use: LandUse::Urban,
            temperature: 35.0,
            water_index: 0.1,
            biomass: 8.0,
            coverage: 10.0,
        }
    }

    #[test]
    fn cell_report_assembles_all_sections() {
        let report = analyze_cell(&stressed_cell(), &classifier());

        assert_eq!(report.grid_id, "0_0");
        assert_eq!(report.rules.risk_score, 10);
        assert_eq!(report.rules.risk_level, RiskLevel::High);
        assert_eq!(report.rules.color, "red");
        assert_eq!(report.rules.reasons.len(), 4);
        assert_eq!(report.impacts.len(), 4);
        assert_eq!(report.interventions.len(), 4);
        assert_eq!(report.ml.prediction, "High Risk");
        assert_eq!(report.indicators.land_use, LandUse::Urban);
    }

    #[test]
    fn quiet_cell_gets_default_intervention_only() {
        let cell = GridCell {
            vegetation_index: 0.7,
            land_use: LandUse::Forest,
            temperature: 25.0,
            water_index: 0.5,
            ..stressed_cell()
        };
        let report = analyze_cell(&cell, &classifier());

        assert_eq!(report.rules.risk_score, 0);
        assert!(report.rules.reasons.is_empty());
        assert!(report.impacts.is_empty());
        assert_eq!(report.interventions, vec![DEFAULT_INTERVENTION]);
    }

    #[test]
    fn region_report_centres_on_the_middle_cell() {
        let bounds = RegionBounds::new(10.0, 10.0, 11.0, 11.0);
        let report =
            analyze_region(&bounds, 3, &Scenario::default(), &classifier()).unwrap();

        assert_eq!(report.grid.len(), 9);
        // Row-major index 4 of a 3×3 grid is cell "1_1".
        assert_eq!(report.summary.grid_id, "1_1");
        assert_eq!(report.summary, report.grid[4]);
    }

    #[test]
    fn region_report_is_reproducible() {
        let bounds = RegionBounds::new(-5.0, 120.0, -4.0, 121.0);
        let scenario = Scenario { temp_increase: 1.5, urban_growth_pct: 20.0 };
        let cls = classifier();
        let a = analyze_region(&bounds, 4, &scenario, &cls).unwrap();
        let b = analyze_region(&bounds, 4, &scenario, &cls).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_requests_surface_errors() {
        let cls = classifier();
        assert!(matches!(
            analyze_region(&RegionBounds::new(0.0, 0.0, 1.0, 1.0), 0, &Scenario::default(), &cls),
            Err(EcoriskError::InvalidGridSize)
        ));
        assert!(matches!(
            analyze_region(&RegionBounds::new(1.0, 0.0, 0.0, 1.0), 3, &Scenario::default(), &cls),
            Err(EcoriskError::DegenerateBounds { .. })
        ));
    }

    #[test]
    fn point_analysis_uses_the_default_box() {
        let report = analyze_point(7.5, 30.5, 5, &Scenario::default(), &classifier()).unwrap();
        assert_eq!(report.grid.len(), 25);
        for cell in &report.grid {
            assert!(cell.location.lat > 7.5 - 0.025 && cell.location.lat < 7.5 + 0.025);
            assert!(cell.location.lng > 30.5 - 0.025 && cell.location.lng < 30.5 + 0.025);
        }
    }

    #[test]
    fn report_serializes_with_flattened_summary() {
        let bounds = RegionBounds::new(10.0, 10.0, 11.0, 11.0);
        let report =
            analyze_region(&bounds, 3, &Scenario::default(), &classifier()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["grid_id"], report.summary.grid_id.as_str());
        assert_eq!(json["grid"].as_array().unwrap().len(), 9);
        assert!(json["rules"]["risk_score"].is_u64());
        assert!(json["ml"]["probabilities"]["Low Risk"].is_f64());
        assert!(json["indicators"]["land_use"].is_string());
    }
}
