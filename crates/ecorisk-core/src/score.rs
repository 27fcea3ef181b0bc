//! Rule-based risk scorer: additive rules over four environmental indicators.
//!
//! The scorer emits structured `RiskFactor` codes rather than bare strings;
//! downstream impact/intervention mapping switches on the codes and report
//! serialization renders the display wording. Pure function, total over
//! well-typed numeric input.

use serde::{Deserialize, Serialize};

use crate::grid::{GridCell, LandUse};

/// One triggered risk rule. Variant order mirrors rule evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    /// vegetation_index < 0.3, +3.
    CriticalVegetationLoss,
    /// 0.3 ≤ vegetation_index < 0.5, +1.
    MinorVegetationStress,
    /// urban land use, +3.
    UrbanExpansion,
    /// temperature > 33 °C, +2.
    HighThermalStress,
    /// 30 < temperature ≤ 33 °C, +1.
    ModerateHeatStress,
    /// water_index < 0.2, +2.
    HydrologicalStress,
}

impl RiskFactor {
    pub fn points(self) -> u32 {
        match self {
            RiskFactor::CriticalVegetationLoss => 3,
            RiskFactor::MinorVegetationStress  => 1,
            RiskFactor::UrbanExpansion         => 3,
            RiskFactor::HighThermalStress      => 2,
            RiskFactor::ModerateHeatStress     => 1,
            RiskFactor::HydrologicalStress     => 2,
        }
    }

    /// Human-readable reason shown in reports.
    pub fn description(self) -> &'static str {
        match self {
            RiskFactor::CriticalVegetationLoss => "critical vegetation degradation",
            RiskFactor::MinorVegetationStress  => "minor vegetation stress",
            RiskFactor::UrbanExpansion         => "urban expansion / habitat loss",
            RiskFactor::HighThermalStress      => "high thermal stress",
            RiskFactor::ModerateHeatStress     => "moderate heat stress",
            RiskFactor::HydrologicalStress     => "hydrological stress / water loss",
        }
    }
}

/// Categorical risk level derived from the score by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Thresholds: ≥8 High, ≥4 Medium, else Low.
    pub fn from_score(score: u32) -> Self {
        if score >= 8 {
            RiskLevel::High
        } else if score >= 4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Display tag, 1:1 with the level. Not scoring logic.
    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::High   => "red",
            RiskLevel::Medium => "orange",
            RiskLevel::Low    => "green",
        }
    }
}

/// Scorer output for one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    /// Triggered rules, in rule evaluation order. May be empty.
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    pub fn color(&self) -> &'static str {
        self.risk_level.color()
    }

    /// Display reasons, one per triggered factor, in factor order.
    pub fn reasons(&self) -> Vec<&'static str> {
        self.factors.iter().map(|f| f.description()).collect()
    }
}

/// Score four indicators against the fixed additive rule set.
///
/// Rules fire in a fixed order (vegetation, land use, temperature, water) and
/// that order is the factor order. Total score lies in [0, 10]. Input ranges
/// are not validated; the synthesizer bounds them in normal operation.
pub fn evaluate(
    vegetation_index: f64,
    land_use: LandUse,
    temperature: f64,
    water_index: f64,
) -> RiskAssessment {
    let mut factors = Vec::new();

    if vegetation_index < 0.3 {
        factors.push(RiskFactor::CriticalVegetationLoss);
    } else if vegetation_index < 0.5 {
        factors.push(RiskFactor::MinorVegetationStress);
    }

    if land_use == LandUse::Urban {
        factors.push(RiskFactor::UrbanExpansion);
    }

    if temperature > 33.0 {
        factors.push(RiskFactor::HighThermalStress);
    } else if temperature > 30.0 {
        factors.push(RiskFactor::ModerateHeatStress);
    }

    if water_index < 0.2 {
        factors.push(RiskFactor::HydrologicalStress);
    }

    let risk_score: u32 = factors.iter().map(|f| f.points()).sum();
    RiskAssessment {
        risk_score,
        risk_level: RiskLevel::from_score(risk_score),
        factors,
    }
}

/// Score a synthesized cell's indicators.
pub fn evaluate_cell(cell: &GridCell) -> RiskAssessment {
    evaluate(cell.vegetation_index, cell.land_use, cell.temperature, cell.water_index)
}
