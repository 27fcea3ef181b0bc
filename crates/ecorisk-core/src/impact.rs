//! Species-impact and intervention mapping over triggered risk factors.
//!
//! Both tables switch on `RiskFactor` codes. Several factors can map to the
//! same group or action (both vegetation tiers, both heat tiers), so results
//! are deduplicated: impacts by group (first occurrence wins), interventions
//! by exact string.

use serde::Serialize;

use crate::score::RiskFactor;

/// Default recommendation when no risk factor fired.
pub const DEFAULT_INTERVENTION: &str =
    "Preventative monitoring and maintenance of ecosystem health.";

/// One affected species-group record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeciesImpact {
    pub group: &'static str,
    pub impact: &'static str,
}

fn impact_for(factor: RiskFactor) -> SpeciesImpact {
    match factor {
        RiskFactor::CriticalVegetationLoss | RiskFactor::MinorVegetationStress => SpeciesImpact {
            group: "Mammals & Insects",
            impact: "Loss of canopy cover and primary foraging sites.",
        },
        RiskFactor::UrbanExpansion => SpeciesImpact {
            group: "Terrestrial Fauna",
            impact: "Habitat fragmentation and increased human-wildlife conflict.",
        },
        RiskFactor::HighThermalStress | RiskFactor::ModerateHeatStress => SpeciesImpact {
            group: "Pollinators",
            impact: "Heat stress and disruption of plant-pollinator phenology.",
        },
        RiskFactor::HydrologicalStress => SpeciesImpact {
            group: "Birds & Amphibians",
            impact: "Loss of seasonal wetlands and hydration sources.",
        },
    }
}

fn intervention_for(factor: RiskFactor) -> &'static str {
    match factor {
        RiskFactor::CriticalVegetationLoss | RiskFactor::MinorVegetationStress => {
            "Reforestation with native species to restore canopy."
        }
        RiskFactor::UrbanExpansion => {
            "Strict enforcement of buffer zones around protected habitats."
        }
        RiskFactor::HighThermalStress | RiskFactor::ModerateHeatStress => {
            "Implementation of heat-tolerant vegetation corridors."
        }
        RiskFactor::HydrologicalStress => {
            "Restoration of riparian zones and natural drainage systems."
        }
    }
}

/// Map triggered factors to affected species groups, at most one record per
/// group, in factor order. Empty input → empty output.
pub fn species_impacts(factors: &[RiskFactor]) -> Vec<SpeciesImpact> {
    let mut impacts: Vec<SpeciesImpact> = Vec::new();
    for &factor in factors {
        let candidate = impact_for(factor);
        if !impacts.iter().any(|i| i.group == candidate.group) {
            impacts.push(candidate);
        }
    }
    impacts
}

/// Map triggered factors to recommended interventions, deduplicated by exact
/// string. No factor fired → the single default monitoring entry.
pub fn interventions(factors: &[RiskFactor]) -> Vec<&'static str> {
    let mut actions: Vec<&'static str> = Vec::new();
    for &factor in factors {
        let action = intervention_for(factor);
        if !actions.contains(&action) {
            actions.push(action);
        }
    }
    if actions.is_empty() {
        actions.push(DEFAULT_INTERVENTION);
    }
    actions
}
