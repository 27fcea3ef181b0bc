//! What-if scenario perturbation, applied to synthesized cells before scoring.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::grid::{GridCell, LandUse};

/// Stream constant separating scenario draws from indicator synthesis.
const SCENARIO_STREAM: u64 = 0x7C3A_51E8_D402_9BF6;

/// What-if knobs for a region analysis. The default scenario is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Added to every cell's temperature, °C.
    pub temp_increase: f64,
    /// 0-100: each non-urban cell converts to urban with probability pct/100.
    pub urban_growth_pct: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self { temp_increase: 0.0, urban_growth_pct: 0.0 }
    }
}

impl Scenario {
    pub fn is_noop(&self) -> bool {
        self.temp_increase == 0.0 && self.urban_growth_pct == 0.0
    }

    /// Perturb cells in place. Conversion draws come from an explicit RNG
    /// seeded from the region seed, so a given scenario over a given region
    /// replays identically regardless of concurrent requests.
    ///
    /// A converted cell loses most vegetation and surface water and picks up
    /// the heat-island offset; biomass and coverage are left as observed.
    pub fn apply(&self, cells: &mut [GridCell], region_seed: u64) {
        if self.is_noop() {
            return;
        }

        let mut rng = StdRng::seed_from_u64(region_seed ^ SCENARIO_STREAM);
        let conversion_p = self.urban_growth_pct / 100.0;

        for cell in cells.iter_mut() {
            cell.temperature += self.temp_increase;
            if cell.land_use != LandUse::Urban && rng.gen::<f64>() < conversion_p {
                cell.land_use = LandUse::Urban;
                cell.vegetation_index *= 0.4;
                cell.water_index *= 0.5;
                cell.temperature += 3.0;
            }
        }
    }
}
