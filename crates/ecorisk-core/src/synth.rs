//! Indicator synthesizer: seeded per-cell environmental indicator draws.
//!
//! Stands in for a real satellite ingestion pipeline (Sentinel Hub / Earth
//! Engine). Each land-use class carries its own conditional uniform ranges
//! encoding prior ecological knowledge: forests are green, moist and heavy
//! with biomass; urban cells are hot (heat island) and sparse; water cells
//! are wet and near-zero everything else.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{EcoriskError, EcoriskResult};
use crate::grid::{round_dp, GridCell, LandUse, RegionBounds};

/// Baseline land surface temperature, °C.
const BASE_TEMP: f64 = 25.0;

/// Categorical land-use weights: forest, urban, water, agriculture.
const LAND_USE_CHOICES: [LandUse; 4] =
    [LandUse::Forest, LandUse::Urban, LandUse::Water, LandUse::Agriculture];
const LAND_USE_WEIGHTS: [f64; 4] = [0.4, 0.2, 0.1, 0.3];

// ── Per-class conditional ranges ─────────────────────────────────────────────

fn vegetation_range(lu: LandUse) -> (f64, f64) {
    match lu {
        LandUse::Forest      => (0.6, 0.9),
        LandUse::Agriculture => (0.4, 0.7),
        LandUse::Urban       => (0.1, 0.3),
        LandUse::Water       => (0.0, 0.1),
    }
}

/// Offset from `BASE_TEMP`. Urban gets the heat-island surplus.
fn temperature_offset_range(lu: LandUse) -> (f64, f64) {
    match lu {
        LandUse::Urban  => (5.0, 10.0),
        LandUse::Forest => (-2.0, 2.0),
        _               => (0.0, 5.0),
    }
}

fn water_range(lu: LandUse) -> (f64, f64) {
    match lu {
        LandUse::Water  => (0.8, 1.0),
        LandUse::Forest => (0.1, 0.3),
        _               => (0.0, 0.1),
    }
}

/// Biomass scales with vegetation index; the multiplier carries the class.
fn biomass_multiplier(lu: LandUse) -> f64 {
    match lu {
        LandUse::Forest      => 450.0,
        LandUse::Agriculture => 200.0,
        LandUse::Urban       =>  50.0,
        LandUse::Water       =>  10.0,
    }
}

fn biomass_jitter_range(lu: LandUse) -> (f64, f64) {
    match lu {
        LandUse::Forest      => (-10.0, 10.0),
        LandUse::Agriculture => (-5.0, 5.0),
        LandUse::Urban       => (0.0, 5.0),
        LandUse::Water       => (0.0, 2.0),
    }
}

fn coverage_range(lu: LandUse) -> (f64, f64) {
    match lu {
        LandUse::Forest      => (75.0, 98.0),
        LandUse::Agriculture => (20.0, 45.0),
        LandUse::Urban       => (5.0, 15.0),
        LandUse::Water       => (0.0, 5.0),
    }
}

// ── Generation ───────────────────────────────────────────────────────────────

/// Partition the bounding box into a `grid_size × grid_size` grid of
/// equal-degree cells (row-major, lat index outer) and synthesize indicators
/// for each.
///
/// Deterministic: the RNG is seeded from the region bounds, so identical
/// arguments replay identical cells. The per-cell draw order (land use,
/// vegetation, temperature, water, biomass jitter, coverage) is fixed for
/// the same reason.
pub fn generate(bounds: &RegionBounds, grid_size: usize) -> EcoriskResult<Vec<GridCell>> {
    if grid_size == 0 {
        return Err(EcoriskError::InvalidGridSize);
    }
    bounds.validate()?;

    let mut rng = StdRng::seed_from_u64(bounds.seed());
    let land_use_dist = WeightedIndex::new(LAND_USE_WEIGHTS)
        .expect("land-use weights are a fixed positive table");

    let lat_step = (bounds.max_lat - bounds.min_lat) / grid_size as f64;
    let lng_step = (bounds.max_lng - bounds.min_lng) / grid_size as f64;

    let mut cells = Vec::with_capacity(grid_size * grid_size);
    for i in 0..grid_size {
        for j in 0..grid_size {
            let lat = bounds.min_lat + (i as f64 + 0.5) * lat_step;
            let lng = bounds.min_lng + (j as f64 + 0.5) * lng_step;
            cells.push(synthesize_cell(&mut rng, &land_use_dist, i, j, lat, lng));
        }
    }
    Ok(cells)
}

fn synthesize_cell(
    rng: &mut StdRng,
    land_use_dist: &WeightedIndex<f64>,
    row: usize,
    col: usize,
    lat: f64,
    lng: f64,
) -> GridCell {
    let land_use = LAND_USE_CHOICES[land_use_dist.sample(rng)];

    let (v_lo, v_hi) = vegetation_range(land_use);
    let vegetation_index = rng.gen_range(v_lo..v_hi);

    let (t_lo, t_hi) = temperature_offset_range(land_use);
    let temperature = BASE_TEMP + rng.gen_range(t_lo..t_hi);

    let (w_lo, w_hi) = water_range(land_use);
    let water_index = rng.gen_range(w_lo..w_hi);

    let (b_lo, b_hi) = biomass_jitter_range(land_use);
    let biomass = vegetation_index * biomass_multiplier(land_use) + rng.gen_range(b_lo..b_hi);

    let (c_lo, c_hi) = coverage_range(land_use);
    let coverage = rng.gen_range(c_lo..c_hi);

    GridCell {
        grid_id: format!("{row}_{col}"),
        lat: round_dp(lat, 5),
        lng: round_dp(lng, 5),
        vegetation_index: round_dp(vegetation_index, 3),
        land_use,
        temperature: round_dp(temperature, 1),
        water_index: round_dp(water_index, 2),
        biomass: round_dp(biomass.max(0.0), 1),
        coverage: round_dp(coverage.max(0.0), 1),
    }
}
