//! Spatial data model: land-use classes, grid cells, region bounds.
//! Coordinate math uses f64 throughout.

use serde::{Deserialize, Serialize};

use crate::error::{EcoriskError, EcoriskResult};

/// Half-width in degrees of the default bounding box around a single point.
pub const POINT_BOX_HALF_DEG: f64 = 0.025;

/// Ground-cover category assigned to a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandUse {
    Forest,
    Agriculture,
    Urban,
    Water,
}

impl LandUse {
    /// Integer class code used as a classifier feature.
    pub fn code(self) -> usize {
        match self {
            LandUse::Forest      => 0,
            LandUse::Agriculture => 1,
            LandUse::Urban       => 2,
            LandUse::Water       => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LandUse::Forest      => "forest",
            LandUse::Agriculture => "agriculture",
            LandUse::Urban       => "urban",
            LandUse::Water       => "water",
        }
    }

    /// Parse a free-text label, case-insensitively. Unrecognized strings fall
    /// back to `Forest` (code 0) rather than failing the request.
    pub fn from_label_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "agriculture" => LandUse::Agriculture,
            "urban"       => LandUse::Urban,
            "water"       => LandUse::Water,
            _             => LandUse::Forest,
        }
    }
}

/// One spatial unit of analysis: environmental indicators for a grid cell.
///
/// Request-scoped value object. Immutable once handed to the scorer, except
/// for explicit what-if perturbation applied before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// "row_col" within the generating grid.
    pub grid_id: String,
    /// Cell-centre latitude, 5-decimal precision.
    pub lat: f64,
    /// Cell-centre longitude, 5-decimal precision.
    pub lng: f64,
    /// NDVI-style vegetation health proxy, nominally 0-1.
    pub vegetation_index: f64,
    pub land_use: LandUse,
    /// Land surface temperature, °C.
    pub temperature: f64,
    /// Surface water presence proxy, nominally 0-1.
    pub water_index: f64,
    /// Metric tons per hectare, floored at 0.
    pub biomass: f64,
    /// Canopy/ground coverage percentage, floored at 0.
    pub coverage: f64,
}

/// Geographic bounding box for a region analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl RegionBounds {
    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self { min_lat, min_lng, max_lat, max_lng }
    }

    /// Default box around a single point: ±0.025° on both axes.
    pub fn around(lat: f64, lng: f64) -> Self {
        Self {
            min_lat: lat - POINT_BOX_HALF_DEG,
            min_lng: lng - POINT_BOX_HALF_DEG,
            max_lat: lat + POINT_BOX_HALF_DEG,
            max_lng: lng + POINT_BOX_HALF_DEG,
        }
    }

    /// Reject boxes with `max ≤ min` on either axis.
    pub fn validate(&self) -> EcoriskResult<()> {
        if self.max_lat <= self.min_lat || self.max_lng <= self.min_lng {
            return Err(EcoriskError::DegenerateBounds {
                min_lat: self.min_lat,
                min_lng: self.min_lng,
                max_lat: self.max_lat,
                max_lng: self.max_lng,
            });
        }
        Ok(())
    }

    /// Location-derived seed: trunc((min_lat + min_lng) × 10⁶). Repeated
    /// requests for the same region replay identical indicator draws.
    pub fn seed(&self) -> u64 {
        ((self.min_lat + self.min_lng) * 1_000_000.0).trunc() as i64 as u64
    }
}

/// Round to `dp` decimal places (indicator fields carry fixed precision).
pub(crate) fn round_dp(v: f64, dp: i32) -> f64 {
    let scale = 10f64.powi(dp);
    (v * scale).round() / scale
}
