//! Error types surfaced to callers of the analysis pipeline.
//!
//! Only malformed requests are errors. Classifier-artifact problems are
//! recovered internally by retraining, and unrecognized land-use labels fall
//! back to the forest code, so neither appears here.

use thiserror::Error;

/// Errors raised for malformed analysis requests.
#[derive(Debug, Error)]
pub enum EcoriskError {
    /// Requested grid resolution of zero cells per side.
    #[error("grid size must be at least 1")]
    InvalidGridSize,

    /// Bounding box with `max ≤ min` on at least one axis.
    #[error(
        "degenerate bounding box: lat {min_lat}..{max_lat}, lng {min_lng}..{max_lng}"
    )]
    DegenerateBounds {
        min_lat: f64,
        min_lng: f64,
        max_lat: f64,
        max_lng: f64,
    },
}

/// Result type for fallible pipeline operations.
pub type EcoriskResult<T> = Result<T, EcoriskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            EcoriskError::InvalidGridSize.to_string(),
            "grid size must be at least 1"
        );

        let err = EcoriskError::DegenerateBounds {
            min_lat: 10.0,
            min_lng: 20.0,
            max_lat: 10.0,
            max_lng: 25.0,
        };
        assert_eq!(
            err.to_string(),
            "degenerate bounding box: lat 10..10, lng 20..25"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EcoriskError>();
    }
}
