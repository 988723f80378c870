use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::config::ConfigError;

/// Error classification for system assembly and position solving
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PositioningError {
    /// Observation counts differ, or a matrix does not carry 3D columns
    #[error("dimension mismatch for {quantity}: expected {expected}, found {found}")]
    DimensionMismatch {
        quantity: String,
        expected: usize,
        found: usize,
    },

    #[error("insufficient observations: {available} available, {required} required")]
    InsufficientObservations { available: usize, required: usize },

    /// A range that cannot describe a distance
    #[error("invalid measurement #{index} ({value}): {reason}")]
    InvalidMeasurement {
        index: usize,
        value: f64,
        reason: String,
    },

    #[error("bearing #{index} is not a unit vector: norm {norm} (tolerance {tolerance})")]
    NonUnitBearing {
        index: usize,
        norm: f64,
        tolerance: f64,
    },

    #[error("non-finite value in {quantity} #{index}")]
    NonFiniteInput { quantity: String, index: usize },

    /// Solver settings outside their valid range
    #[error("invalid solver configuration: {0}")]
    InvalidConfiguration(String),

    /// Raised at solve time when the system matrix lacks full rank
    #[error("degenerate geometry: rank {rank} of {expected} (condition number {condition_number:.3e})")]
    DegenerateGeometry {
        rank: usize,
        expected: usize,
        condition_number: f64,
    },
}

impl PositioningError {
    /// Short type name, handy for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            PositioningError::DimensionMismatch { .. } => "DimensionMismatch",
            PositioningError::InsufficientObservations { .. } => "InsufficientObservations",
            PositioningError::InvalidMeasurement { .. } => "InvalidMeasurement",
            PositioningError::NonUnitBearing { .. } => "NonUnitBearing",
            PositioningError::NonFiniteInput { .. } => "NonFiniteInput",
            PositioningError::InvalidConfiguration(_) => "InvalidConfiguration",
            PositioningError::DegenerateGeometry { .. } => "DegenerateGeometry",
        }
    }

    /// Whether the error originates from the observation geometry rather than malformed input
    pub fn is_geometric(&self) -> bool {
        matches!(self, PositioningError::DegenerateGeometry { .. })
    }
}

impl From<ConfigError> for PositioningError {
    fn from(err: ConfigError) -> Self {
        PositioningError::InvalidConfiguration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PositioningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PositioningError::DimensionMismatch {
            quantity: "bearings".to_string(),
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch for bearings: expected 3, found 2"
        );
        assert_eq!(err.kind(), "DimensionMismatch");
        assert!(!err.is_geometric());
    }

    #[test]
    fn test_error_json_roundtrip() {
        let err = PositioningError::DegenerateGeometry {
            rank: 2,
            expected: 3,
            condition_number: f64::MAX,
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: PositioningError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
        assert!(back.is_geometric());
    }

    #[test]
    fn test_config_error_conversion() {
        let err: PositioningError = ConfigError::InvalidParameter {
            parameter: "rank_tolerance".to_string(),
            value: "-1".to_string(),
            reason: "must lie strictly between 0 and 1".to_string(),
        }
        .into();
        assert_eq!(err.kind(), "InvalidConfiguration");
        assert!(err.to_string().contains("rank_tolerance"));
    }
}
