use nalgebra::Vector3;

use crate::utils::config::SolverConfig;
use crate::validation::error::{PositioningError, Result};

/// Checks observation sets before any system is assembled
#[derive(Debug, Clone, Default)]
pub struct DataValidator {
    config: SolverConfig,
}

impl DataValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Validate a station set against a per-station measurement count
    pub fn validate_stations(
        &self,
        stations: &[Vector3<f64>],
        measurements: usize,
        measurement_name: &str,
    ) -> Result<()> {
        if stations.len() != measurements {
            return Err(PositioningError::DimensionMismatch {
                quantity: measurement_name.to_string(),
                expected: stations.len(),
                found: measurements,
            });
        }

        if stations.is_empty() {
            return Err(PositioningError::InsufficientObservations {
                available: 0,
                required: 1,
            });
        }

        if self.config.reject_non_finite {
            check_finite(stations, "stations")?;
        }

        Ok(())
    }

    /// Validate bearing directions: finiteness and, when enabled, unit norm
    pub fn validate_bearings(&self, bearings: &[Vector3<f64>]) -> Result<()> {
        if self.config.reject_non_finite {
            check_finite(bearings, "bearings")?;
        }

        if self.config.validate_bearing_norm {
            let tolerance = self.config.bearing_norm_tolerance;
            for (index, bearing) in bearings.iter().enumerate() {
                let norm = bearing.norm();
                if (norm - 1.0).abs() > tolerance {
                    return Err(PositioningError::NonUnitBearing {
                        index,
                        norm,
                        tolerance,
                    });
                }
            }
        }

        Ok(())
    }

    /// Ranges must be finite and non-negative
    pub fn validate_ranges(&self, ranges: &[f64]) -> Result<()> {
        for (index, &value) in ranges.iter().enumerate() {
            if value.is_nan() || (self.config.reject_non_finite && !value.is_finite()) {
                return Err(PositioningError::InvalidMeasurement {
                    index,
                    value,
                    reason: "range is not a finite number".to_string(),
                });
            }
            if value < 0.0 {
                return Err(PositioningError::InvalidMeasurement {
                    index,
                    value,
                    reason: "range must be non-negative".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_finite(vectors: &[Vector3<f64>], quantity: &str) -> Result<()> {
    match vectors.iter().position(|v| v.iter().any(|c| !c.is_finite())) {
        Some(index) => Err(PositioningError::NonFiniteInput {
            quantity: quantity.to_string(),
            index,
        }),
        None => Ok(()),
    }
}
