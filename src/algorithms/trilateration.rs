//! Position fixing from range observations
//!
//! Squaring the range equations `|x - p_i| = ρ_i` and subtracting the
//! equation of the reference (first) station from every other one removes
//! the quadratic `|x|²` term:
//!
//! ```text
//! 2 (p_i - p_0)ᵀ x = (ρ_0² - ρ_i²) - (|p_0|² - |p_i|²),   i = 1..N-1
//! ```
//!
//! Stacking these rows gives an (N-1)x3 system solved by least squares.
//! Four or more stations are needed for a unique fix.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector, Vector3};

use crate::algorithms::solver::least_squares;
use crate::core::constants::POSITION_DIMENSION;
use crate::core::types::{LinearSystem, PositionFix, TrilaterationSystem};
use crate::utils::config::SolverConfig;
use crate::validation::data::DataValidator;
use crate::validation::error::{PositioningError, Result};

/// Build the differenced squared-range system with the first station as reference.
///
/// A single station yields an empty 0x3 system; the solver reports it as rank zero.
pub fn build_trilateration_system(
    stations: &[Vector3<f64>],
    ranges: &[f64],
    config: &SolverConfig,
) -> Result<TrilaterationSystem> {
    let validator = DataValidator::with_config(config.clone());
    validator.validate_stations(stations, ranges.len(), "ranges")?;
    validator.validate_ranges(ranges)?;

    let reference = &stations[0];
    let reference_range = ranges[0];
    let rows = stations.len() - 1;

    let mut a = DMatrix::<f64>::zeros(rows, POSITION_DIMENSION);
    let mut b = DVector::<f64>::zeros(rows);

    for (row, (station, range)) in stations.iter().zip(ranges).skip(1).enumerate() {
        let baseline = 2.0 * (station - reference);
        a.row_mut(row).copy_from(&baseline.transpose());
        b[row] = (reference_range * reference_range - range * range)
            - (reference.norm_squared() - station.norm_squared());
    }

    debug!("trilateration system assembled: {}x{}", rows, POSITION_DIMENSION);

    Ok(LinearSystem::new(a, b))
}

/// Difference between the distance to each station and its measured range
pub fn range_residuals(point: &Vector3<f64>, stations: &[Vector3<f64>], ranges: &[f64]) -> Vec<f64> {
    stations
        .iter()
        .zip(ranges)
        .map(|(station, range)| (point - station).norm() - range)
        .collect()
}

/// Build and solve a trilateration problem in one call.
///
/// Fails with `DegenerateGeometry` when the stations do not determine a
/// unique point; `least_squares` on the built system still gives the
/// minimum-norm estimate in that case.
pub fn trilaterate(stations: &[Vector3<f64>], ranges: &[f64], config: &SolverConfig) -> Result<PositionFix> {
    let system = build_trilateration_system(stations, ranges, config)?;
    let solved = least_squares(&system, config)?;

    if !solved.is_full_rank() {
        let err = PositioningError::DegenerateGeometry {
            rank: solved.rank,
            expected: POSITION_DIMENSION,
            condition_number: solved.condition_number(),
        };
        warn!("trilateration with {} stations: {}", stations.len(), err);
        return Err(err);
    }

    let position = solved.position().ok_or_else(|| PositioningError::DimensionMismatch {
        quantity: "solution".to_string(),
        expected: POSITION_DIMENSION,
        found: solved.solution.len(),
    })?;

    Ok(PositionFix {
        position,
        residual: solved.residual,
        rank: solved.rank,
        condition_number: solved.condition_number(),
        observations: stations.len(),
    })
}
