//! Dense solves for assembled position systems
//!
//! Triangulation produces a square symmetric system that is solved exactly;
//! trilateration produces a rectangular one that is solved in the
//! least-squares sense through an SVD, which tolerates rank deficiency and
//! reports the rank it achieved.

use log::{debug, warn};
use nalgebra::{DVector, Vector3};
use serde::{Deserialize, Serialize};

use crate::core::constants::POSITION_DIMENSION;
use crate::core::types::{TriangulationSystem, TrilaterationSystem};
use crate::utils::config::SolverConfig;
use crate::validation::error::{PositioningError, Result};

/// Result of an exact 3x3 solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactSolution {
    pub solution: Vector3<f64>,
    pub condition_number: f64,
}

/// Result of a least-squares solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeastSquaresSolution {
    /// Minimum-norm least-squares solution
    pub solution: DVector<f64>,
    /// Squared residual norm `|A x - b|^2`
    pub residual: f64,
    pub rank: usize,
    pub singular_values: DVector<f64>,
}

impl LeastSquaresSolution {
    pub fn is_full_rank(&self) -> bool {
        self.rank == POSITION_DIMENSION
    }

    pub fn condition_number(&self) -> f64 {
        condition_number(self.singular_values.as_slice(), POSITION_DIMENSION)
    }

    /// The solution as a 3D position, `None` when the system did not have three unknowns
    pub fn position(&self) -> Option<Vector3<f64>> {
        if self.solution.len() != POSITION_DIMENSION {
            return None;
        }
        Some(Vector3::new(self.solution[0], self.solution[1], self.solution[2]))
    }
}

/// Ratio of the largest to the smallest singular value.
///
/// Infinite when fewer than `unknowns` singular values exist or the smallest is zero.
pub fn condition_number(singular_values: &[f64], unknowns: usize) -> f64 {
    if singular_values.len() < unknowns || singular_values.is_empty() {
        return f64::INFINITY;
    }
    let max = singular_values.iter().cloned().fold(0.0, f64::max);
    let min = singular_values.iter().cloned().fold(f64::INFINITY, f64::min);
    if min <= 0.0 {
        f64::INFINITY
    } else {
        max / min
    }
}

/// Reject settings and entries the SVD cannot handle.
///
/// Runs regardless of `reject_non_finite`: a NaN or infinite entry keeps the
/// SVD iteration from converging.
fn check_solvable<'a>(
    matrix: impl IntoIterator<Item = &'a f64>,
    rhs: impl IntoIterator<Item = &'a f64>,
    config: &SolverConfig,
) -> Result<()> {
    config.validate()?;

    if let Some(index) = matrix.into_iter().position(|v| !v.is_finite()) {
        return Err(PositioningError::NonFiniteInput {
            quantity: "system matrix".to_string(),
            index,
        });
    }
    if let Some(index) = rhs.into_iter().position(|v| !v.is_finite()) {
        return Err(PositioningError::NonFiniteInput {
            quantity: "right-hand side".to_string(),
            index,
        });
    }
    Ok(())
}

fn rank_threshold(singular_values: &[f64], config: &SolverConfig) -> f64 {
    let max = singular_values.iter().cloned().fold(0.0, f64::max);
    config.rank_tolerance * max
}

/// Solve a square triangulation system exactly.
///
/// A system whose numerical rank is below three is reported as
/// `DegenerateGeometry` instead of returning a spurious solution.
pub fn solve_exact(system: &TriangulationSystem, config: &SolverConfig) -> Result<ExactSolution> {
    check_solvable(system.a.iter(), system.b.iter(), config)?;

    let svd = system.a.svd(false, false);
    let singular_values = svd.singular_values.as_slice();
    let threshold = rank_threshold(singular_values, config);
    let rank = singular_values.iter().filter(|&&s| s > threshold).count();
    let cond = condition_number(singular_values, POSITION_DIMENSION);

    debug!("exact solve: rank {} condition number {:.3e}", rank, cond);

    let degenerate = PositioningError::DegenerateGeometry {
        rank,
        expected: POSITION_DIMENSION,
        condition_number: cond,
    };

    if rank < POSITION_DIMENSION {
        warn!("singular system matrix: {}", degenerate);
        return Err(degenerate);
    }

    // Symmetric positive definite in the well-posed case; LU covers round-off
    let solution = match system.a.cholesky() {
        Some(cholesky) => cholesky.solve(&system.b),
        None => system.a.lu().solve(&system.b).ok_or_else(|| degenerate.clone())?,
    };

    if solution.iter().any(|c| !c.is_finite()) {
        warn!("exact solve produced non-finite values");
        return Err(degenerate);
    }

    Ok(ExactSolution {
        solution,
        condition_number: cond,
    })
}

/// Least-squares solve of a rectangular system with rank reporting.
///
/// Singular values below `rank_tolerance * sigma_max` are treated as zero,
/// giving the minimum-norm solution for rank-deficient systems. An empty
/// system yields the zero vector with rank zero.
pub fn least_squares(
    system: &TrilaterationSystem,
    config: &SolverConfig,
) -> Result<LeastSquaresSolution> {
    let (rows, cols) = system.a.shape();
    if system.b.len() != rows {
        return Err(PositioningError::DimensionMismatch {
            quantity: "right-hand side".to_string(),
            expected: rows,
            found: system.b.len(),
        });
    }

    check_solvable(system.a.iter(), system.b.iter(), config)?;

    if rows == 0 || cols == 0 {
        debug!("least squares on empty {}x{} system", rows, cols);
        return Ok(LeastSquaresSolution {
            solution: DVector::zeros(cols),
            residual: 0.0,
            rank: 0,
            singular_values: DVector::zeros(0),
        });
    }

    let svd = system.a.clone().svd(true, true);
    let threshold = rank_threshold(svd.singular_values.as_slice(), config);
    let rank = svd.rank(threshold);

    let solution = svd
        .solve(&system.b, threshold)
        .map_err(|_| PositioningError::DegenerateGeometry {
            rank,
            expected: cols,
            condition_number: f64::INFINITY,
        })?;

    let residual = (&system.a * &solution - &system.b).norm_squared();

    debug!(
        "least squares on {}x{} system: rank {}, residual {:.3e}",
        rows, cols, rank, residual
    );

    Ok(LeastSquaresSolution {
        solution,
        residual,
        rank,
        singular_values: svd.singular_values,
    })
}
