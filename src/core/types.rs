//! Core data types for position fixing

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::validation::error::{PositioningError, Result};

/// Linear system `a * x = b` whose (least-squares) solution is the target position.
///
/// Built fresh on every call and consumed by a solver; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSystem<M, V> {
    pub a: M,
    pub b: V,
}

impl<M, V> LinearSystem<M, V> {
    pub fn new(a: M, b: V) -> Self {
        Self { a, b }
    }
}

/// Square normal equations produced by triangulation
pub type TriangulationSystem = LinearSystem<Matrix3<f64>, Vector3<f64>>;

/// Rectangular differenced-range system produced by trilateration
pub type TrilaterationSystem = LinearSystem<DMatrix<f64>, DVector<f64>>;

/// Solved position together with solve diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub position: Vector3<f64>,
    /// Sum of squared residuals of the solved system
    pub residual: f64,
    /// Numerical rank achieved by the system matrix
    pub rank: usize,
    pub condition_number: f64,
    /// Number of stations that contributed
    pub observations: usize,
}

/// A position-fixing problem as read from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Problem {
    Triangulation {
        stations: Vec<[f64; 3]>,
        bearings: Vec<[f64; 3]>,
    },
    Trilateration {
        stations: Vec<[f64; 3]>,
        ranges: Vec<f64>,
    },
}

/// Convert `[x, y, z]` triplets into nalgebra vectors
pub fn vectors_from_triplets(triplets: &[[f64; 3]]) -> Vec<Vector3<f64>> {
    triplets.iter().map(|t| Vector3::new(t[0], t[1], t[2])).collect()
}

/// Split a 3xN matrix (one column per station) into station vectors.
pub fn stations_from_matrix(matrix: &DMatrix<f64>) -> Result<Vec<Vector3<f64>>> {
    columns_from_matrix(matrix, "stations")
}

/// Split a 3xN matrix (one column per bearing) into direction vectors.
pub fn bearings_from_matrix(matrix: &DMatrix<f64>) -> Result<Vec<Vector3<f64>>> {
    columns_from_matrix(matrix, "bearings")
}

fn columns_from_matrix(matrix: &DMatrix<f64>, quantity: &str) -> Result<Vec<Vector3<f64>>> {
    if matrix.nrows() != 3 {
        return Err(PositioningError::DimensionMismatch {
            quantity: format!("{} rows", quantity),
            expected: 3,
            found: matrix.nrows(),
        });
    }

    Ok(matrix
        .column_iter()
        .map(|col| Vector3::new(col[0], col[1], col[2]))
        .collect())
}
