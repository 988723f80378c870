//! Position fixing from bearing (line-of-sight) observations
//!
//! Each station `p_i` observes the target along the unit direction `r_i`.
//! The point minimising the summed squared perpendicular distance to all
//! lines solves the normal equations
//!
//! ```text
//! A = Σ (I - r_i r_iᵀ),   b = Σ (I - r_i r_iᵀ) p_i,   A x = b
//! ```
//!
//! `A` is symmetric positive semi-definite. It is singular when there is a
//! single line or when all lines are parallel; that case surfaces as
//! `DegenerateGeometry` from the solve, never from the builder.

use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::algorithms::solver::solve_exact;
use crate::core::constants::POSITION_DIMENSION;
use crate::core::types::{LinearSystem, PositionFix, TriangulationSystem};
use crate::utils::config::SolverConfig;
use crate::validation::data::DataValidator;
use crate::validation::error::Result;

/// Projector onto the plane orthogonal to `bearing`
fn orthogonal_projector(bearing: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::identity() - bearing * bearing.transpose()
}

/// Build the normal equations of the closest point to N lines.
///
/// Bearings are not normalised here. With bearing validation disabled in
/// `config`, a non-unit bearing silently mis-weights its line.
pub fn build_triangulation_system(
    stations: &[Vector3<f64>],
    bearings: &[Vector3<f64>],
    config: &SolverConfig,
) -> Result<TriangulationSystem> {
    let validator = DataValidator::with_config(config.clone());
    validator.validate_stations(stations, bearings.len(), "bearings")?;
    validator.validate_bearings(bearings)?;

    let mut a = Matrix3::zeros();
    let mut b = Vector3::zeros();

    for (station, bearing) in stations.iter().zip(bearings) {
        let projector = orthogonal_projector(bearing);
        a += projector;
        b += projector * station;
    }

    debug!("triangulation system assembled from {} lines", stations.len());

    Ok(LinearSystem::new(a, b))
}

/// Sum of squared perpendicular distances from `point` to every line
pub fn squared_miss_distance(
    point: &Vector3<f64>,
    stations: &[Vector3<f64>],
    bearings: &[Vector3<f64>],
) -> f64 {
    stations
        .iter()
        .zip(bearings)
        .map(|(station, bearing)| {
            let offset = point - station;
            offset.dot(&(orthogonal_projector(bearing) * offset))
        })
        .sum()
}

/// Build and solve a triangulation problem in one call
pub fn triangulate(
    stations: &[Vector3<f64>],
    bearings: &[Vector3<f64>],
    config: &SolverConfig,
) -> Result<PositionFix> {
    let system = build_triangulation_system(stations, bearings, config)?;
    let solved = solve_exact(&system, config)?;

    Ok(PositionFix {
        residual: squared_miss_distance(&solved.solution, stations, bearings),
        position: solved.solution,
        rank: POSITION_DIMENSION,
        condition_number: solved.condition_number,
        observations: stations.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error::PositioningError;

    fn bearings_to(target: &Vector3<f64>, stations: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
        stations.iter().map(|s| (target - s).normalize()).collect()
    }

    fn reference_stations() -> Vec<Vector3<f64>> {
        vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_system_is_symmetric() {
        let stations = vec![
            Vector3::new(1.0, 2.0, 0.0),
            Vector3::new(-4.0, 0.5, 1.0),
            Vector3::new(3.0, -1.0, 2.0),
            Vector3::new(0.0, 0.0, -7.0),
        ];
        let target = Vector3::new(0.3, 11.0, -2.5);
        let bearings = bearings_to(&target, &stations);

        let system = build_triangulation_system(&stations, &bearings, &SolverConfig::default()).unwrap();
        assert_eq!(system.a, system.a.transpose());
        assert_eq!(system.b.len(), 3);
    }

    #[test]
    fn test_reference_scenario() {
        let stations = reference_stations();
        let target = Vector3::new(3.0, 0.0, 20.0);
        let bearings = bearings_to(&target, &stations);

        let fix = triangulate(&stations, &bearings, &SolverConfig::default()).unwrap();
        assert!((fix.position - target).norm() < 1e-6);
        assert!(fix.residual < 1e-12);
        assert_eq!(fix.rank, 3);
        assert_eq!(fix.observations, 3);
    }

    #[test]
    fn test_noiseless_recovery_precision() {
        let stations = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(500.0, 0.0, 0.0),
            Vector3::new(0.0, 500.0, 0.0),
            Vector3::new(250.0, 250.0, 100.0),
        ];
        let target = Vector3::new(100.0, -50.0, 300.0);
        let bearings = bearings_to(&target, &stations);

        let fix = triangulate(&stations, &bearings, &SolverConfig::default()).unwrap();
        assert!((fix.position - target).norm() / target.norm() < 1e-9);
    }

    #[test]
    fn test_two_crossing_lines() {
        let stations = vec![Vector3::new(-10.0, 0.0, 0.0), Vector3::new(0.0, -10.0, 0.0)];
        let target = Vector3::new(2.0, 3.0, 4.0);
        let bearings = bearings_to(&target, &stations);

        let fix = triangulate(&stations, &bearings, &SolverConfig::default()).unwrap();
        assert!((fix.position - target).norm() < 1e-9);
    }

    #[test]
    fn test_skew_lines_give_midpoint() {
        // x-axis at z = 0 and y-axis shifted to z = 2: closest point is (0, 0, 1)
        let stations = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 2.0)];
        let bearings = vec![Vector3::x(), Vector3::y()];

        let fix = triangulate(&stations, &bearings, &SolverConfig::default()).unwrap();
        assert!((fix.position - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        assert!((fix.residual - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_bearings_are_degenerate() {
        let stations = reference_stations();
        let direction = Vector3::new(1.0, 2.0, 3.0).normalize();
        let bearings = vec![direction; 3];

        let config = SolverConfig::default();
        let system = build_triangulation_system(&stations, &bearings, &config).unwrap();
        let svd = system.a.svd(false, false);
        let smallest = svd.singular_values.min();
        assert!(smallest < 1e-12);

        match solve_exact(&system, &config) {
            Err(PositioningError::DegenerateGeometry { rank, .. }) => assert!(rank <= 2),
            other => panic!("expected DegenerateGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_single_line_is_degenerate() {
        let stations = vec![Vector3::new(1.0, 1.0, 1.0)];
        let bearings = vec![Vector3::z()];
        assert!(matches!(
            triangulate(&stations, &bearings, &SolverConfig::default()),
            Err(PositioningError::DegenerateGeometry { rank: 2, .. })
        ));
    }

    #[test]
    fn test_nan_bearing_without_finite_check() {
        let stations = reference_stations();
        let mut bearings = bearings_to(&Vector3::new(3.0, 0.0, 20.0), &stations);
        bearings[1] = Vector3::new(f64::NAN, 0.0, 1.0);
        let config = SolverConfig {
            reject_non_finite: false,
            ..SolverConfig::permissive()
        };

        assert!(matches!(
            triangulate(&stations, &bearings, &config),
            Err(PositioningError::NonFiniteInput { .. })
        ));
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let stations = reference_stations();
        let bearings = vec![Vector3::z(); 2];
        assert!(matches!(
            build_triangulation_system(&stations, &bearings, &SolverConfig::default()),
            Err(PositioningError::DimensionMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_non_unit_bearing() {
        let stations = reference_stations();
        let mut bearings = bearings_to(&Vector3::new(3.0, 0.0, 20.0), &stations);
        bearings[0] *= 2.0;

        assert!(matches!(
            build_triangulation_system(&stations, &bearings, &SolverConfig::default()),
            Err(PositioningError::NonUnitBearing { index: 0, .. })
        ));

        // Trusting the caller still yields a well-formed, symmetric system
        let system = build_triangulation_system(&stations, &bearings, &SolverConfig::permissive()).unwrap();
        assert_eq!(system.a, system.a.transpose());
    }
}
