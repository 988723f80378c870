//! Space Coordinates
//!
//! Coordinate-frame conversions (ENU / NED / az-el, ECEF, WGS84 geodetic)
//! and position fixing from multiple stations: triangulation from bearing
//! observations and trilateration from range observations.

pub mod core;
pub mod algorithms;
pub mod coordinates;
pub mod validation;
pub mod utils;

// Re-export commonly used types
pub use self::core::{
    bearings_from_matrix, stations_from_matrix, vectors_from_triplets, LinearSystem, PositionFix,
    Problem, TriangulationSystem, TrilaterationSystem,
};
pub use algorithms::{
    build_triangulation_system, build_trilateration_system, least_squares, position_dop,
    solve_exact, triangulate, trilaterate, ExactSolution, LeastSquaresSolution,
};
pub use coordinates::{
    azel_to_ecef, cart_to_sph, ecef_to_enu, ecef_to_geodetic, ecef_to_ned, enu_to_ecef,
    geodetic_to_ecef, ned_to_ecef, sph_to_cart, GeodeticPosition,
};
pub use validation::{DataValidator, PositioningError, Result};
pub use utils::{ConfigError, SolverConfig};

/// Solve a problem read from JSON or built by hand
pub fn solve_problem(problem: &Problem, config: &SolverConfig) -> Result<PositionFix> {
    match problem {
        Problem::Triangulation { stations, bearings } => triangulate(
            &vectors_from_triplets(stations),
            &vectors_from_triplets(bearings),
            config,
        ),
        Problem::Trilateration { stations, ranges } => {
            trilaterate(&vectors_from_triplets(stations), ranges, config)
        }
    }
}
