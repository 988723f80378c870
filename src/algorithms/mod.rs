//! Position-fixing algorithms

pub mod dop;
pub mod solver;
pub mod triangulation;
pub mod trilateration;

pub use dop::position_dop;
pub use solver::{least_squares, solve_exact, ExactSolution, LeastSquaresSolution};
pub use triangulation::{build_triangulation_system, triangulate};
pub use trilateration::{build_trilateration_system, trilaterate};
