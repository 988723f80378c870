//! Physical constants and reference ellipsoid parameters

/// WGS84 semi-major axis (m)
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6378137.0;

/// WGS84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// WGS84 semi-minor axis (m)
pub const WGS84_SEMI_MINOR_AXIS: f64 = WGS84_SEMI_MAJOR_AXIS * (1.0 - WGS84_FLATTENING);

/// WGS84 first eccentricity squared
pub const WGS84_ECCENTRICITY_SQUARED: f64 =
    2.0 * WGS84_FLATTENING - WGS84_FLATTENING * WGS84_FLATTENING;

/// Number of unknowns of a 3D position fix
pub const POSITION_DIMENSION: usize = 3;
