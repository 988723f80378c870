//! Local tangent-plane <-> Earth-fixed rotations
//!
//! All transforms use the geocentric zenith at the origin and rotate only;
//! no translation to the origin's ECEF position is applied.

use nalgebra::{Matrix3, Matrix3xX, Vector3};

use crate::coordinates::spherical::sph_to_cart;

/// Rotation whose columns are the east, north and up axes expressed in ECEF
pub fn enu_to_ecef_rotation(lat: f64, lon: f64, degrees: bool) -> Matrix3<f64> {
    let (lat, lon) = if degrees {
        (lat.to_radians(), lon.to_radians())
    } else {
        (lat, lon)
    };
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    Matrix3::new(
        -sin_lon, -sin_lat * cos_lon, cos_lat * cos_lon,
        cos_lon, -sin_lat * sin_lon, cos_lat * sin_lon,
        0.0, cos_lat, sin_lat,
    )
}

/// ENU vector at (lat, lon) to ECEF
pub fn enu_to_ecef(lat: f64, lon: f64, enu: &Vector3<f64>, degrees: bool) -> Vector3<f64> {
    enu_to_ecef_rotation(lat, lon, degrees) * enu
}

/// ECEF vector to ENU at (lat, lon)
pub fn ecef_to_enu(lat: f64, lon: f64, ecef: &Vector3<f64>, degrees: bool) -> Vector3<f64> {
    // orthonormal: inverse is the transpose
    enu_to_ecef_rotation(lat, lon, degrees).transpose() * ecef
}

/// Rotate a 3xN matrix of ENU columns to ECEF
pub fn enu_to_ecef_batch(lat: f64, lon: f64, enu: &Matrix3xX<f64>, degrees: bool) -> Matrix3xX<f64> {
    enu_to_ecef_rotation(lat, lon, degrees) * enu
}

/// Rotate a 3xN matrix of ECEF columns to ENU
pub fn ecef_to_enu_batch(lat: f64, lon: f64, ecef: &Matrix3xX<f64>, degrees: bool) -> Matrix3xX<f64> {
    enu_to_ecef_rotation(lat, lon, degrees).transpose() * ecef
}

/// NED (north, east, down) vector at (lat, lon) to ECEF
pub fn ned_to_ecef(lat: f64, lon: f64, ned: &Vector3<f64>, degrees: bool) -> Vector3<f64> {
    let enu = Vector3::new(ned.y, ned.x, -ned.z);
    enu_to_ecef(lat, lon, &enu, degrees)
}

/// ECEF vector to NED at (lat, lon)
pub fn ecef_to_ned(lat: f64, lon: f64, ecef: &Vector3<f64>, degrees: bool) -> Vector3<f64> {
    let enu = ecef_to_enu(lat, lon, ecef, degrees);
    Vector3::new(enu.y, enu.x, -enu.z)
}

/// Unit ECEF pointing vector for an azimuth/elevation look direction at (lat, lon).
///
/// The result can be fed directly as a triangulation bearing.
pub fn azel_to_ecef(lat: f64, lon: f64, az: f64, el: f64, degrees: bool) -> Vector3<f64> {
    let enu = sph_to_cart(&Vector3::new(az, el, 1.0), degrees);
    enu_to_ecef(lat, lon, &enu, degrees)
}
