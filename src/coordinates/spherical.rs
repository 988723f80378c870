//! Spherical (azimuth, elevation, range) <-> Cartesian conversions
//!
//! Azimuth is measured from the +y axis (north) toward the +x axis (east),
//! elevation from the xy-plane toward +z (up). In a local ENU frame this is
//! the usual radar pointing convention.

use nalgebra::Vector3;

/// Convert `[azimuth, elevation, range]` to Cartesian coordinates
pub fn sph_to_cart(sph: &Vector3<f64>, degrees: bool) -> Vector3<f64> {
    let (az, el) = if degrees {
        (sph.x.to_radians(), sph.y.to_radians())
    } else {
        (sph.x, sph.y)
    };
    let r = sph.z;

    Vector3::new(
        r * az.sin() * el.cos(),
        r * az.cos() * el.cos(),
        r * el.sin(),
    )
}

/// Convert Cartesian coordinates to `[azimuth, elevation, range]`.
///
/// Azimuth is wrapped to `[0, 360)` degrees (or `[0, 2π)`). The zero vector
/// maps to all zeros; straight up or down gives azimuth zero.
pub fn cart_to_sph(cart: &Vector3<f64>, degrees: bool) -> Vector3<f64> {
    let r = cart.norm();
    if r == 0.0 {
        return Vector3::zeros();
    }

    let horizontal = cart.x.hypot(cart.y);
    let el = cart.z.atan2(horizontal);
    let mut az = if horizontal == 0.0 { 0.0 } else { cart.x.atan2(cart.y) };
    if az < 0.0 {
        az += std::f64::consts::TAU;
    }

    if degrees {
        Vector3::new(az.to_degrees(), el.to_degrees(), r)
    } else {
        Vector3::new(az, el, r)
    }
}
