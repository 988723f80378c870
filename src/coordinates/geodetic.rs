//! WGS84 geodetic <-> ECEF (ITRS) position conversions

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::core::constants::{
    WGS84_ECCENTRICITY_SQUARED, WGS84_SEMI_MAJOR_AXIS,
};

/// Iterations of the latitude fixed-point refinement; converges to sub-mm in two
const LATITUDE_ITERATIONS: usize = 5;

/// Geodetic position on the WGS84 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    /// Latitude, degrees or radians depending on the conversion call
    pub lat: f64,
    pub lon: f64,
    /// Height above the ellipsoid (m)
    pub alt: f64,
}

impl GeodeticPosition {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }
}

/// Geodetic latitude, longitude and ellipsoidal height to ECEF (m)
pub fn geodetic_to_ecef(lat: f64, lon: f64, alt: f64, degrees: bool) -> Vector3<f64> {
    let (lat, lon) = if degrees {
        (lat.to_radians(), lon.to_radians())
    } else {
        (lat, lon)
    };
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    // prime vertical radius of curvature
    let n = WGS84_SEMI_MAJOR_AXIS / (1.0 - WGS84_ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (n + alt) * cos_lat * cos_lon,
        (n + alt) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_ECCENTRICITY_SQUARED) + alt) * sin_lat,
    )
}

/// ECEF (m) to geodetic latitude, longitude and ellipsoidal height
pub fn ecef_to_geodetic(ecef: &Vector3<f64>, degrees: bool) -> GeodeticPosition {
    let e2 = WGS84_ECCENTRICITY_SQUARED;
    let p = ecef.x.hypot(ecef.y);
    let lon = ecef.y.atan2(ecef.x);

    let mut lat = ecef.z.atan2(p * (1.0 - e2));
    let mut alt = ellipsoidal_height(p, ecef.z, lat);
    for _ in 0..LATITUDE_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_SEMI_MAJOR_AXIS / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        lat = ecef.z.atan2(p * (1.0 - e2 * n / (n + alt)));
        alt = ellipsoidal_height(p, ecef.z, lat);
    }

    if degrees {
        GeodeticPosition::new(lat.to_degrees(), lon.to_degrees(), alt)
    } else {
        GeodeticPosition::new(lat, lon, alt)
    }
}

/// Height above the ellipsoid, valid at all latitudes including the poles
fn ellipsoidal_height(p: f64, z: f64, lat: f64) -> f64 {
    let (sin_lat, cos_lat) = lat.sin_cos();
    p * cos_lat + z * sin_lat
        - WGS84_SEMI_MAJOR_AXIS * (1.0 - WGS84_ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::WGS84_SEMI_MINOR_AXIS;

    #[test]
    fn test_equator_prime_meridian() {
        let ecef = geodetic_to_ecef(0.0, 0.0, 0.0, true);
        assert!((ecef.x - WGS84_SEMI_MAJOR_AXIS).abs() < 1e-6);
        assert!(ecef.y.abs() < 1e-6);
        assert!(ecef.z.abs() < 1e-6);

        let geo = ecef_to_geodetic(&ecef, true);
        assert!(geo.lat.abs() < 1e-12);
        assert!(geo.lon.abs() < 1e-12);
        assert!(geo.alt.abs() < 1e-6);
    }

    #[test]
    fn test_north_pole() {
        let ecef = geodetic_to_ecef(90.0, 0.0, 100.0, true);
        assert!((ecef.z - (WGS84_SEMI_MINOR_AXIS + 100.0)).abs() < 1e-6);

        let geo = ecef_to_geodetic(&Vector3::new(0.0, 0.0, WGS84_SEMI_MINOR_AXIS + 100.0), true);
        assert!((geo.lat - 90.0).abs() < 1e-9);
        assert!((geo.alt - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip() {
        let sites = [
            (69.5863, 19.2272, 86.0),
            (-33.9, 151.2, 40.0),
            (45.0, -120.0, 10_000.0),
            (-89.5, 10.0, -50.0),
            (12.0, 179.9, 400_000.0),
        ];

        for &(lat, lon, alt) in &sites {
            let ecef = geodetic_to_ecef(lat, lon, alt, true);
            let geo = ecef_to_geodetic(&ecef, true);
            assert!((geo.lat - lat).abs() < 1e-9, "lat {} vs {}", geo.lat, lat);
            assert!((geo.lon - lon).abs() < 1e-9, "lon {} vs {}", geo.lon, lon);
            assert!((geo.alt - alt).abs() < 1e-5, "alt {} vs {}", geo.alt, alt);
        }
    }

    #[test]
    fn test_radians() {
        let ecef = geodetic_to_ecef(0.5, -1.0, 250.0, false);
        let geo = ecef_to_geodetic(&ecef, false);
        assert!((geo.lat - 0.5).abs() < 1e-12);
        assert!((geo.lon + 1.0).abs() < 1e-12);
        assert!((geo.alt - 250.0).abs() < 1e-5);
    }
}
