use nalgebra::{DMatrix, Vector3};

use crate::core::constants::POSITION_DIMENSION;

/// Below this distance a station is considered to sit on the evaluated point
const MIN_LINE_OF_SIGHT: f64 = 1e-9;

/// Position dilution of precision of a station set seen from `point`.
///
/// Builds the geometry matrix of unit line-of-sight vectors and returns
/// `sqrt(trace((HᵀH)⁻¹))`. Scaling a range standard deviation by this
/// value gives the expected position error of a trilateration fix.
/// Returns infinity for fewer than three usable stations or singular geometry.
pub fn position_dop(stations: &[Vector3<f64>], point: &Vector3<f64>) -> f64 {
    let lines_of_sight: Vec<Vector3<f64>> = stations
        .iter()
        .map(|station| point - station)
        .filter(|delta| delta.norm() > MIN_LINE_OF_SIGHT)
        .map(|delta| delta.normalize())
        .collect();

    if lines_of_sight.len() < POSITION_DIMENSION {
        return f64::INFINITY;
    }

    let mut h = DMatrix::<f64>::zeros(lines_of_sight.len(), POSITION_DIMENSION);
    for (i, los) in lines_of_sight.iter().enumerate() {
        h.row_mut(i).copy_from(&los.transpose());
    }

    let ht_h = h.transpose() * &h;
    match ht_h.try_inverse() {
        Some(inv) => {
            let trace = inv.trace();
            if trace.is_finite() && trace > 0.0 {
                trace.sqrt()
            } else {
                f64::INFINITY
            }
        }
        None => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_geometry() {
        // Three orthogonal unit lines of sight: HᵀH = I, PDOP = sqrt(3)
        let stations = vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let pdop = position_dop(&stations, &Vector3::zeros());
        assert!((pdop - 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_more_stations_improve_dop() {
        let mut stations = vec![
            Vector3::new(100.0, 0.0, 0.0),
            Vector3::new(0.0, 100.0, 0.0),
            Vector3::new(0.0, 0.0, 100.0),
        ];
        let point = Vector3::new(10.0, 10.0, 10.0);
        let before = position_dop(&stations, &point);

        stations.push(Vector3::new(-100.0, -100.0, -100.0));
        let after = position_dop(&stations, &point);

        assert!(before.is_finite());
        assert!(after < before);
    }

    #[test]
    fn test_degenerate_geometry() {
        let point = Vector3::zeros();
        assert!(position_dop(&[Vector3::x(), Vector3::y()], &point).is_infinite());

        // All lines of sight parallel to the x-axis
        let collinear = vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(-3.0, 0.0, 0.0),
        ];
        assert!(position_dop(&collinear, &point).is_infinite());
    }
}
