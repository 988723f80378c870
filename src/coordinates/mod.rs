//! Coordinate frame conversions producing the common Cartesian frame used for position fixing

pub mod frames;
pub mod geodetic;
pub mod spherical;

pub use frames::{azel_to_ecef, ecef_to_enu, ecef_to_ned, enu_to_ecef, ned_to_ecef};
pub use geodetic::{ecef_to_geodetic, geodetic_to_ecef, GeodeticPosition};
pub use spherical::{cart_to_sph, sph_to_cart};
