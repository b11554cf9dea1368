//! Great-circle distance engine.
//!
//! Provides the [`GeoPoint`] coordinate type and the haversine distance
//! calculation used to classify a tracked pet against a circular safe zone.
//! Pure math with no side effects; zone classification built on top of it
//! lives in [`crate::zone::status`].

mod types;

pub use types::{GeoError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates, in meters.
///
/// Standard haversine formula. Deterministic and pure: symmetric in its
/// arguments and zero for identical points. No range validation is performed;
/// callers guarantee valid coordinates. NaN inputs propagate to a NaN result,
/// which downstream classification treats as "not inside".
///
/// # Arguments
///
/// * `lat1`, `lon1` - First point, degrees
/// * `lat2`, `lon2` - Second point, degrees
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Distance between two [`GeoPoint`]s, in meters.
#[inline]
pub fn distance_between(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_distance(a.lat, a.lng, b.lat, b.lng)
}
