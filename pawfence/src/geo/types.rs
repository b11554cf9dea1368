//! Geographic coordinate types and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors for invalid geographic coordinates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude outside -90 to 90 degrees.
    #[error("Invalid latitude: {0} (must be -90 to 90)")]
    InvalidLatitude(f64),

    /// Longitude outside -180 to 180 degrees.
    #[error("Invalid longitude: {0} (must be -180 to 180)")]
    InvalidLongitude(f64),
}

/// A geographic point in floating-point degrees.
///
/// The canonical longitude field name at this crate's boundary is `lng`.
/// External payloads that spell it `lon` are accepted on deserialization
/// and normalized here, once, at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90).
    pub lat: f64,

    /// Longitude in degrees (-180 to 180).
    #[serde(alias = "lon")]
    pub lng: f64,
}

impl GeoPoint {
    /// Create a validated geographic point.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if either coordinate is out of range or not finite.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(MIN_LON..=MAX_LON).contains(&lng) {
            return Err(GeoError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Check both coordinates are finite and in range.
    pub fn is_valid(&self) -> bool {
        Self::new(self.lat, self.lng).is_ok()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_point() {
        let point = GeoPoint::new(33.6844, 73.0479).unwrap();
        assert_eq!(point.lat, 33.6844);
        assert_eq!(point.lng, 73.0479);
        assert!(point.is_valid());
    }

    #[test]
    fn test_new_rejects_out_of_range_latitude() {
        let result = GeoPoint::new(91.0, 0.0);
        assert_eq!(result.unwrap_err(), GeoError::InvalidLatitude(91.0));
    }

    #[test]
    fn test_new_rejects_out_of_range_longitude() {
        let result = GeoPoint::new(0.0, -180.5);
        assert_eq!(result.unwrap_err(), GeoError::InvalidLongitude(-180.5));
    }

    #[test]
    fn test_new_rejects_nan() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_poles_and_antimeridian_are_valid() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_deserialize_accepts_lon_alias() {
        let point: GeoPoint = serde_json::from_str(r#"{"lat": 33.6844, "lon": 73.0479}"#).unwrap();
        assert_eq!(point.lng, 73.0479);

        let point: GeoPoint = serde_json::from_str(r#"{"lat": 33.6844, "lng": 73.0479}"#).unwrap();
        assert_eq!(point.lng, 73.0479);
    }

    #[test]
    fn test_serialize_uses_canonical_lng() {
        let point = GeoPoint::new(1.0, 2.0).unwrap();
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"lng\""));
        assert!(!json.contains("\"lon\""));
    }
}
