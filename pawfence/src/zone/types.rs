//! Safe zone entity and validation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::geo::{GeoError, GeoPoint};

/// Hard minimum radius for any safe zone, in meters.
///
/// UI workflows clamp to narrower ranges (see [`crate::editor`]); this is the
/// floor the entity itself enforces.
pub const MIN_RADIUS_M: f64 = 10.0;

/// Errors for invalid safe zone data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ZoneError {
    /// Radius below the minimum, non-positive, or not finite.
    #[error("Invalid radius: {0}m (must be at least {MIN_RADIUS_M}m)")]
    InvalidRadius(f64),

    /// Center coordinates out of range.
    #[error(transparent)]
    InvalidCenter(#[from] GeoError),
}

/// A circular safe zone configured by a pet owner.
///
/// One zone per owner: the zone is keyed by the owner's account identity in
/// the document store, not by pet. Absence of a zone is a valid state meaning
/// "monitoring not configured", never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeZone {
    /// Zone center.
    pub center: GeoPoint,

    /// Zone radius in meters. Always `>= MIN_RADIUS_M`.
    pub radius_m: f64,

    /// Optional display label (typically the pet's name at time of save).
    pub label: Option<String>,

    /// Timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}

impl SafeZone {
    /// Create a validated safe zone with `updated_at` set to now.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError`] for an out-of-range center or a radius below
    /// [`MIN_RADIUS_M`].
    pub fn new(center: GeoPoint, radius_m: f64) -> Result<Self, ZoneError> {
        let zone = Self {
            center,
            radius_m,
            label: None,
            updated_at: Utc::now(),
        };
        zone.validate()?;
        Ok(zone)
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Re-check the invariants (used defensively at the store boundary).
    pub fn validate(&self) -> Result<(), ZoneError> {
        GeoPoint::new(self.center.lat, self.center.lng)?;
        if !self.radius_m.is_finite() || self.radius_m < MIN_RADIUS_M {
            return Err(ZoneError::InvalidRadius(self.radius_m));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_zone() {
        let center = GeoPoint::new(33.6844, 73.0479).unwrap();
        let zone = SafeZone::new(center, 100.0).unwrap();
        assert_eq!(zone.radius_m, 100.0);
        assert!(zone.label.is_none());
    }

    #[test]
    fn test_minimum_radius_is_allowed() {
        let center = GeoPoint::new(0.0, 0.0).unwrap();
        assert!(SafeZone::new(center, MIN_RADIUS_M).is_ok());
    }

    #[test]
    fn test_rejects_radius_below_minimum() {
        let center = GeoPoint::new(0.0, 0.0).unwrap();
        let result = SafeZone::new(center, 9.9);
        assert_eq!(result.unwrap_err(), ZoneError::InvalidRadius(9.9));
    }

    #[test]
    fn test_rejects_non_finite_radius() {
        let center = GeoPoint::new(0.0, 0.0).unwrap();
        assert!(SafeZone::new(center, f64::NAN).is_err());
        assert!(SafeZone::new(center, f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_catches_bad_center() {
        let mut zone = SafeZone::new(GeoPoint::new(0.0, 0.0).unwrap(), 100.0).unwrap();
        zone.center.lat = 95.0;
        assert!(matches!(
            zone.validate(),
            Err(ZoneError::InvalidCenter(GeoError::InvalidLatitude(_)))
        ));
    }

    #[test]
    fn test_with_label() {
        let center = GeoPoint::new(33.6844, 73.0479).unwrap();
        let zone = SafeZone::new(center, 100.0).unwrap().with_label("Rex");
        assert_eq!(zone.label.as_deref(), Some("Rex"));
    }
}
