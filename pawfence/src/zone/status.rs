//! Classification of a point against a safe zone.
//!
//! Derived values only: nothing here is persisted. The monitor recomputes a
//! [`ZoneStatus`] on every location update and whenever the zone changes.

use crate::geo::{distance_between, GeoPoint};

use super::types::SafeZone;

/// Result of classifying a point against a circular zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneStatus {
    /// True when the point is inside the zone. The boundary itself counts as
    /// inside (non-strict comparison).
    pub is_inside: bool,

    /// Distance from the point to the zone center, rounded to whole meters.
    pub distance_m: u32,

    /// Distance to the zone boundary, rounded to whole meters.
    ///
    /// Measured inward when inside (room left before a breach) and outward
    /// when outside (overshoot). Always non-negative.
    pub distance_from_edge_m: u32,

    /// How far outside the zone the point is, as a percentage of the radius.
    /// Zero when inside.
    pub percentage_outside: u32,
}

/// Classify a point against a zone.
///
/// `is_inside` uses a non-strict comparison, so a point exactly on the
/// boundary is inside. A NaN distance (from NaN coordinates) classifies as
/// outside with zeroed distances rather than panicking.
pub fn zone_status(point: &GeoPoint, zone: &SafeZone) -> ZoneStatus {
    let distance = distance_between(point, &zone.center);
    let is_inside = distance <= zone.radius_m;

    let distance_from_edge = if is_inside {
        zone.radius_m - distance
    } else {
        distance - zone.radius_m
    };

    let percentage_outside = if is_inside {
        0
    } else {
        (((distance - zone.radius_m) / zone.radius_m) * 100.0).round() as u32
    };

    ZoneStatus {
        is_inside,
        distance_m: distance.round() as u32,
        distance_from_edge_m: distance_from_edge.round() as u32,
        percentage_outside,
    }
}

/// Classify when either input may be absent.
///
/// The monitor legitimately runs zone-less or sample-less for stretches of
/// its life; absence yields `None` rather than an error.
pub fn check_zone(point: Option<&GeoPoint>, zone: Option<&SafeZone>) -> Option<ZoneStatus> {
    match (point, zone) {
        (Some(point), Some(zone)) => Some(zone_status(point, zone)),
        _ => None,
    }
}

/// Convenience predicate: is the point inside the zone?
///
/// Returns false when either input is absent.
pub fn is_in_safe_zone(point: Option<&GeoPoint>, zone: Option<&SafeZone>) -> bool {
    check_zone(point, zone).is_some_and(|status| status.is_inside)
}
