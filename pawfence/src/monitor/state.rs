//! Monitor status types.

use crate::feed::LocationSample;
use crate::zone::SafeZone;

/// Lifecycle phase of a monitor, derived from its status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// No session running, or nothing has happened yet.
    Idle,
    /// Zone fetch and feed subscribe are in flight.
    Loading,
    /// At least one location event has arrived (a zone may or may not be
    /// configured).
    Active,
    /// The zone fetch or the feed reported a retrievable error.
    Error,
}

/// Complete geofence status exposed to the presentation layer.
///
/// Derived state only; recomputed on every location update and whenever the
/// zone changes. With no zone configured the status stays neutral (inside,
/// zero distances) - no zone means no alerting, regardless of location
/// availability.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorStatus {
    /// Last known zone, if the owner has configured one.
    pub zone: Option<SafeZone>,

    /// Last known location sample.
    pub sample: Option<LocationSample>,

    /// True when the pet is outside the zone. Neutral `false` while either
    /// the zone or a sample is missing.
    pub is_outside: bool,

    /// Distance from the last sample to the zone center, whole meters.
    pub distance_m: u32,

    /// Distance to the zone boundary, whole meters (inward when inside,
    /// overshoot when outside).
    pub distance_from_edge_m: u32,

    /// True until the feed delivers its first event (or fails).
    pub loading: bool,

    /// Most recent zone-fetch or feed error, if any. Set alongside the last
    /// known good state, which is preserved rather than reset.
    pub error: Option<String>,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self {
            zone: None,
            sample: None,
            is_outside: false,
            distance_m: 0,
            distance_from_edge_m: 0,
            loading: true,
            error: None,
        }
    }
}

impl MonitorStatus {
    /// True when both a zone and a sample are present - the precondition for
    /// showing any breach UI.
    pub fn is_monitoring(&self) -> bool {
        self.zone.is_some() && self.sample.is_some()
    }

    /// Derive the lifecycle phase.
    pub fn phase(&self) -> MonitorPhase {
        if self.error.is_some() {
            MonitorPhase::Error
        } else if self.sample.is_some() {
            MonitorPhase::Active
        } else if self.loading {
            MonitorPhase::Loading
        } else {
            MonitorPhase::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    #[test]
    fn test_default_is_neutral_and_loading() {
        let status = MonitorStatus::default();
        assert!(!status.is_outside);
        assert_eq!(status.distance_m, 0);
        assert!(status.loading);
        assert!(!status.is_monitoring());
        assert_eq!(status.phase(), MonitorPhase::Loading);
    }

    #[test]
    fn test_is_monitoring_requires_zone_and_sample() {
        let zone = SafeZone::new(GeoPoint::new(0.0, 0.0).unwrap(), 100.0).unwrap();
        let sample = LocationSample::new(0.0, 0.0);

        let mut status = MonitorStatus::default();
        assert!(!status.is_monitoring());

        status.zone = Some(zone);
        assert!(!status.is_monitoring());

        status.sample = Some(sample);
        assert!(status.is_monitoring());
    }

    #[test]
    fn test_phase_transitions() {
        let mut status = MonitorStatus::default();
        assert_eq!(status.phase(), MonitorPhase::Loading);

        status.sample = Some(LocationSample::new(0.0, 0.0));
        status.loading = false;
        assert_eq!(status.phase(), MonitorPhase::Active);

        status.error = Some("feed down".into());
        assert_eq!(status.phase(), MonitorPhase::Error);

        status.error = None;
        status.sample = None;
        assert_eq!(status.phase(), MonitorPhase::Idle);
    }
}
