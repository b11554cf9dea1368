//! Geofence monitor core - combines zone and location inputs into status.
//!
//! The monitor holds the last known zone and sample, re-runs classification
//! whenever both become available, and broadcasts every status change. It is
//! deliberately agnostic about where its inputs come from: the session layer
//! ([`super::session`]) wires a zone store and a location feed into it, and
//! tests drive it directly.
//!
//! # Ordering
//!
//! The zone fetch and the feed subscription race freely at startup. The
//! monitor is correct under either completion order: a sample arriving
//! before the zone is held with a neutral status, and the moment the zone
//! lands the held sample is re-classified without waiting for a new fix.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use crate::feed::{FeedError, LocationSample};
use crate::zone::{check_zone, SafeZone, StoreError};

use super::state::MonitorStatus;

/// Capacity of the status broadcast channel.
const STATUS_CHANNEL_CAPACITY: usize = 16;

/// Geofence monitor core.
///
/// Thread-safe; clone-cheap via internal `Arc`s. Consumers poll
/// [`status`](GeofenceMonitor::status) or subscribe to pushed snapshots via
/// [`subscribe`](GeofenceMonitor::subscribe).
pub struct GeofenceMonitor {
    state: Arc<RwLock<MonitorStatus>>,
    status_tx: broadcast::Sender<MonitorStatus>,
}

impl GeofenceMonitor {
    /// Create a monitor in the initial loading state.
    pub fn new() -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(MonitorStatus::default())),
            status_tx,
        }
    }

    /// Apply the result of a zone fetch (or a zone re-save).
    ///
    /// `None` means the owner has never configured a zone - a valid state
    /// that leaves the status neutral. If a sample is already held, the new
    /// zone is classified against it immediately.
    pub fn receive_zone(&self, zone: Option<SafeZone>) {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            match &zone {
                Some(zone) => {
                    tracing::info!(radius_m = zone.radius_m, "Safe zone loaded")
                }
                None => tracing::info!("No safe zone configured"),
            }
            state.zone = zone;
            state.error = None;
            Self::reclassify(&mut state);
            state.clone()
        };
        let _ = self.status_tx.send(snapshot);
    }

    /// Apply a location update from the feed.
    ///
    /// `None` is the feed's "no location yet" payload; it clears the held
    /// sample and returns the status to neutral.
    pub fn receive_sample(&self, sample: Option<LocationSample>) {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            state.loading = false;
            if let Some(sample) = &sample {
                tracing::debug!(lat = sample.lat, lng = sample.lng, "Location update");
            }
            state.sample = sample;
            Self::reclassify(&mut state);
            state.clone()
        };
        let _ = self.status_tx.send(snapshot);
    }

    /// Record a zone fetch failure.
    ///
    /// Distinct from an absent zone: the error is surfaced on the status
    /// while the last known zone and sample are preserved.
    pub fn receive_zone_error(&self, error: &StoreError) {
        tracing::warn!(error = %error, "Safe zone fetch failed");
        self.record_error(error.to_string());
    }

    /// Record a feed transport failure.
    ///
    /// The last known status is preserved - a transient error must not
    /// spuriously flip the pet to "safe" or "missing".
    pub fn receive_feed_error(&self, error: &FeedError) {
        tracing::warn!(error = %error, "Location feed error");
        self.record_error(error.to_string());
    }

    /// Current status snapshot.
    pub fn status(&self) -> MonitorStatus {
        self.state.read().unwrap().clone()
    }

    /// Subscribe to pushed status snapshots (one per change).
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorStatus> {
        self.status_tx.subscribe()
    }

    fn record_error(&self, message: String) {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            state.loading = false;
            state.error = Some(message);
            state.clone()
        };
        let _ = self.status_tx.send(snapshot);
    }

    /// Re-run classification against whatever zone and sample are held.
    ///
    /// Without both, the status is neutral: inside, zero distances. Breach
    /// and recovery are logged only on the inside/outside edge.
    fn reclassify(state: &mut MonitorStatus) {
        let was_outside = state.is_outside;
        let point = state.sample.as_ref().map(LocationSample::point);

        match check_zone(point.as_ref(), state.zone.as_ref()) {
            Some(status) => {
                state.is_outside = !status.is_inside;
                state.distance_m = status.distance_m;
                state.distance_from_edge_m = status.distance_from_edge_m;
            }
            None => {
                state.is_outside = false;
                state.distance_m = 0;
                state.distance_from_edge_m = 0;
            }
        }

        if state.is_outside && !was_outside {
            tracing::warn!(
                distance_m = state.distance_m,
                overshoot_m = state.distance_from_edge_m,
                "Safe zone breach"
            );
        } else if !state.is_outside && was_outside {
            tracing::info!("Pet returned to safe zone");
        }
    }
}

impl Default for GeofenceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::monitor::state::MonitorPhase;

    fn make_zone(radius_m: f64) -> SafeZone {
        SafeZone::new(GeoPoint::new(33.6844, 73.0479).unwrap(), radius_m).unwrap()
    }

    /// Sample ~150m north of the test zone center.
    fn far_sample() -> LocationSample {
        LocationSample::new(33.68575, 73.0479)
    }

    /// Sample at the test zone center.
    fn center_sample() -> LocationSample {
        LocationSample::new(33.6844, 73.0479)
    }

    #[test]
    fn test_sample_without_zone_stays_neutral() {
        let monitor = GeofenceMonitor::new();
        monitor.receive_zone(None);
        monitor.receive_sample(Some(far_sample()));

        let status = monitor.status();
        assert!(!status.is_outside);
        assert_eq!(status.distance_m, 0);
        assert!(status.error.is_none());
        assert!(!status.is_monitoring());
        assert_eq!(status.phase(), MonitorPhase::Active);
    }

    #[test]
    fn test_late_zone_arrival_reclassifies_held_sample() {
        let monitor = GeofenceMonitor::new();

        // Feed wins the race: sample arrives first
        monitor.receive_sample(Some(far_sample()));
        assert!(!monitor.status().is_outside);

        // Zone lands afterwards - the held sample is re-checked immediately,
        // with no new location push required
        monitor.receive_zone(Some(make_zone(100.0)));

        let status = monitor.status();
        assert!(status.is_outside);
        assert!(status.distance_m > 100);
        assert!(status.is_monitoring());
    }

    #[test]
    fn test_zone_first_then_sample() {
        let monitor = GeofenceMonitor::new();
        monitor.receive_zone(Some(make_zone(100.0)));
        monitor.receive_sample(Some(center_sample()));

        let status = monitor.status();
        assert!(!status.is_outside);
        assert_eq!(status.distance_m, 0);
        assert_eq!(status.distance_from_edge_m, 100);
    }

    #[test]
    fn test_zone_resave_reclassifies() {
        let monitor = GeofenceMonitor::new();
        monitor.receive_zone(Some(make_zone(100.0)));
        monitor.receive_sample(Some(far_sample()));
        assert!(monitor.status().is_outside);

        // Radius grows past the pet: breach clears without a new fix
        monitor.receive_zone(Some(make_zone(300.0)));
        assert!(!monitor.status().is_outside);
    }

    #[test]
    fn test_feed_error_preserves_last_known_status() {
        let monitor = GeofenceMonitor::new();
        monitor.receive_zone(Some(make_zone(100.0)));
        monitor.receive_sample(Some(far_sample()));
        assert!(monitor.status().is_outside);

        monitor.receive_feed_error(&FeedError::Unavailable("transport blip".into()));

        let status = monitor.status();
        assert!(status.error.is_some());
        assert!(status.is_outside, "error must not reset breach state");
        assert!(status.zone.is_some());
        assert!(status.sample.is_some());
        assert_eq!(status.phase(), MonitorPhase::Error);
    }

    #[test]
    fn test_zone_error_preserves_sample() {
        let monitor = GeofenceMonitor::new();
        monitor.receive_sample(Some(center_sample()));
        monitor.receive_zone_error(&StoreError::Unavailable("offline".into()));

        let status = monitor.status();
        assert!(status.error.is_some());
        assert!(status.sample.is_some());
        assert!(!status.is_outside);
    }

    #[test]
    fn test_successful_zone_load_clears_error() {
        let monitor = GeofenceMonitor::new();
        monitor.receive_zone_error(&StoreError::Unavailable("offline".into()));
        assert!(monitor.status().error.is_some());

        monitor.receive_zone(Some(make_zone(100.0)));
        assert!(monitor.status().error.is_none());
    }

    #[test]
    fn test_null_location_returns_to_neutral() {
        let monitor = GeofenceMonitor::new();
        monitor.receive_zone(Some(make_zone(100.0)));
        monitor.receive_sample(Some(far_sample()));
        assert!(monitor.status().is_outside);

        monitor.receive_sample(None);
        let status = monitor.status();
        assert!(!status.is_outside);
        assert!(status.sample.is_none());
        assert!(!status.is_monitoring());
    }

    #[test]
    fn test_first_feed_event_clears_loading() {
        let monitor = GeofenceMonitor::new();
        assert!(monitor.status().loading);

        monitor.receive_sample(None);
        assert!(!monitor.status().loading);
    }

    #[tokio::test]
    async fn test_status_changes_are_broadcast() {
        let monitor = GeofenceMonitor::new();
        let mut rx = monitor.subscribe();

        monitor.receive_zone(Some(make_zone(100.0)));
        monitor.receive_sample(Some(far_sample()));

        let first = rx.recv().await.unwrap();
        assert!(first.zone.is_some());

        let second = rx.recv().await.unwrap();
        assert!(second.is_outside);
    }
}
