//! Provider traits for consumers of geofence status.
//!
//! The presentation layer reads through these seams rather than holding the
//! concrete monitor or session types:
//!
//! - [`GeofenceStatusProvider`] - query API (pull)
//! - [`GeofenceStatusBroadcaster`] - subscription API (push)

use std::sync::Arc;

use tokio::sync::broadcast;

use super::core::GeofenceMonitor;
use super::session::MonitoringSession;
use super::state::MonitorStatus;

/// Trait for querying geofence status (pull API).
pub trait GeofenceStatusProvider: Send + Sync {
    /// Get the complete monitor status.
    fn status(&self) -> MonitorStatus;

    /// True when both a zone and a sample are present.
    fn is_monitoring(&self) -> bool;
}

/// Trait for subscribing to status changes (push API).
pub trait GeofenceStatusBroadcaster: Send + Sync {
    /// Subscribe to status snapshots, one per change.
    fn subscribe(&self) -> broadcast::Receiver<MonitorStatus>;
}

impl GeofenceStatusProvider for GeofenceMonitor {
    fn status(&self) -> MonitorStatus {
        GeofenceMonitor::status(self)
    }

    fn is_monitoring(&self) -> bool {
        GeofenceMonitor::status(self).is_monitoring()
    }
}

impl GeofenceStatusBroadcaster for GeofenceMonitor {
    fn subscribe(&self) -> broadcast::Receiver<MonitorStatus> {
        GeofenceMonitor::subscribe(self)
    }
}

impl GeofenceStatusProvider for MonitoringSession {
    fn status(&self) -> MonitorStatus {
        MonitoringSession::status(self)
    }

    fn is_monitoring(&self) -> bool {
        MonitoringSession::status(self).is_monitoring()
    }
}

impl GeofenceStatusBroadcaster for MonitoringSession {
    fn subscribe(&self) -> broadcast::Receiver<MonitorStatus> {
        MonitoringSession::subscribe(self)
    }
}

// Allow Arc-wrapped monitors and sessions at the seam
impl<T: GeofenceStatusProvider> GeofenceStatusProvider for Arc<T> {
    fn status(&self) -> MonitorStatus {
        (**self).status()
    }

    fn is_monitoring(&self) -> bool {
        (**self).is_monitoring()
    }
}

impl<T: GeofenceStatusBroadcaster> GeofenceStatusBroadcaster for Arc<T> {
    fn subscribe(&self) -> broadcast::Receiver<MonitorStatus> {
        (**self).subscribe()
    }
}
