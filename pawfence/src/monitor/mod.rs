//! Real-time geofence monitoring.
//!
//! This module orchestrates the zone store and the location feed: a
//! [`MonitoringSession`] loads the owner's safe zone and subscribes to the
//! pet's live location concurrently, the [`GeofenceMonitor`] core
//! re-classifies on every input, and consumers read the derived
//! [`MonitorStatus`] through the provider traits.
//!
//! # Lifecycle
//!
//! ```ignore
//! use pawfence::monitor::MonitoringSession;
//!
//! let session = MonitoringSession::start(store, &feed, "pet-1", "owner-1");
//!
//! let mut rx = session.subscribe();
//! while let Ok(status) = rx.recv().await {
//!     if status.is_monitoring() && status.is_outside {
//!         // show breach UI
//!     }
//! }
//!
//! session.stop();
//! ```
//!
//! A transient store or feed failure surfaces on [`MonitorStatus::error`]
//! without clearing the last known zone, sample, or breach flag.

mod core;
mod provider;
mod session;
mod state;

pub use self::core::GeofenceMonitor;
pub use provider::{GeofenceStatusBroadcaster, GeofenceStatusProvider};
pub use session::MonitoringSession;
pub use state::{MonitorPhase, MonitorStatus};
