//! PawFence - real-time safe zone monitoring for pet trackers.
//!
//! This library implements the geofencing core of a pet-care application:
//! it watches a pet's live location against a circular "safe zone" the owner
//! has drawn on a map, and derives breach/recovery status for the alerting
//! UI to consume.
//!
//! # Architecture
//!
//! - [`geo`] - haversine distance and coordinate validation
//! - [`zone`] - the [`SafeZone`](zone::SafeZone) entity, point-vs-zone
//!   classification, and the document-store accessor
//! - [`feed`] - push subscription to a pet's live location stream
//! - [`monitor`] - the session that ties zone + feed together and exposes
//!   derived [`MonitorStatus`](monitor::MonitorStatus)
//! - [`editor`] - the boundary-definition workflow and the debounced
//!   radius slider updates
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pawfence::feed::MemoryLocationFeed;
//! use pawfence::monitor::MonitoringSession;
//! use pawfence::zone::MemoryZoneStore;
//!
//! let store = Arc::new(MemoryZoneStore::new());
//! let feed = MemoryLocationFeed::new();
//!
//! let session = MonitoringSession::start(store, &feed, "pet-1", "owner-1");
//! let status = session.status();
//! if status.is_monitoring() && status.is_outside {
//!     println!("{}m outside the safe zone", status.distance_from_edge_m);
//! }
//! ```

pub mod editor;
pub mod feed;
pub mod geo;
pub mod logging;
pub mod monitor;
pub mod zone;

/// Version of the PawFence library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
