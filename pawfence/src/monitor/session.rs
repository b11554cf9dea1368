//! Monitoring session - wires a zone store and a location feed into the
//! monitor core.
//!
//! A session is scoped to one `(pet_id, owner_id)` pair. Starting it issues
//! the zone fetch and the feed subscription concurrently; neither blocks the
//! other, so location tracking stays available even when the zone fetch is
//! slow or failing. Switching pets means stopping the old session and
//! starting a fresh one - each session owns its own monitor, so no status
//! can bleed between entities.
//!
//! No timeout is imposed on the zone fetch: a fetch that never resolves
//! leaves the zone dimension unresolved while the feed dimension progresses
//! independently.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio::task::{AbortHandle, JoinHandle};

use crate::feed::{FeedEvent, LocationFeed};
use crate::zone::ZoneStore;

use super::core::GeofenceMonitor;
use super::state::MonitorStatus;

/// Background tasks owned by a session.
///
/// The zone fetch is tracked by its abort handle so the join handle stays
/// available to refresh callers; only the most recent fetch is live.
#[derive(Default)]
struct SessionTasks {
    zone_fetch: Option<AbortHandle>,
    feed_pump: Option<JoinHandle<()>>,
}

/// A running geofence monitoring session for one pet.
///
/// Stopping (or dropping) the session detaches the feed subscription and
/// aborts the background tasks; no events from a stopped session reach its
/// monitor afterwards.
pub struct MonitoringSession {
    monitor: Arc<GeofenceMonitor>,
    pet_id: String,
    owner_id: String,
    tasks: Mutex<SessionTasks>,
}

impl MonitoringSession {
    /// Start monitoring `pet_id` against `owner_id`'s configured zone.
    ///
    /// The feed subscription attaches synchronously before this returns; the
    /// zone fetch runs as a background task. Either may complete first - the
    /// monitor core handles both orderings.
    pub fn start<S, F>(store: Arc<S>, feed: &F, pet_id: &str, owner_id: &str) -> Self
    where
        S: ZoneStore + 'static,
        F: LocationFeed + ?Sized,
    {
        let monitor = Arc::new(GeofenceMonitor::new());

        tracing::info!(pet_id, owner_id, "Starting geofence monitoring");

        // Attach the feed first so no fix is missed while the zone loads
        let mut subscription = feed.subscribe(pet_id);
        let pump_monitor = Arc::clone(&monitor);
        let feed_pump = tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                match event {
                    FeedEvent::Update(sample) => pump_monitor.receive_sample(sample),
                    FeedEvent::Error(error) => pump_monitor.receive_feed_error(&error),
                }
            }
            tracing::debug!("Feed pump stopped");
        });

        let zone_fetch = Self::spawn_zone_fetch(store, owner_id.to_string(), Arc::clone(&monitor));

        Self {
            monitor,
            pet_id: pet_id.to_string(),
            owner_id: owner_id.to_string(),
            tasks: Mutex::new(SessionTasks {
                zone_fetch: Some(zone_fetch.abort_handle()),
                feed_pump: Some(feed_pump),
            }),
        }
    }

    /// Re-fetch the zone from the store.
    ///
    /// The monitor does not observe zone saves on its own; callers invoke
    /// this after a successful save (the editor workflow does) so the new
    /// boundary takes effect without a full restart. Returns the fetch task
    /// handle so callers can await completion when they need to.
    ///
    /// The refresh supersedes any zone fetch still in flight, and is itself
    /// covered by [`stop`](MonitoringSession::stop): a stopped session's
    /// monitor never sees a late fetch result.
    pub fn refresh_zone<S>(&self, store: Arc<S>) -> JoinHandle<()>
    where
        S: ZoneStore + 'static,
    {
        tracing::debug!(owner_id = %self.owner_id, "Refreshing safe zone");
        let fetch = Self::spawn_zone_fetch(store, self.owner_id.clone(), Arc::clone(&self.monitor));

        let mut tasks = self.tasks.lock().unwrap();
        if let Some(previous) = tasks.zone_fetch.replace(fetch.abort_handle()) {
            previous.abort();
        }
        fetch
    }

    /// Current status snapshot.
    pub fn status(&self) -> MonitorStatus {
        self.monitor.status()
    }

    /// Subscribe to pushed status snapshots.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorStatus> {
        self.monitor.subscribe()
    }

    /// The monitored pet.
    pub fn pet_id(&self) -> &str {
        &self.pet_id
    }

    /// The owner whose zone applies.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// The underlying monitor core.
    pub fn monitor(&self) -> &Arc<GeofenceMonitor> {
        &self.monitor
    }

    /// Tear the session down. Idempotent.
    ///
    /// Aborting the feed pump drops its subscription, which detaches the
    /// listener; aborting the zone fetch covers both the startup fetch and
    /// any pending refresh. Stale events can no longer reach this session's
    /// monitor.
    pub fn stop(&self) {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(pump) = tasks.feed_pump.take() {
            pump.abort();
            tracing::info!(pet_id = %self.pet_id, "Stopped geofence monitoring");
        }
        if let Some(fetch) = tasks.zone_fetch.take() {
            fetch.abort();
        }
    }

    fn spawn_zone_fetch<S>(
        store: Arc<S>,
        owner_id: String,
        monitor: Arc<GeofenceMonitor>,
    ) -> JoinHandle<()>
    where
        S: ZoneStore + 'static,
    {
        tokio::spawn(async move {
            match store.get_zone(&owner_id).await {
                Ok(zone) => monitor.receive_zone(zone),
                Err(error) => monitor.receive_zone_error(&error),
            }
        })
    }
}

impl Drop for MonitoringSession {
    fn drop(&mut self) {
        self.stop();
    }
}
