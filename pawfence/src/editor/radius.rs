//! Debounced radius-only zone updates.
//!
//! Dragging the radius slider produces a burst of values; saving each one
//! would amplify writes for no benefit. [`RadiusSaver`] runs a small daemon
//! that absorbs the burst and persists exactly one merged save carrying the
//! final value once the slider has been quiet for the debounce interval.
//!
//! This is a write-amplification optimization, not a correctness
//! requirement: every save is an independent overwrite of the zone field.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::zone::{SafeZone, ZoneStore};

use super::{SLIDER_MAX_RADIUS_M, SLIDER_MIN_RADIUS_M};

/// Configuration for the debounced saver.
#[derive(Debug, Clone)]
pub struct RadiusSaverConfig {
    /// Quiet period before a pending radius is persisted.
    pub debounce: Duration,

    /// Lower clamp for incoming radius values, meters.
    pub min_radius_m: f64,

    /// Upper clamp for incoming radius values, meters.
    pub max_radius_m: f64,
}

impl Default for RadiusSaverConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(1),
            min_radius_m: SLIDER_MIN_RADIUS_M,
            max_radius_m: SLIDER_MAX_RADIUS_M,
        }
    }
}

/// Debounced radius-only updater for an already-saved zone.
///
/// Feed it radius values as fast as the slider emits them; it saves the last
/// one after the quiet period. Call [`finish`](RadiusSaver::finish) to flush
/// any pending value and stop the daemon.
pub struct RadiusSaver {
    radius_tx: mpsc::UnboundedSender<f64>,
    task: JoinHandle<()>,
}

impl RadiusSaver {
    /// Start the saver daemon for `owner_id`'s zone.
    ///
    /// `zone` is the currently saved zone; only its radius changes, and the
    /// full zone object is sent on every save.
    pub fn start<S>(store: Arc<S>, owner_id: &str, zone: SafeZone, config: RadiusSaverConfig) -> Self
    where
        S: ZoneStore + 'static,
    {
        let (radius_tx, radius_rx) = mpsc::unbounded_channel();
        let owner_id = owner_id.to_string();
        let task = tokio::spawn(run(store, owner_id, zone, config, radius_rx));
        Self { radius_tx, task }
    }

    /// Queue a radius change. Returns false once the daemon has stopped.
    pub fn set_radius(&self, radius_m: f64) -> bool {
        self.radius_tx.send(radius_m).is_ok()
    }

    /// Flush any pending value and stop.
    pub async fn finish(self) {
        let Self { radius_tx, task } = self;
        drop(radius_tx);
        let _ = task.await;
    }
}

/// Daemon loop: absorb bursts, save once per quiet period.
async fn run<S>(
    store: Arc<S>,
    owner_id: String,
    mut zone: SafeZone,
    config: RadiusSaverConfig,
    mut radius_rx: mpsc::UnboundedReceiver<f64>,
) where
    S: ZoneStore + 'static,
{
    while let Some(first) = radius_rx.recv().await {
        let mut pending = first;
        let mut closed = false;

        // Keep absorbing until the slider goes quiet (or the handle is gone)
        loop {
            match tokio::time::timeout(config.debounce, radius_rx.recv()).await {
                Ok(Some(next)) => pending = next,
                Ok(None) => {
                    closed = true;
                    break;
                }
                Err(_) => break,
            }
        }

        let radius_m = pending.clamp(config.min_radius_m, config.max_radius_m);
        let update = SafeZone {
            radius_m,
            updated_at: Utc::now(),
            ..zone.clone()
        };

        match store.save_zone(&owner_id, &update).await {
            Ok(()) => {
                tracing::info!(owner_id = %owner_id, radius_m, "Safe zone radius updated");
                zone = update;
            }
            Err(error) => {
                tracing::warn!(owner_id = %owner_id, error = %error, "Radius save failed");
            }
        }

        if closed {
            break;
        }
    }

    tracing::debug!(owner_id = %owner_id, "Radius saver stopped");
}
