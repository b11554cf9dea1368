//! Interactive safe zone editing.
//!
//! The editor holds a draft (center + radius) while the user adjusts the
//! boundary on the map. Nothing is written until Confirm; Cancel discards
//! the draft entirely.

use thiserror::Error;

use crate::feed::LocationSample;
use crate::geo::GeoPoint;
use crate::zone::{SafeZone, StoreError, ZoneError, ZoneStore};

use super::{DEFAULT_RADIUS_M, EDITOR_MAX_RADIUS_M, EDITOR_MIN_RADIUS_M, FALLBACK_CENTER};

/// Errors from the editor workflow.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditorError {
    /// Confirm called without an active draft.
    #[error("No zone edit in progress")]
    NotEditing,

    /// The draft does not form a valid zone.
    #[error(transparent)]
    InvalidZone(#[from] ZoneError),

    /// The save failed at the store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The boundary being adjusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneDraft {
    /// Draft center. A map interaction replaces it wholesale.
    pub center: GeoPoint,

    /// Draft radius in meters, kept within the editor range.
    pub radius_m: f64,
}

/// Safe zone editor state machine: `Inactive` until [`begin`], then
/// `Editing` until [`confirm`] or [`cancel`].
///
/// [`begin`]: ZoneEditor::begin
/// [`confirm`]: ZoneEditor::confirm
/// [`cancel`]: ZoneEditor::cancel
#[derive(Debug, Default)]
pub struct ZoneEditor {
    draft: Option<ZoneDraft>,
}

impl ZoneEditor {
    /// Create an inactive editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing.
    ///
    /// The draft seeds from the existing zone when there is one, else from
    /// the pet's current location, else from the fallback center.
    pub fn begin(&mut self, existing: Option<&SafeZone>, current: Option<&LocationSample>) {
        let (center, radius_m) = match existing {
            Some(zone) => (zone.center, zone.radius_m),
            None => {
                let center = current.map_or(FALLBACK_CENTER, LocationSample::point);
                (center, DEFAULT_RADIUS_M)
            }
        };

        self.draft = Some(ZoneDraft {
            center,
            radius_m: radius_m.clamp(EDITOR_MIN_RADIUS_M, EDITOR_MAX_RADIUS_M),
        });
        tracing::debug!(lat = center.lat, lng = center.lng, "Zone edit started");
    }

    /// True while a draft is held.
    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// The current draft, if editing.
    pub fn draft(&self) -> Option<&ZoneDraft> {
        self.draft.as_ref()
    }

    /// Replace the draft center (map click or marker drag).
    ///
    /// Returns false when not editing.
    pub fn set_center(&mut self, center: GeoPoint) -> bool {
        match &mut self.draft {
            Some(draft) => {
                draft.center = center;
                true
            }
            None => false,
        }
    }

    /// Set the draft radius, clamped to the editor range.
    ///
    /// Returns false when not editing.
    pub fn set_radius(&mut self, radius_m: f64) -> bool {
        match &mut self.draft {
            Some(draft) => {
                draft.radius_m = radius_m.clamp(EDITOR_MIN_RADIUS_M, EDITOR_MAX_RADIUS_M);
                true
            }
            None => false,
        }
    }

    /// Validate the draft, persist it, and leave editing.
    ///
    /// Validation happens locally before the store is touched; an invalid
    /// draft or a failed save keeps the editor in `Editing` so the user can
    /// adjust or cancel. On success the caller is expected to refresh the
    /// monitor (see `MonitoringSession::refresh_zone`) to pick up the new
    /// boundary.
    pub async fn confirm<S: ZoneStore>(
        &mut self,
        store: &S,
        owner_id: &str,
        label: Option<String>,
    ) -> Result<SafeZone, EditorError> {
        let draft = self.draft.ok_or(EditorError::NotEditing)?;

        let mut zone = SafeZone::new(draft.center, draft.radius_m)?;
        zone.label = label;

        store.save_zone(owner_id, &zone).await?;

        tracing::info!(
            owner_id,
            radius_m = zone.radius_m,
            "Safe zone saved"
        );
        self.draft = None;
        Ok(zone)
    }

    /// Discard the draft with no writes.
    pub fn cancel(&mut self) {
        if self.draft.take().is_some() {
            tracing::debug!("Zone edit cancelled");
        }
    }
}
