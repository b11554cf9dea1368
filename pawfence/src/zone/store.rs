//! Zone store accessor.
//!
//! Loads and saves the single safe zone configured per owner account. The
//! backing store is a document database supporting point reads and
//! merge-upserts by key; [`ZoneStore`] abstracts over it so the monitor and
//! editor can be tested against an in-process implementation.
//!
//! A missing zone is returned as `Ok(None)`, never as an error: "no zone
//! configured" is a common, legitimate state. Errors are reserved for
//! transport and data failures.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::geo::GeoPoint;

use super::types::{SafeZone, ZoneError};

/// Document field holding the safe zone inside an owner document.
const ZONE_FIELD: &str = "safeZone";

/// Errors from the zone store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// Transport-level failure (network, timeout). Retrievable; distinct from
    /// a legitimately absent zone.
    #[error("Zone store unavailable: {0}")]
    Unavailable(String),

    /// The caller is not allowed to read or write this owner's document.
    #[error("Permission denied for owner {0}")]
    PermissionDenied(String),

    /// The stored document exists but does not parse as a safe zone.
    #[error("Malformed zone document: {0}")]
    Malformed(String),

    /// Refused to persist an invalid zone.
    #[error("Refusing to save invalid zone: {0}")]
    InvalidZone(#[from] ZoneError),
}

/// Accessor for the per-owner safe zone document.
///
/// Implementations perform the actual I/O; both operations must be safe to
/// call repeatedly in quick succession (live slider dragging produces bursts
/// of saves, each an independent overwrite of the same field).
pub trait ZoneStore: Send + Sync {
    /// Fetch the owner's configured zone, or `None` if never configured.
    fn get_zone(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Option<SafeZone>, StoreError>> + Send;

    /// Merge-upsert the zone field of the owner document.
    ///
    /// Only the zone field is written; other fields of the owner document are
    /// untouched. `updated_at` is refreshed to the current time as part of
    /// the same write.
    fn save_zone(
        &self,
        owner_id: &str,
        zone: &SafeZone,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Wire shape of the zone document.
///
/// Decoupled from [`SafeZone`] so the stored field names (`petName`,
/// `updatedAt`, `lon` tolerated for `lng`) stay a boundary concern.
#[derive(Debug, Serialize, Deserialize)]
struct ZoneDocument {
    lat: f64,
    #[serde(alias = "lon")]
    lng: f64,
    radius: f64,
    #[serde(rename = "petName", default, skip_serializing_if = "Option::is_none")]
    pet_name: Option<String>,
    #[serde(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

impl ZoneDocument {
    fn from_zone(zone: &SafeZone, updated_at: DateTime<Utc>) -> Self {
        Self {
            lat: zone.center.lat,
            lng: zone.center.lng,
            radius: zone.radius_m,
            pet_name: zone.label.clone(),
            updated_at,
        }
    }

    fn into_zone(self) -> Result<SafeZone, StoreError> {
        let center = GeoPoint::new(self.lat, self.lng)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        let zone = SafeZone {
            center,
            radius_m: self.radius,
            label: self.pet_name,
            updated_at: self.updated_at,
        };
        zone.validate()
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(zone)
    }
}

/// In-process zone store over JSON owner documents.
///
/// Reference implementation of the document-store contract: point read and
/// merge-upsert by owner key. Used directly by tests and local development;
/// production deployments substitute a remote store behind the same trait.
#[derive(Default)]
pub struct MemoryZoneStore {
    documents: Arc<RwLock<HashMap<String, Value>>>,
    fault: Mutex<Option<StoreError>>,
    saves: AtomicUsize,
}

impl MemoryZoneStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw owner document, bypassing validation.
    ///
    /// Lets tests seed documents with legacy spellings (`lon`) or unrelated
    /// fields alongside the zone.
    pub fn insert_raw_document(&self, owner_id: &str, document: Value) {
        self.documents
            .write()
            .unwrap()
            .insert(owner_id.to_string(), document);
    }

    /// Read back the full owner document.
    pub fn document(&self, owner_id: &str) -> Option<Value> {
        self.documents.read().unwrap().get(owner_id).cloned()
    }

    /// Inject a fault: until cleared, both operations fail with this error.
    pub fn set_fault(&self, fault: Option<StoreError>) {
        *self.fault.lock().unwrap() = fault;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check_fault(&self) -> Result<(), StoreError> {
        match &*self.fault.lock().unwrap() {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }
}

impl ZoneStore for MemoryZoneStore {
    async fn get_zone(&self, owner_id: &str) -> Result<Option<SafeZone>, StoreError> {
        self.check_fault()?;

        let documents = self.documents.read().unwrap();
        let Some(field) = documents.get(owner_id).and_then(|doc| doc.get(ZONE_FIELD)) else {
            return Ok(None);
        };

        let document: ZoneDocument = serde_json::from_value(field.clone())
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        document.into_zone().map(Some)
    }

    async fn save_zone(&self, owner_id: &str, zone: &SafeZone) -> Result<(), StoreError> {
        self.check_fault()?;
        zone.validate()?;

        let document = ZoneDocument::from_zone(zone, Utc::now());
        let value =
            serde_json::to_value(&document).map_err(|e| StoreError::Malformed(e.to_string()))?;

        let mut documents = self.documents.write().unwrap();
        let entry = documents
            .entry(owner_id.to_string())
            .or_insert_with(|| Value::Object(Default::default()));

        match entry.as_object_mut() {
            Some(fields) => {
                fields.insert(ZONE_FIELD.to_string(), value);
            }
            None => {
                return Err(StoreError::Malformed(format!(
                    "owner document for {owner_id} is not an object"
                )))
            }
        }

        self.saves.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(owner_id, radius_m = zone.radius_m, "Safe zone saved");
        Ok(())
    }
}
