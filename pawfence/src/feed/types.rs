//! Location sample types and raw-payload normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A single position fix for a tracked pet.
///
/// Transient: the feed owns the data and the monitor holds only the most
/// recent sample in memory. Coordinates are not range-validated here; the
/// feed boundary guarantees both are present, and classification tolerates
/// out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    #[serde(alias = "lon")]
    pub lng: f64,

    /// Producer-assigned time of fix, if the tracker reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LocationSample {
    /// Create a sample timestamped now.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            timestamp: Some(Utc::now()),
        }
    }

    /// The sample's position as a [`GeoPoint`].
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Untrusted payload as it arrives from the feed transport.
///
/// Either coordinate may be missing; [`RawLocationSample::validate`] is the
/// single place where partial payloads are rejected, so a missing `lng` can
/// never be misread as a zero-distance move or a fix at (0, 0). `lon` and
/// `lastUpdated` spellings are normalized here too.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawLocationSample {
    /// Latitude in degrees, if the payload carried one.
    pub lat: Option<f64>,

    /// Longitude in degrees, if the payload carried one. The `lon` spelling
    /// is accepted.
    #[serde(alias = "lon")]
    pub lng: Option<f64>,

    /// Producer-assigned time of fix. The `lastUpdated` spelling is accepted.
    #[serde(default, alias = "lastUpdated")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawLocationSample {
    /// Promote to a [`LocationSample`] if both coordinates are present and
    /// finite; otherwise `None`.
    pub fn validate(self) -> Option<LocationSample> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(LocationSample {
                lat,
                lng,
                timestamp: self.timestamp,
            }),
            _ => None,
        }
    }
}
