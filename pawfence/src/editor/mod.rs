//! Zone editor workflow.
//!
//! Two write paths share the zone shape:
//!
//! - [`ZoneEditor`] - full boundary definition (pick center, pick radius,
//!   confirm or cancel)
//! - [`RadiusSaver`] - radius-only live adjustment with debounced saves
//!
//! Both validate locally before touching the store, and both leave the
//! monitor untouched: after a successful save the caller refreshes the
//! monitoring session explicitly.

mod draft;
mod radius;

pub use draft::{EditorError, ZoneDraft, ZoneEditor};
pub use radius::{RadiusSaver, RadiusSaverConfig};

use crate::geo::GeoPoint;

/// Draft center when neither a saved zone nor a live location exists.
pub const FALLBACK_CENTER: GeoPoint = GeoPoint {
    lat: 33.6844,
    lng: 73.0479,
};

/// Default draft radius for a brand-new zone, meters.
pub const DEFAULT_RADIUS_M: f64 = 100.0;

/// Radius range for the creation editor, meters.
pub const EDITOR_MIN_RADIUS_M: f64 = 10.0;
pub const EDITOR_MAX_RADIUS_M: f64 = 500.0;

/// Radius range for the live monitoring slider, meters.
pub const SLIDER_MIN_RADIUS_M: f64 = 50.0;
pub const SLIDER_MAX_RADIUS_M: f64 = 2000.0;

/// Quick-select radius presets offered alongside the slider, meters.
pub const RADIUS_PRESETS: [f64; 6] = [100.0, 200.0, 300.0, 500.0, 1000.0, 2000.0];
