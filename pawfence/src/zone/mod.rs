//! Safe zone entity, classification, and persistence.
//!
//! A safe zone is a circle (center + radius) configured once per owner
//! account. This module provides:
//!
//! - [`SafeZone`] - the entity and its invariants
//! - [`status`] - pure classification of a point against a zone
//! - [`ZoneStore`] - the accessor trait over the backing document store,
//!   with [`MemoryZoneStore`] as the in-process implementation

pub mod status;
mod store;
mod types;

pub use status::{check_zone, is_in_safe_zone, zone_status, ZoneStatus};
pub use store::{MemoryZoneStore, StoreError, ZoneStore};
pub use types::{SafeZone, ZoneError, MIN_RADIUS_M};
