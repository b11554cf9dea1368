//! Live location feed: sample types and the push subscription model.
//!
//! External trackers push position fixes into a realtime store; this module
//! exposes that stream through [`LocationFeed`] / [`FeedSubscription`].
//! Untrusted payloads are normalized and validated once, here at the edge
//! ([`RawLocationSample`]), so the rest of the crate only ever sees complete
//! samples with the canonical `lng` spelling.

mod subscriber;
mod types;

pub use subscriber::{FeedError, FeedEvent, FeedSubscription, LocationFeed, MemoryLocationFeed};
pub use types::{LocationSample, RawLocationSample};
