//! Live location feed subscription.
//!
//! The feed is push-based: subscribing to a pet's location opens a long-lived
//! channel that delivers [`FeedEvent`]s in arrival order until the handle is
//! dropped or [`FeedSubscription::unsubscribe`] is called. No deduplication
//! is performed; identical consecutive fixes are all delivered.
//!
//! [`MemoryLocationFeed`] is the in-process implementation, mirroring the
//! semantics of a push-capable realtime store: every new subscriber
//! immediately receives the current value, which is the cached last payload
//! or "no location yet" for a pet that has never reported.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tokio::sync::mpsc;

use super::types::{LocationSample, RawLocationSample};

/// Transport errors surfaced by the feed.
///
/// An error does not close the logical subscription; the consumer decides
/// whether to keep listening or tear down.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeedError {
    /// Transport failure (connection lost, backend unreachable).
    #[error("Location feed unavailable: {0}")]
    Unavailable(String),

    /// The caller may not read this pet's location.
    #[error("Permission denied for pet {0}")]
    PermissionDenied(String),
}

/// One delivery from the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A location change. `None` means the pet has no location yet, which is
    /// a valid initial state rather than an error.
    Update(Option<LocationSample>),

    /// Transport or permission failure.
    Error(FeedError),
}

/// Source of live pet locations.
pub trait LocationFeed: Send + Sync {
    /// Open a live subscription to the pet's current location.
    ///
    /// An initial update carrying the current value is delivered right away:
    /// the last known sample, or `Update(None)` when the pet has never
    /// reported. Further updates may arrive in rapid succession; delivery is
    /// in arrival order.
    fn subscribe(&self, pet_id: &str) -> FeedSubscription;
}

/// Handle to an open feed subscription.
///
/// Dropping the handle detaches the listener. After [`unsubscribe`] (or
/// drop), no further events are delivered, even if the underlying feed keeps
/// emitting.
///
/// [`unsubscribe`]: FeedSubscription::unsubscribe
pub struct FeedSubscription {
    events: mpsc::UnboundedReceiver<FeedEvent>,
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl FeedSubscription {
    /// Build a subscription from a delivery channel and a teardown action.
    ///
    /// Feed implementations call this; consumers receive the handle from
    /// [`LocationFeed::subscribe`].
    pub fn new(
        events: mpsc::UnboundedReceiver<FeedEvent>,
        detach: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            events,
            detach: Some(Box::new(detach)),
        }
    }

    /// Await the next event, or `None` once unsubscribed.
    ///
    /// Events that were still in flight when [`unsubscribe`] ran are
    /// discarded, never delivered late.
    ///
    /// [`unsubscribe`]: FeedSubscription::unsubscribe
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        if self.detach.is_none() {
            return None;
        }
        self.events.recv().await
    }

    /// Detach the listener. Idempotent: calling twice is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
            self.events.close();
            // Drain anything that raced in before the detach took effect
            while self.events.try_recv().is_ok() {}
        }
    }

    /// True until [`unsubscribe`](FeedSubscription::unsubscribe) is called.
    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Per-pet topic state inside [`MemoryLocationFeed`].
#[derive(Default)]
struct Topic {
    /// Cached last sample. `None` covers both "never reported" and an
    /// explicit "no location" payload; subscribers see it as `Update(None)`
    /// either way, the same as an absent node in a realtime database.
    last: Option<LocationSample>,

    /// Live subscriber channels keyed by subscription id.
    subscribers: HashMap<u64, mpsc::UnboundedSender<FeedEvent>>,
}

/// In-process push feed with current-value replay.
///
/// Producers call [`publish`](MemoryLocationFeed::publish) (trusted samples)
/// or [`publish_raw`](MemoryLocationFeed::publish_raw) (untrusted payloads,
/// validated at this edge). Every subscriber immediately receives the current
/// value, matching realtime-database semantics: the cached last sample, or
/// `Update(None)` for a pet with no location on record.
#[derive(Default)]
pub struct MemoryLocationFeed {
    topics: Arc<RwLock<HashMap<String, Topic>>>,
    next_id: AtomicU64,
}

impl MemoryLocationFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new payload to all subscribers of `pet_id` and cache it.
    ///
    /// `None` represents "no location available", delivered as a valid
    /// update.
    pub fn publish(&self, pet_id: &str, sample: Option<LocationSample>) {
        let mut topics = self.topics.write().unwrap();
        let topic = topics.entry(pet_id.to_string()).or_default();
        topic.last = sample.clone();
        Self::deliver(topic, FeedEvent::Update(sample));
    }

    /// Push an untrusted payload, validating it at this boundary.
    ///
    /// A JSON `null` is a valid "no location" update. A payload missing
    /// either coordinate is dropped with a warning and returns `false`; it
    /// never reaches subscribers, so a partial fix cannot be misread as a
    /// position at (0, 0).
    pub fn publish_raw(&self, pet_id: &str, payload: serde_json::Value) -> bool {
        if payload.is_null() {
            self.publish(pet_id, None);
            return true;
        }

        let sample = serde_json::from_value::<RawLocationSample>(payload.clone())
            .ok()
            .and_then(RawLocationSample::validate);

        match sample {
            Some(sample) => {
                self.publish(pet_id, Some(sample));
                true
            }
            None => {
                tracing::warn!(pet_id, %payload, "Dropping invalid location payload");
                false
            }
        }
    }

    /// Deliver a transport error to all subscribers of `pet_id`.
    ///
    /// Does not alter the cached last value or close subscriptions.
    pub fn emit_error(&self, pet_id: &str, error: FeedError) {
        let mut topics = self.topics.write().unwrap();
        let topic = topics.entry(pet_id.to_string()).or_default();
        Self::deliver(topic, FeedEvent::Error(error));
    }

    /// Number of live subscribers for `pet_id`.
    pub fn subscriber_count(&self, pet_id: &str) -> usize {
        self.topics
            .read()
            .unwrap()
            .get(pet_id)
            .map_or(0, |topic| topic.subscribers.len())
    }

    fn deliver(topic: &mut Topic, event: FeedEvent) {
        // Prune subscribers whose receiving end has gone away
        topic
            .subscribers
            .retain(|_, tx| tx.send(event.clone()).is_ok());
    }
}

impl LocationFeed for MemoryLocationFeed {
    fn subscribe(&self, pet_id: &str) -> FeedSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        {
            let mut topics = self.topics.write().unwrap();
            let topic = topics.entry(pet_id.to_string()).or_default();

            // Deliver the current value so every subscriber starts from a
            // known state instead of waiting for the next fix. A pet that has
            // never reported yields Update(None), which clears the monitor's
            // loading flag without implying a position.
            let _ = tx.send(FeedEvent::Update(topic.last.clone()));

            topic.subscribers.insert(id, tx);
        }

        tracing::debug!(pet_id, subscription_id = id, "Location feed subscribed");

        let topics = Arc::clone(&self.topics);
        let pet = pet_id.to_string();
        FeedSubscription::new(rx, move || {
            if let Some(topic) = topics.write().unwrap().get_mut(&pet) {
                topic.subscribers.remove(&id);
            }
            tracing::debug!(pet_id = %pet, subscription_id = id, "Location feed unsubscribed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let feed = MemoryLocationFeed::new();
        let mut sub = feed.subscribe("pet-1");
        assert_eq!(sub.recv().await, Some(FeedEvent::Update(None)));

        feed.publish("pet-1", Some(LocationSample::new(33.6853, 73.0479)));

        match sub.recv().await {
            Some(FeedEvent::Update(Some(sample))) => assert_eq!(sample.lat, 33.6853),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_virgin_topic_delivers_no_location_immediately() {
        let feed = MemoryLocationFeed::new();
        let mut sub = feed.subscribe("pet-never-seen");

        // No publish has ever happened; the current value is still delivered
        assert_eq!(sub.recv().await, Some(FeedEvent::Update(None)));
    }

    #[tokio::test]
    async fn test_cached_last_value_replayed_on_subscribe() {
        let feed = MemoryLocationFeed::new();
        feed.publish("pet-1", Some(LocationSample::new(1.0, 2.0)));

        let mut sub = feed.subscribe("pet-1");
        match sub.recv().await {
            Some(FeedEvent::Update(Some(sample))) => assert_eq!(sample.lat, 1.0),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_null_payload_is_a_valid_update() {
        let feed = MemoryLocationFeed::new();
        feed.publish("pet-1", Some(LocationSample::new(1.0, 2.0)));

        let mut sub = feed.subscribe("pet-1");
        assert!(matches!(
            sub.recv().await,
            Some(FeedEvent::Update(Some(_)))
        ));

        // An explicit null clears the cached fix
        assert!(feed.publish_raw("pet-1", serde_json::Value::Null));
        assert_eq!(sub.recv().await, Some(FeedEvent::Update(None)));
    }

    #[tokio::test]
    async fn test_invalid_payloads_are_dropped() {
        let feed = MemoryLocationFeed::new();
        let mut sub = feed.subscribe("pet-1");
        assert_eq!(sub.recv().await, Some(FeedEvent::Update(None)));

        assert!(!feed.publish_raw("pet-1", json!({})));
        assert!(!feed.publish_raw("pet-1", json!({"lat": 5.0})));

        // A valid payload afterwards is the first thing delivered
        assert!(feed.publish_raw("pet-1", json!({"lat": 1.0, "lng": 2.0})));
        match sub.recv().await {
            Some(FeedEvent::Update(Some(sample))) => assert_eq!(sample.lng, 2.0),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_events_arrive_in_order_without_dedup() {
        let feed = MemoryLocationFeed::new();
        let mut sub = feed.subscribe("pet-1");
        assert_eq!(sub.recv().await, Some(FeedEvent::Update(None)));

        let fix = LocationSample::new(1.0, 2.0);
        feed.publish("pet-1", Some(fix.clone()));
        feed.publish("pet-1", Some(fix.clone())); // identical, still delivered
        feed.publish("pet-1", Some(LocationSample::new(3.0, 4.0)));

        for expected_lat in [1.0, 1.0, 3.0] {
            match sub.recv().await {
                Some(FeedEvent::Update(Some(sample))) => assert_eq!(sample.lat, expected_lat),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent_and_final() {
        let feed = MemoryLocationFeed::new();
        let mut sub = feed.subscribe("pet-1");
        assert_eq!(feed.subscriber_count("pet-1"), 1);

        sub.unsubscribe();
        sub.unsubscribe(); // second call must not panic or double-detach
        assert!(!sub.is_active());
        assert_eq!(feed.subscriber_count("pet-1"), 0);

        // The feed keeps emitting, but nothing reaches the dead handle
        feed.publish("pet-1", Some(LocationSample::new(1.0, 2.0)));
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_buffered_events_not_delivered_after_unsubscribe() {
        let feed = MemoryLocationFeed::new();
        let mut sub = feed.subscribe("pet-1");

        feed.publish("pet-1", Some(LocationSample::new(1.0, 2.0)));
        sub.unsubscribe();

        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_drop_detaches() {
        let feed = MemoryLocationFeed::new();
        let sub = feed.subscribe("pet-1");
        assert_eq!(feed.subscriber_count("pet-1"), 1);

        drop(sub);
        assert_eq!(feed.subscriber_count("pet-1"), 0);
    }

    #[tokio::test]
    async fn test_error_does_not_close_subscription() {
        let feed = MemoryLocationFeed::new();
        let mut sub = feed.subscribe("pet-1");
        assert_eq!(sub.recv().await, Some(FeedEvent::Update(None)));

        feed.emit_error("pet-1", FeedError::Unavailable("blip".into()));
        feed.publish("pet-1", Some(LocationSample::new(1.0, 2.0)));

        assert!(matches!(sub.recv().await, Some(FeedEvent::Error(_))));
        assert!(matches!(
            sub.recv().await,
            Some(FeedEvent::Update(Some(_)))
        ));
    }

    #[tokio::test]
    async fn test_topics_are_isolated() {
        let feed = MemoryLocationFeed::new();
        let mut sub_a = feed.subscribe("pet-a");
        let mut sub_b = feed.subscribe("pet-b");
        assert_eq!(sub_a.recv().await, Some(FeedEvent::Update(None)));

        feed.publish("pet-a", Some(LocationSample::new(1.0, 2.0)));

        assert!(matches!(
            sub_a.recv().await,
            Some(FeedEvent::Update(Some(_)))
        ));
        sub_b.unsubscribe();
        assert_eq!(sub_b.recv().await, None);
    }
}
