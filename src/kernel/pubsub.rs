//! In-process pub/sub bus for real-time fanout.
//!
//! Topic-keyed broadcast channels connecting mutation resolvers to open
//! GraphQL subscriptions. Topics are opaque strings (the domain event
//! modules define the constants); every subscriber of a topic receives
//! every publish and applies its own delivery predicate locally.
//!
//! # Usage
//!
//! Producers (mutation resolvers):
//!   pubsub.publish_event(topics::MESSAGE_SENT, &MessageSent { message }).await;
//!
//! Consumers (subscription resolvers):
//!   let rx = pubsub.subscribe(topics::MESSAGE_SENT).await;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tracing::error;

/// Topic-keyed in-process pub/sub bus.
///
/// Thread-safe, cloneable. Payloads are `serde_json::Value`; domains
/// serialize their own event types.
#[derive(Clone)]
pub struct PubSub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<serde_json::Value>>>>,
    capacity: usize,
}

impl PubSub {
    /// Create a bus with default capacity (256 events per topic).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a bus with the given per-topic channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish a JSON payload to a topic. No-op if nobody is subscribed.
    pub async fn publish(&self, topic: &str, payload: serde_json::Value) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(topic) {
            // Ignore send errors (all receivers already dropped)
            let _ = tx.send(payload);
        }
    }

    /// Serialize a domain event and publish it to a topic.
    ///
    /// Serialization failures are logged and swallowed: a publish happens
    /// after the mutation's writes have committed, and delivery is
    /// best-effort by design.
    pub async fn publish_event<E: Serialize>(&self, topic: &str, event: &E) {
        match serde_json::to_value(event) {
            Ok(payload) => self.publish(topic, payload).await,
            Err(e) => error!(topic, error = %e, "Failed to serialize event payload"),
        }
    }

    /// Subscribe to a topic, creating its channel on first use.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<serde_json::Value> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Remove topics with zero subscribers (housekeeping).
    pub async fn cleanup(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new()
    }
}
