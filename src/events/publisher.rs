//! # Lifecycle Event Publisher
//!
//! Broadcast channel for engine lifecycle events (`task.created`,
//! `step.completed`, `event.approved`, ...). Publication is fire-and-forget:
//! a send with no subscribers is a success, and a slow subscriber lagging
//! behind the channel capacity drops its own backlog, never the publisher.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;

/// A lifecycle event as seen by subscribers.
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    /// Event name from [`crate::constants::events`]
    pub name: String,
    /// Structured payload, shape depends on the event
    pub payload: Value,
    pub occurred_at: DateTime<Utc>,
}

/// Clonable handle publishing lifecycle events to any number of subscribers.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Infallible by design: no subscribers is fine.
    pub fn publish(&self, name: &str, payload: Value) {
        let event = LifecycleEvent {
            name: name.to_string(),
            payload,
            occurred_at: Utc::now(),
        };
        // send() errors only when there are no receivers
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let publisher = EventPublisher::new(8);
        let mut rx = publisher.subscribe();

        publisher.publish("task.created", json!({"task_uuid": "x"}));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "task.created");
        assert_eq!(event.payload["task_uuid"], "x");
    }

    #[test]
    fn publish_without_subscribers_is_ok() {
        let publisher = EventPublisher::new(8);
        publisher.publish("task.created", json!({}));
        assert_eq!(publisher.subscriber_count(), 0);
    }
}
