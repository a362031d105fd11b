//! Event publisher over a tokio broadcast channel

use super::{EventPublisher, EventType};
use crate::domain::{Result, SpaceId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 256;

/// A published event
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Unique event id
    pub id: Uuid,

    /// Space the event belongs to
    pub scope: SpaceId,

    /// Kind of event
    pub event_type: EventType,

    /// Event body
    pub payload: serde_json::Value,

    /// Publication time
    pub emitted_at: DateTime<Utc>,
}

/// In-process [`EventPublisher`]
///
/// Events published while nobody is subscribed are dropped. Slow subscribers
/// lose the oldest events once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<Event>,
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastPublisher {
    /// Create a publisher buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(
        &self,
        scope: SpaceId,
        event_type: EventType,
        payload: serde_json::Value,
    ) -> Result<()> {
        let event = Event {
            id: Uuid::new_v4(),
            scope,
            event_type,
            payload,
            emitted_at: Utc::now(),
        };

        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(scope = %scope, event_type = %event_type, receivers, "Published event");
            }
            Err(_) => {
                tracing::debug!(scope = %scope, event_type = %event_type, "No subscribers for event");
            }
        }

        Ok(())
    }
}
