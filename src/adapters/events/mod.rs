//! Completion notifications
//!
//! Events are scoped to a space so listeners can follow one space's exports.

pub mod broadcast;

pub use broadcast::{BroadcastPublisher, Event};

use crate::domain::{Result, SpaceId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of events published by Gitport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// An export job reached a terminal state after touching the remote host
    RepositoryExportCompleted,
}

impl EventType {
    /// Wire name of the event type
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::RepositoryExportCompleted => "repository_export_completed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification bus
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes `payload` to listeners of `scope`
    async fn publish(
        &self,
        scope: SpaceId,
        event_type: EventType,
        payload: serde_json::Value,
    ) -> Result<()>;
}
