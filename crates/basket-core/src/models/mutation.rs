//! Queued offline mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of change a queued mutation represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Drain order is strictly FIFO; priority is carried for hosts that replay
/// manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationPriority {
    High,
    #[default]
    Medium,
    Low,
}

/// A mutating operation captured while disconnected (or after a transient
/// write failure), persisted until the server acknowledges it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedMutation {
    pub id: String,
    pub kind: MutationKind,
    pub endpoint: String,
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
    pub retry_count: u32,
    pub max_retries: u32,
    #[serde(default)]
    pub priority: MutationPriority,
}

impl QueuedMutation {
    pub fn new(
        kind: MutationKind,
        endpoint: impl Into<String>,
        payload: serde_json::Value,
        max_retries: u32,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            endpoint: endpoint.into(),
            payload,
            enqueued_at,
            retry_count: 0,
            max_retries,
            priority: MutationPriority::default(),
        }
    }

    /// Whether another replay attempt is allowed.
    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }
}
