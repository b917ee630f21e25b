//! Offline mutation queue.
//!
//! Mutations issued while disconnected (or after a transient write failure)
//! are persisted here and replayed in FIFO order once connectivity returns.
//! The queue survives a full page reload: it is rehydrated from the durable
//! store before anything can enqueue.

use chrono::{DateTime, Utc};

use basket_core::config::QueueConfig;
use basket_core::errors::{GatewayError, SyncError};
use basket_core::models::{MutationKind, QueuedMutation};
use basket_core::traits::{Notice, NoticeLevel, Notifier};
use basket_storage::{keys, StoreHandle};

/// Outcome of one drain cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Mutations acknowledged by the server and removed.
    pub succeeded: usize,
    /// Mutations that failed and were re-enqueued at the tail.
    pub requeued: usize,
    /// Mutations dropped permanently after exhausting their retry budget.
    pub dropped: usize,
}

pub struct OfflineQueue {
    store: StoreHandle,
    config: QueueConfig,
    mutations: Vec<QueuedMutation>,
}

impl OfflineQueue {
    /// Rehydrate the queue from storage. A corrupt document is discarded
    /// with a log line; queued work is best-effort by nature and must never
    /// block startup.
    pub fn new(store: StoreHandle, config: QueueConfig) -> Self {
        let mutations = match store.get_json::<Vec<QueuedMutation>>(keys::OFFLINE_QUEUE) {
            Ok(Some(mutations)) => mutations,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("queue: discarding corrupt queue: {e}");
                Vec::new()
            }
        };
        if !mutations.is_empty() {
            tracing::info!(pending = mutations.len(), "queue: rehydrated");
        }
        Self {
            store,
            config,
            mutations,
        }
    }

    /// Capture a mutation for later replay.
    pub fn enqueue(
        &mut self,
        kind: MutationKind,
        endpoint: impl Into<String>,
        payload: serde_json::Value,
        now: DateTime<Utc>,
    ) -> &QueuedMutation {
        let mutation = QueuedMutation::new(kind, endpoint, payload, self.config.max_retries, now);
        tracing::info!(id = %mutation.id, kind = %mutation.kind, endpoint = %mutation.endpoint, "queue: enqueued");
        self.mutations.push(mutation);
        self.persist();
        self.mutations.last().expect("just pushed")
    }

    /// One drain cycle over a snapshot of the current queue, in FIFO order.
    /// Mutations enqueued while draining (including re-enqueued failures)
    /// wait for the next cycle.
    pub fn drain(
        &mut self,
        mut replay: impl FnMut(&QueuedMutation) -> Result<(), GatewayError>,
        notifier: &mut dyn Notifier,
    ) -> DrainReport {
        if self.mutations.is_empty() {
            return DrainReport::default();
        }

        let batch = std::mem::take(&mut self.mutations);
        tracing::info!(pending = batch.len(), "queue: draining");
        let mut report = DrainReport::default();

        for mut mutation in batch {
            match replay(&mutation) {
                Ok(()) => {
                    tracing::debug!(id = %mutation.id, "queue: synced");
                    report.succeeded += 1;
                }
                Err(e) => {
                    mutation.retry_count += 1;
                    if mutation.can_retry() {
                        tracing::debug!(
                            id = %mutation.id,
                            retry = mutation.retry_count,
                            max = mutation.max_retries,
                            "queue: replay failed, re-enqueueing: {e}"
                        );
                        self.mutations.push(mutation);
                        report.requeued += 1;
                    } else {
                        let dropped = SyncError::MutationDropped {
                            id: mutation.id.clone(),
                            kind: mutation.kind.to_string(),
                            endpoint: mutation.endpoint.clone(),
                            attempts: mutation.retry_count,
                        };
                        tracing::warn!("queue: {dropped}: {e}");
                        notifier.notify(Notice::new(
                            NoticeLevel::Error,
                            "Sync Failed",
                            format!(
                                "Failed to sync action: {} {}",
                                mutation.kind, mutation.endpoint
                            ),
                        ));
                        report.dropped += 1;
                    }
                }
            }
        }

        self.persist();
        report
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn pending(&self) -> &[QueuedMutation] {
        &self.mutations
    }

    /// Enqueue time of the oldest pending mutation.
    pub fn oldest_enqueued_at(&self) -> Option<DateTime<Utc>> {
        self.mutations.iter().map(|m| m.enqueued_at).min()
    }

    /// Drop everything, pending work included.
    pub fn clear(&mut self) {
        self.mutations.clear();
        self.store.remove(keys::OFFLINE_QUEUE);
    }

    fn persist(&self) {
        if let Err(e) = self.store.set_json(keys::OFFLINE_QUEUE, &self.mutations) {
            tracing::warn!("queue: persist failed: {e}");
        }
    }
}

impl std::fmt::Debug for OfflineQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineQueue")
            .field("pending", &self.mutations.len())
            .finish()
    }
}
