//! Persisted log of normalized errors.
//!
//! Keeps the most recent entries under [`crate::keys::ERROR_LOG`] and raises
//! a user-visible notice for anything above `Low` severity.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use basket_core::traits::{Clock, Notice, NoticeLevel, Notifier};

use crate::keys;
use crate::StoreHandle;

/// Last N errors retained.
const MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub context: Option<String>,
    pub severity: ErrorSeverity,
    pub resolved: bool,
}

/// Bounded, persisted error history. Newest entries first.
pub struct ErrorLog {
    store: StoreHandle,
    clock: Rc<dyn Clock>,
    entries: Vec<ErrorLogEntry>,
}

impl ErrorLog {
    /// Rehydrate from storage. A corrupt log is discarded silently — the
    /// error log must never itself become a source of user-facing errors.
    pub fn new(store: StoreHandle, clock: Rc<dyn Clock>) -> Self {
        let entries = match store.get_json::<Vec<ErrorLogEntry>>(keys::ERROR_LOG) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("error_log: discarding corrupt log: {e}");
                Vec::new()
            }
        };
        Self {
            store,
            clock,
            entries,
        }
    }

    /// Record an error and notify the user according to severity. `Low`
    /// severity entries are logged but stay silent.
    pub fn log(
        &mut self,
        message: impl Into<String>,
        context: Option<String>,
        severity: ErrorSeverity,
        notifier: &mut dyn Notifier,
    ) -> &ErrorLogEntry {
        let entry = ErrorLogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: self.clock.now(),
            message: message.into(),
            context,
            severity,
            resolved: false,
        };
        tracing::debug!(severity = ?severity, "error_log: {}", entry.message);

        match severity {
            ErrorSeverity::Low => {}
            ErrorSeverity::Medium => notifier.notify(Notice::new(
                NoticeLevel::Warning,
                "Warning",
                entry.message.clone(),
            )),
            ErrorSeverity::High | ErrorSeverity::Critical => notifier.notify(Notice::new(
                NoticeLevel::Error,
                "Error Occurred",
                entry.message.clone(),
            )),
        }

        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ENTRIES);
        self.persist();
        &self.entries[0]
    }

    /// Mark an entry resolved. Unknown ids are ignored.
    pub fn mark_resolved(&mut self, id: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.resolved = true;
            self.persist();
        }
    }

    pub fn entries(&self) -> &[ErrorLogEntry] {
        &self.entries
    }

    pub fn unresolved_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.resolved).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.store.remove(keys::ERROR_LOG);
    }

    fn persist(&self) {
        if let Err(e) = self.store.set_json(keys::ERROR_LOG, &self.entries) {
            tracing::warn!("error_log: persist failed: {e}");
        }
    }
}
