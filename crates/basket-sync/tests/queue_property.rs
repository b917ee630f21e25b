//! Property coverage for the drain law: under any pattern of replay
//! failures, every mutation either reaches the server exactly once or is
//! dropped after exhausting its retry budget, and nothing lingers.

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use serde_json::json;

use basket_core::config::QueueConfig;
use basket_core::errors::GatewayError;
use basket_core::models::MutationKind;
use basket_storage::{MemoryStore, StoreHandle};
use basket_sync::OfflineQueue;
use test_fixtures::CollectingNotifier;

proptest! {
    /// `failures[i]` is how many times mutation `i` fails before the server
    /// would accept it. Draining until quiescence must deliver exactly the
    /// mutations whose failure run fits inside the retry budget and drop the
    /// rest, one notice each.
    #[test]
    fn every_mutation_is_delivered_once_or_dropped(failures in proptest::collection::vec(0u32..6, 1..8)) {
        let store = StoreHandle::new(MemoryStore::default());
        let config = QueueConfig::default();
        let max_retries = config.max_retries;
        let mut queue = OfflineQueue::new(store, config);

        let mut ids = Vec::new();
        for (i, _) in failures.iter().enumerate() {
            let m = queue.enqueue(
                MutationKind::Update,
                format!("/cart/sync/{i}"),
                json!({ "seq": i }),
                Utc::now(),
            );
            ids.push(m.id.clone());
        }

        let mut attempts: HashMap<String, u32> = HashMap::new();
        let mut notifier = CollectingNotifier::new();
        let mut succeeded = 0;
        let mut dropped = 0;

        // One extra cycle proves quiescence.
        for _ in 0..=max_retries {
            let report = queue.drain(
                |m| {
                    let seen = attempts.entry(m.id.clone()).or_insert(0);
                    *seen += 1;
                    let planned = failures[ids.iter().position(|id| *id == m.id).unwrap()];
                    if *seen <= planned {
                        Err(GatewayError::Network { reason: "flaky".into() })
                    } else {
                        Ok(())
                    }
                },
                &mut notifier,
            );
            succeeded += report.succeeded;
            dropped += report.dropped;
        }

        prop_assert!(queue.is_empty());

        let deliverable = failures.iter().filter(|f| **f < max_retries).count();
        prop_assert_eq!(succeeded, deliverable);
        prop_assert_eq!(dropped, failures.len() - deliverable);
        prop_assert_eq!(notifier.notices().len(), failures.len() - deliverable);

        // No mutation was attempted past its budget.
        for (i, id) in ids.iter().enumerate() {
            let spent = attempts.get(id).copied().unwrap_or(0);
            prop_assert_eq!(spent, failures[i].min(max_retries) + u32::from(failures[i] < max_retries));
        }
    }
}
