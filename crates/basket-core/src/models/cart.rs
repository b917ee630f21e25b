//! Cart documents — the unit of local persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Denormalized product copy carried inside a cart line. Never live-joined;
/// price and stock reflect the moment the item was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub available_stock: u32,
}

/// A single line in the cart, keyed by product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub product: ProductSnapshot,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn new(product: ProductSnapshot, quantity: u32, added_at: DateTime<Utc>) -> Self {
        Self {
            product_id: product.id.clone(),
            product,
            quantity,
            added_at,
        }
    }

    /// Line-level validity: a persisted line must name a product and carry a
    /// positive quantity.
    pub fn is_valid(&self) -> bool {
        !self.product_id.is_empty() && self.quantity > 0
    }
}

/// Metadata used to detect staleness and corrupted snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMetadata {
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Opaque id generated once per browser session.
    pub session_id: String,
    /// Set once the session authenticates.
    pub user_id: Option<String>,
    /// Monotonically increasing, bumped on every mutation.
    pub version: u64,
}

impl CartMetadata {
    /// Fresh metadata for a brand-new cart.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            last_updated: now,
            session_id: format!("session_{}", uuid::Uuid::new_v4()),
            user_id: None,
            version: 1,
        }
    }
}

/// A complete, self-contained copy of cart state written atomically to
/// durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub metadata: CartMetadata,
}

impl CartSnapshot {
    /// An empty cart with fresh metadata.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            lines: Vec::new(),
            metadata: CartMetadata::new(now),
        }
    }

    /// Snapshot-level validity check applied on every load. A snapshot that
    /// fails this is treated as corrupt and discarded in favor of the backup.
    pub fn is_valid(&self) -> bool {
        self.lines.iter().all(CartLine::is_valid)
    }

    /// Age of the cart relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.metadata.created_at
    }
}
