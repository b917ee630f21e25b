//! Cart engine — authoritative in-memory cart, snapshot persistence with
//! backup recovery, stale-cart discard, and replay-latest change signals.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use basket_core::config::CartConfig;
use basket_core::models::{CartLine, CartMetadata, CartSnapshot, ProductSnapshot};
use basket_core::signal::Signal;
use basket_core::traits::Clock;
use basket_storage::{keys, StoreHandle};

use crate::merge::merge_lines;
use crate::summary::CartSummary;

/// Derived aggregates pushed to badge/checkout subscribers on every change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of line quantities.
    pub item_count: u32,
    /// Sum of price x quantity, before tax and shipping.
    pub subtotal: f64,
}

impl CartTotals {
    fn of(lines: &[CartLine]) -> Self {
        Self {
            item_count: lines.iter().map(|l| l.quantity).sum(),
            subtotal: lines
                .iter()
                .map(|l| l.product.price * f64::from(l.quantity))
                .sum(),
        }
    }
}

/// Exclusive owner of the live cart snapshot.
///
/// Every mutating call recomputes aggregates, bumps the snapshot version,
/// persists a whole-value snapshot, and notifies subscribers. Remote sync is
/// not this engine's concern; the sync engine wraps it.
pub struct CartEngine {
    store: StoreHandle,
    clock: Rc<dyn Clock>,
    config: CartConfig,
    snapshot: CartSnapshot,
    lines_signal: Signal<Vec<CartLine>>,
    totals_signal: Signal<CartTotals>,
}

impl CartEngine {
    /// Load the cart from storage, recovering from the backup copy when the
    /// current document is corrupt, and discarding carts past the expiry
    /// window.
    pub fn new(store: StoreHandle, clock: Rc<dyn Clock>, config: CartConfig) -> Self {
        let now = clock.now();
        let mut snapshot = Self::load(&store, now);

        if snapshot.age(now) > chrono::Duration::days(config.expiry_days) {
            tracing::info!(
                version = snapshot.metadata.version,
                "cart: expired after {} days, clearing",
                config.expiry_days
            );
            snapshot = CartSnapshot::empty(now);
            if let Err(e) = store.set_json(keys::CART, &snapshot) {
                tracing::warn!("cart: failed to persist cleared cart: {e}");
            }
        }

        let totals = CartTotals::of(&snapshot.lines);
        let lines = snapshot.lines.clone();
        Self {
            store,
            clock,
            config,
            snapshot,
            lines_signal: Signal::new(lines),
            totals_signal: Signal::new(totals),
        }
    }

    /// Current key, validity-checked; then backup; then empty. A valid
    /// current snapshot refreshes the backup as the last known good copy; a
    /// recovered backup is promoted back to current and consumed. The backup
    /// also covers a missing current key, which is what a failed primary
    /// write in the previous session leaves behind.
    fn load(store: &StoreHandle, now: chrono::DateTime<chrono::Utc>) -> CartSnapshot {
        match store.get_json::<CartSnapshot>(keys::CART) {
            Ok(Some(snapshot)) if snapshot.is_valid() => {
                if let Err(e) = store.set_json(keys::CART_BACKUP, &snapshot) {
                    tracing::warn!("cart: backup refresh failed: {e}");
                }
                return snapshot;
            }
            Ok(Some(_)) => tracing::warn!("cart: stored snapshot failed validity check"),
            Ok(None) => {}
            Err(e) => tracing::warn!("cart: stored snapshot unreadable: {e}"),
        }

        match store.get_json::<CartSnapshot>(keys::CART_BACKUP) {
            Ok(Some(backup)) if backup.is_valid() => {
                tracing::info!("cart: recovered from backup snapshot");
                // Keep the backup as the only durable copy until the
                // promotion actually lands.
                match store.set_json(keys::CART, &backup) {
                    Ok(()) => store.remove(keys::CART_BACKUP),
                    Err(e) => tracing::warn!("cart: failed to promote backup: {e}"),
                }
                backup
            }
            Ok(_) => CartSnapshot::empty(now),
            Err(e) => {
                tracing::warn!("cart: backup snapshot unreadable: {e}");
                CartSnapshot::empty(now)
            }
        }
    }

    /// Add `quantity` of a product. An existing line for the same product id
    /// has its quantity incremented; otherwise a new line is appended. Stock
    /// limits are enforced by the UI and the backend, not here.
    pub fn add_item(&mut self, product: ProductSnapshot, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let mut lines = self.snapshot.lines.clone();
        match lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity += quantity,
            None => lines.push(CartLine::new(product, quantity, self.clock.now())),
        }
        self.commit(lines);
    }

    /// Set a line's quantity. Zero removes the line; a missing line is a
    /// no-op, not an error. A same-value update still commits, so the
    /// version bump and persist happen for every update like any other
    /// mutation.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }
        let mut lines = self.snapshot.lines.clone();
        if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
            self.commit(lines);
        }
    }

    /// Remove a line if present. Idempotent: a second call is a no-op.
    pub fn remove_item(&mut self, product_id: &str) {
        let mut lines = self.snapshot.lines.clone();
        let before = lines.len();
        lines.retain(|l| l.product_id != product_id);
        if lines.len() != before {
            self.commit(lines);
        }
    }

    /// Empty the cart, persisting a valid empty snapshot.
    pub fn clear(&mut self) {
        self.commit(Vec::new());
    }

    /// Record the authenticated user on the snapshot.
    pub fn set_user(&mut self, user_id: impl Into<String>) {
        self.snapshot.metadata.user_id = Some(user_id.into());
        let lines = self.snapshot.lines.clone();
        self.commit(lines);
    }

    /// Reconcile with a server-held cart: server lines are the base, local-
    /// only lines are appended, larger quantity wins on overlap. The merge
    /// result becomes the authoritative snapshot.
    pub fn merge_server_cart(&mut self, server_lines: &[CartLine]) {
        let merged = merge_lines(server_lines, &self.snapshot.lines);
        tracing::info!(
            server = server_lines.len(),
            local = self.snapshot.lines.len(),
            merged = merged.len(),
            "cart: merged with server cart"
        );
        self.commit(merged);
    }

    /// Checkout summary. Pure derivation over the current lines.
    pub fn summary(&self) -> CartSummary {
        CartSummary::derive(&self.snapshot.lines, &self.config)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.snapshot.lines
    }

    pub fn snapshot(&self) -> &CartSnapshot {
        &self.snapshot
    }

    pub fn metadata(&self) -> &CartMetadata {
        &self.snapshot.metadata
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.snapshot.lines.iter().any(|l| l.product_id == product_id)
    }

    /// Quantity of a product in the cart, zero when absent.
    pub fn item_quantity(&self, product_id: &str) -> u32 {
        self.snapshot
            .lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Age of the cart since creation.
    pub fn cart_age(&self) -> chrono::Duration {
        self.snapshot.age(self.clock.now())
    }

    /// Live expiry check, for hosts whose tab outlives the window. Expired
    /// carts are otherwise cleared at load.
    pub fn is_expired(&self) -> bool {
        self.cart_age() > chrono::Duration::days(self.config.expiry_days)
    }

    pub fn item_count(&self) -> u32 {
        self.totals_signal.get().item_count
    }

    pub fn subtotal(&self) -> f64 {
        self.totals_signal.get().subtotal
    }

    /// Replay-latest stream of the line list.
    pub fn lines_signal(&mut self) -> &mut Signal<Vec<CartLine>> {
        &mut self.lines_signal
    }

    /// Replay-latest stream of the derived item count and subtotal.
    pub fn totals_signal(&mut self) -> &mut Signal<CartTotals> {
        &mut self.totals_signal
    }

    fn commit(&mut self, lines: Vec<CartLine>) {
        self.snapshot.lines = lines;
        self.snapshot.metadata.last_updated = self.clock.now();
        self.snapshot.metadata.version += 1;

        debug_assert!(self.snapshot.is_valid());
        if let Err(e) = self.store.set_json(keys::CART, &self.snapshot) {
            // A failed primary write still leaves the backup slot as a
            // landing spot for the state the user just produced.
            tracing::warn!("cart: persist failed, writing backup instead: {e}");
            if let Err(e) = self.store.set_json(keys::CART_BACKUP, &self.snapshot) {
                tracing::warn!("cart: backup persist also failed: {e}");
            }
        }

        self.lines_signal.set(self.snapshot.lines.clone());
        self.totals_signal.set(CartTotals::of(&self.snapshot.lines));
        tracing::debug!(
            version = self.snapshot.metadata.version,
            lines = self.snapshot.lines.len(),
            "cart: committed"
        );
    }
}

impl std::fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("version", &self.snapshot.metadata.version)
            .field("lines", &self.snapshot.lines.len())
            .finish()
    }
}
