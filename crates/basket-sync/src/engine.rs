//! SyncEngine — the orchestrator tying cart, queue, monitor, and gateway
//! together. UI actions come in here; the engine applies them locally first,
//! then routes the remote side: immediate best-effort sync while online,
//! capture into the offline queue otherwise.

use std::rc::Rc;

use basket_core::config::BasketConfig;
use basket_core::errors::BasketResult;
use basket_core::models::{CartLine, ConnectionQuality, ConnectionState, MutationKind, ProductSnapshot};
use basket_core::traits::{Clock, HttpTransport, Notifier};
use basket_cart::{CartEngine, CartSummary};
use basket_gateway::{AuthSession, Gateway};
use basket_storage::{ErrorLog, ErrorSeverity, StoreHandle};

use crate::monitor::ConnectionMonitor;
use crate::queue::{DrainReport, OfflineQueue};

/// Full-snapshot cart sync endpoint. PUT replaces the server-held cart.
const CART_SYNC_ENDPOINT: &str = "/cart/sync";

/// Order creation endpoint.
const ORDERS_ENDPOINT: &str = "/orders";

pub struct SyncEngine<T: HttpTransport, N: Notifier> {
    cart: CartEngine,
    queue: OfflineQueue,
    monitor: ConnectionMonitor,
    gateway: Gateway<T>,
    errors: ErrorLog,
    notifier: N,
    clock: Rc<dyn Clock>,
}

impl<T: HttpTransport, N: Notifier> SyncEngine<T, N> {
    /// Build the whole client core over one shared store handle. The queue
    /// and cart rehydrate from storage here, before any mutation can occur.
    pub fn new(
        store: StoreHandle,
        clock: Rc<dyn Clock>,
        config: BasketConfig,
        transport: T,
        notifier: N,
        network_reachable: bool,
    ) -> Self {
        let cart = CartEngine::new(store.clone(), Rc::clone(&clock), config.cart.clone());
        let queue = OfflineQueue::new(store.clone(), config.queue.clone());
        let monitor = ConnectionMonitor::new(config.health.clone(), network_reachable);
        let auth = AuthSession::new(store.clone());
        let gateway = Gateway::new(transport, config.api.clone(), config.health.clone(), auth);
        let errors = ErrorLog::new(store, Rc::clone(&clock));
        Self {
            cart,
            queue,
            monitor,
            gateway,
            errors,
            notifier,
            clock,
        }
    }

    /// Add a product to the cart and sync.
    pub fn add_item(&mut self, product: ProductSnapshot, quantity: u32) {
        self.cart.add_item(product, quantity);
        self.sync_cart();
    }

    /// Set a line's quantity (zero removes) and sync.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        self.cart.update_quantity(product_id, quantity);
        self.sync_cart();
    }

    /// Remove a line and sync.
    pub fn remove_item(&mut self, product_id: &str) {
        self.cart.remove_item(product_id);
        self.sync_cart();
    }

    /// Empty the cart and sync.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.sync_cart();
    }

    /// Place an order. Online, the order posts immediately and the server's
    /// order document is returned. Offline (or after a transient failure)
    /// the order is queued and `None` is returned; it will be created on
    /// reconnect. Non-transient failures surface to the caller.
    pub fn checkout(&mut self, order: serde_json::Value) -> BasketResult<Option<serde_json::Value>> {
        if self.monitor.state().is_connected() {
            match self.gateway.post::<_, serde_json::Value>(ORDERS_ENDPOINT, &order) {
                Ok(created) => return Ok(Some(created)),
                Err(e) if e.is_queueable() => {
                    tracing::warn!("sync: order post failed, queueing: {e}");
                }
                Err(e) => {
                    self.errors.log(
                        e.user_message(),
                        Some("checkout".to_string()),
                        ErrorSeverity::High,
                        &mut self.notifier,
                    );
                    return Err(e.into());
                }
            }
        }
        let now = self.clock.now();
        self.queue
            .enqueue(MutationKind::Create, ORDERS_ENDPOINT, order, now);
        Ok(None)
    }

    /// A previously-anonymous session acquired a server-known cart. Merge
    /// deterministically, keep the result as the authoritative snapshot, and
    /// push it back.
    pub fn on_login(&mut self, user_id: &str, server_lines: &[CartLine]) {
        self.cart.set_user(user_id);
        self.cart.merge_server_cart(server_lines);
        self.sync_cart();
    }

    /// Forward a browser online/offline flip. Coming back online runs an
    /// immediate probe (and drains the queue if the probe succeeds).
    pub fn set_network_reachable(&mut self, reachable: bool) {
        self.monitor
            .set_network_reachable(reachable, &mut self.notifier);
        if reachable {
            self.tick();
        }
    }

    /// Timer hook: runs a health probe when one is due, draining the queue
    /// on an offline-to-online transition. The host calls this from its one
    /// periodic timer; everything else is event-driven.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        if !self.monitor.probe_due(now) {
            return;
        }
        self.monitor.begin_probe();
        let was_connected = self.monitor.state().is_connected();
        match self.gateway.health() {
            Ok(health) => {
                tracing::debug!(status = %health.status, "sync: backend healthy");
                self.monitor.record_success(now, &mut self.notifier);
                if !was_connected && !self.queue.is_empty() {
                    self.drain_queue();
                }
            }
            Err(e) => {
                self.monitor
                    .record_failure(now, e.to_string(), &mut self.notifier);
            }
        }
    }

    /// Replay every queued mutation through the gateway. Invoked
    /// automatically on reconnect; public for hosts that want a manual
    /// "sync now" control.
    pub fn drain_queue(&mut self) -> DrainReport {
        let Self {
            queue,
            gateway,
            notifier,
            ..
        } = self;
        let report = queue.drain(|mutation| gateway.replay(mutation), notifier);
        tracing::info!(
            succeeded = report.succeeded,
            requeued = report.requeued,
            dropped = report.dropped,
            "sync: drain finished"
        );
        report
    }

    /// Best-effort push of the current snapshot, falling back to the queue.
    fn sync_cart(&mut self) {
        let snapshot = match serde_json::to_value(self.cart.snapshot()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("sync: cart snapshot unserializable: {e}");
                return;
            }
        };

        if self.monitor.state().is_connected() {
            match self
                .gateway
                .put::<_, serde_json::Value>(CART_SYNC_ENDPOINT, &snapshot)
            {
                Ok(_) => {
                    tracing::debug!("sync: cart pushed");
                    return;
                }
                Err(e) if e.is_queueable() => {
                    tracing::warn!("sync: cart push failed, queueing: {e}");
                }
                Err(e) => {
                    // Auth and validation failures would fail identically on
                    // replay; surface them now instead of queueing.
                    self.errors.log(
                        e.user_message(),
                        Some("cart sync".to_string()),
                        ErrorSeverity::Medium,
                        &mut self.notifier,
                    );
                    return;
                }
            }
        }

        let now = self.clock.now();
        self.queue
            .enqueue(MutationKind::Update, CART_SYNC_ENDPOINT, snapshot, now);
    }

    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    pub fn connection_state(&self) -> &ConnectionState {
        self.monitor.state()
    }

    pub fn connection_quality(&self) -> ConnectionQuality {
        self.monitor.quality()
    }

    /// Whether a 401 terminated the session since the last check. The host
    /// maps this to a login redirect.
    pub fn take_forced_logout(&mut self) -> bool {
        self.gateway.auth_mut().take_forced_logout()
    }

    pub fn cart(&self) -> &CartEngine {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartEngine {
        &mut self.cart
    }

    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    pub fn monitor(&self) -> &ConnectionMonitor {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut ConnectionMonitor {
        &mut self.monitor
    }

    pub fn gateway_mut(&mut self) -> &mut Gateway<T> {
        &mut self.gateway
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.errors
    }
}

impl<T: HttpTransport, N: Notifier> std::fmt::Debug for SyncEngine<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("cart", &self.cart)
            .field("queue", &self.queue)
            .field("monitor", &self.monitor)
            .finish()
    }
}
