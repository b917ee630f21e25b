//! Default configuration constants.

/// Base URL of the storefront REST API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Per-request timeout for regular API calls (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Automatic retry budget for idempotent reads. Writes are never retried
/// at the gateway layer.
pub const DEFAULT_READ_RETRIES: u32 = 2;

/// Interval between backend health probes (seconds).
pub const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 30;

/// Timeout for a single health probe (seconds).
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;

/// Reconnect attempts before the monitor settles into `Disconnected`.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Exponential backoff cap between reconnect probes (milliseconds).
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;

/// Carts older than this are discarded on load (days).
pub const DEFAULT_CART_EXPIRY_DAYS: i64 = 30;

/// Local tax estimate. The backend owns the real tax calculation; this is
/// the checkout-preview placeholder the storefront has always shipped.
pub const DEFAULT_TAX_RATE: f64 = 0.08;

/// Orders above this subtotal ship free.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: f64 = 50.0;

/// Flat shipping fee below the free-shipping threshold.
pub const DEFAULT_FLAT_SHIPPING_FEE: f64 = 5.99;

/// Replay attempts before a queued mutation is dropped permanently.
pub const DEFAULT_QUEUE_MAX_RETRIES: u32 = 3;
