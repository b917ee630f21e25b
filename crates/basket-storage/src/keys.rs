//! Persisted state layout.
//!
//! Every component writes whole-value JSON documents under its own key, so
//! no locking is needed; concurrent writers within one tick are last-writer-
//! wins by design of the execution model.

/// Current cart snapshot.
pub const CART: &str = "basket_cart";

/// Last known-good cart snapshot, the corruption fallback.
pub const CART_BACKUP: &str = "basket_cart_backup";

/// Offline mutation queue.
pub const OFFLINE_QUEUE: &str = "basket_offline_queue";

/// Persisted error log.
pub const ERROR_LOG: &str = "basket_error_log";

/// Bearer token for the current session.
pub const AUTH_TOKEN: &str = "basket_auth_token";

/// Refresh token paired with the bearer token.
pub const REFRESH_TOKEN: &str = "basket_refresh_token";

/// Whole-app UI state. Reserved for the host; the core never touches it but
/// it shares the namespace so hosts do not collide with the keys above.
pub const APP_STATE: &str = "basket_app_state";
