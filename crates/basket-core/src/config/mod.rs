//! Client configuration.
//!
//! All sections deserialize with `#[serde(default)]` so hosts can supply a
//! partial document and fall back to the constants in [`defaults`].

pub mod defaults;

use serde::{Deserialize, Serialize};

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined onto.
    pub base_url: String,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
    /// Automatic retry budget for idempotent reads.
    pub read_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_BASE_URL.to_string(),
            timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            read_retries: defaults::DEFAULT_READ_RETRIES,
        }
    }
}

/// Connectivity monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Interval between health probes while connected (seconds).
    pub interval_secs: u64,
    /// Timeout for a single probe (seconds).
    pub timeout_secs: u64,
    /// Reconnect attempts before settling into `Disconnected`.
    pub max_reconnect_attempts: u32,
    /// Exponential backoff cap (milliseconds).
    pub max_backoff_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::DEFAULT_HEALTH_INTERVAL_SECS,
            timeout_secs: defaults::DEFAULT_HEALTH_TIMEOUT_SECS,
            max_reconnect_attempts: defaults::DEFAULT_MAX_RECONNECT_ATTEMPTS,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
        }
    }
}

/// Cart engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Carts older than this are discarded on load (days).
    pub expiry_days: i64,
    /// Local tax estimate applied to the subtotal.
    pub tax_rate: f64,
    /// Subtotal above which shipping is free.
    pub free_shipping_threshold: f64,
    /// Flat shipping fee below the threshold.
    pub flat_shipping_fee: f64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            expiry_days: defaults::DEFAULT_CART_EXPIRY_DAYS,
            tax_rate: defaults::DEFAULT_TAX_RATE,
            free_shipping_threshold: defaults::DEFAULT_FREE_SHIPPING_THRESHOLD,
            flat_shipping_fee: defaults::DEFAULT_FLAT_SHIPPING_FEE,
        }
    }
}

/// Offline mutation queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Replay attempts before a mutation is dropped permanently.
    pub max_retries: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::DEFAULT_QUEUE_MAX_RETRIES,
        }
    }
}

/// Top-level configuration consumed by the client core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasketConfig {
    pub api: ApiConfig,
    pub health: HealthConfig,
    pub cart: CartConfig,
    pub queue: QueueConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let config = BasketConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: BasketConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api.base_url, defaults::DEFAULT_BASE_URL);
        assert_eq!(back.health.interval_secs, 30);
        assert_eq!(back.cart.expiry_days, 30);
    }

    #[test]
    fn partial_document_falls_back_to_defaults() {
        let config: BasketConfig =
            serde_json::from_str(r#"{"api": {"base_url": "https://api.example.com"}}"#).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.read_retries, defaults::DEFAULT_READ_RETRIES);
        assert_eq!(config.queue.max_retries, 3);
    }
}
