//! # basket-core
//!
//! Foundation crate for the Basket storefront client core.
//! Defines all types, traits, errors, config, and the change-signal primitive.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod models;
pub mod signal;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::BasketConfig;
pub use errors::{BasketError, BasketResult};
pub use models::{CartLine, CartMetadata, CartSnapshot, ConnectionState, QueuedMutation};
pub use signal::Signal;
pub use traits::{Clock, KeyValueStore, Notifier};
