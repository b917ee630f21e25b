//! # basket-storage
//!
//! Thin abstraction over browser-persistent key/value storage: a shared
//! handle with JSON (de)serialization and corruption detection, the
//! namespaced key layout, an in-memory backend, and the persisted error log.

pub mod error_log;
pub mod keys;
mod memory;
mod store;

pub use error_log::{ErrorLog, ErrorLogEntry, ErrorSeverity};
pub use memory::MemoryStore;
pub use store::StoreHandle;
