//! # basket-sync
//!
//! The offline-resilience layer: tracks network and backend reachability
//! with backoff, captures mutations made while disconnected, replays them on
//! reconnect, and orchestrates the cart engine and gateway behind one
//! `SyncEngine` surface.

mod engine;
mod monitor;
mod queue;

pub use engine::SyncEngine;
pub use monitor::ConnectionMonitor;
pub use queue::{DrainReport, OfflineQueue};
