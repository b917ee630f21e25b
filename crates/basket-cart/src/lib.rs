//! # basket-cart
//!
//! The cart state engine. Owns the authoritative in-memory cart, applies
//! mutations, persists snapshots with backup recovery, derives checkout
//! totals, and merges local carts with server-held ones at login.

mod engine;
mod merge;
mod summary;

pub use engine::{CartEngine, CartTotals};
pub use merge::merge_lines;
pub use summary::CartSummary;
