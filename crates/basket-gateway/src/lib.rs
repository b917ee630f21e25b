//! # basket-gateway
//!
//! The single chokepoint for all outbound backend calls. Attaches auth
//! headers, unwraps the server's response envelope, classifies failures into
//! the normalized taxonomy, and applies a small bounded retry to idempotent
//! reads. Mutations are never silently retried here — callers decide whether
//! to queue on failure.

mod auth;
mod gateway;
mod transport;

pub use auth::AuthSession;
pub use gateway::Gateway;
pub use transport::ReqwestTransport;
