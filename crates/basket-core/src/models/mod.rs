//! Core data model: cart documents, queued mutations, connection state,
//! and the backend wire envelope.

mod cart;
mod connection;
mod envelope;
mod mutation;

pub use cart::{CartLine, CartMetadata, CartSnapshot, ProductSnapshot};
pub use connection::{ConnectionQuality, ConnectionState, ConnectionStatus};
pub use envelope::{ApiEnvelope, HealthStatus, Page};
pub use mutation::{MutationKind, MutationPriority, QueuedMutation};
