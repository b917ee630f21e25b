//! Error taxonomy for the Basket core.
//!
//! Each subsystem has its own error enum; `BasketError` aggregates them so
//! callers can hold a single error type across component boundaries.

mod gateway_error;
mod storage_error;
mod sync_error;

pub use gateway_error::GatewayError;
pub use storage_error::StorageError;
pub use sync_error::SyncError;

/// Top-level error for the Basket client core.
#[derive(Debug, thiserror::Error)]
pub enum BasketError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Convenience result alias used throughout the workspace.
pub type BasketResult<T> = Result<T, BasketError>;
