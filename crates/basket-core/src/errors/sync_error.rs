/// Offline-sync and connectivity errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("mutation {id} dropped after {attempts} attempts: {kind} {endpoint}")]
    MutationDropped {
        id: String,
        kind: String,
        endpoint: String,
        attempts: u32,
    },

    #[error("reconnect failed after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },
}
