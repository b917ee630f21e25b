/// Durable local store errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("corrupt document under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("failed to serialize document for key {key}: {reason}")]
    Serialize { key: String, reason: String },

    #[error("storage backend rejected write to key {key}: {reason}")]
    WriteFailed { key: String, reason: String },
}
