/// Normalized remote-call failures.
///
/// The gateway is the only layer allowed to translate raw transport errors
/// into this taxonomy; everything above it deals only in these variants.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// No response or timeout. Safe to retry reads; writes become queued
    /// mutations.
    #[error("network error: {reason}")]
    Network { reason: String },

    /// HTTP 401. The auth session has already been cleared when this is
    /// returned. Never retried.
    #[error("unauthorized")]
    Unauthorized,

    /// HTTP 403. Surfaced to the user, not retried.
    #[error("forbidden")]
    Forbidden,

    /// HTTP 400. Not retried.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// HTTP 404. Not retried.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// HTTP 500/503. Safe to manually retry; auto-retried only within the
    /// gateway's small read-retry budget.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body did not match the expected envelope shape, or the
    /// envelope reported `success: false`.
    #[error("invalid response envelope: {reason}")]
    Envelope { reason: String },
}

impl GatewayError {
    /// Fixed user-facing message for each failure class.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Connection problem - please check your internet connection".to_string()
            }
            Self::Unauthorized => "Session expired. Please login again.".to_string(),
            Self::Forbidden => "You do not have permission to perform this action.".to_string(),
            Self::BadRequest { .. } => "Bad Request - Please check your input".to_string(),
            Self::NotFound { .. } => {
                "Not Found - The requested resource was not found".to_string()
            }
            Self::Server { status: 503, .. } => {
                "Service Unavailable - Please try again later".to_string()
            }
            Self::Server { .. } => "Internal Server Error - Please try again later".to_string(),
            Self::Envelope { .. } => "An unknown error occurred".to_string(),
        }
    }

    /// Whether an idempotent read may be automatically retried after this
    /// failure.
    pub fn is_read_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. })
    }

    /// Whether a failed write should be captured as a queued mutation
    /// instead of surfacing immediately.
    pub fn is_queueable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. })
    }
}
