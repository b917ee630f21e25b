//! Raw HTTP transport, kept deliberately dumb.
//!
//! The gateway owns URLs, headers, envelopes, and error classification; a
//! transport only moves bytes. Production hosts use the reqwest-backed
//! implementation in `basket-gateway`; tests script responses.

use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Idempotent reads are the only calls the gateway auto-retries.
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Get)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully prepared outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub timeout: Duration,
}

/// Raw response. Status interpretation happens in the gateway.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failure: no HTTP response was obtained at all.
#[derive(Debug, Clone, thiserror::Error)]
#[error("transport failure: {reason}")]
pub struct TransportError {
    pub reason: String,
    pub timed_out: bool,
}

/// Blocking HTTP executor. Calls carry their own timeout; implementations
/// must resolve within it rather than block indefinitely.
pub trait HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
