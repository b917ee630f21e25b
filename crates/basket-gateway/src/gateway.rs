//! The gateway proper: request assembly, envelope unwrapping, failure
//! classification, and the bounded read retry.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use basket_core::config::{ApiConfig, HealthConfig};
use basket_core::errors::GatewayError;
use basket_core::models::{ApiEnvelope, HealthStatus, MutationKind, Page, QueuedMutation};
use basket_core::traits::{HttpMethod, HttpRequest, HttpTransport};

use crate::auth::AuthSession;

/// Single entry/exit point for all backend calls.
pub struct Gateway<T: HttpTransport> {
    transport: T,
    api: ApiConfig,
    health: HealthConfig,
    auth: AuthSession,
}

impl<T: HttpTransport> Gateway<T> {
    pub fn new(transport: T, api: ApiConfig, health: HealthConfig, auth: AuthSession) -> Self {
        Self {
            transport,
            api,
            health,
            auth,
        }
    }

    /// Idempotent read. Transient and server failures are retried up to the
    /// configured budget, with no backoff — backoff across longer outages is
    /// the connectivity monitor's job.
    pub fn get<R: DeserializeOwned>(&mut self, endpoint: &str) -> Result<R, GatewayError> {
        let data = self.send_read(endpoint)?;
        decode(data)
    }

    /// Read with query parameters appended to the endpoint path.
    pub fn get_with_query<R: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<R, GatewayError> {
        self.get(&join_query(endpoint, params))
    }

    /// Read one page of a paginated listing.
    pub fn get_paginated<R: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<R>, GatewayError> {
        self.get_with_query(
            endpoint,
            &[("page", page.to_string()), ("size", size.to_string())],
        )
    }

    pub fn post<B: Serialize, R: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, GatewayError> {
        decode(self.send_write(HttpMethod::Post, endpoint, Some(encode(endpoint, body)?))?)
    }

    pub fn put<B: Serialize, R: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, GatewayError> {
        decode(self.send_write(HttpMethod::Put, endpoint, Some(encode(endpoint, body)?))?)
    }

    pub fn patch<B: Serialize, R: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, GatewayError> {
        decode(self.send_write(HttpMethod::Patch, endpoint, Some(encode(endpoint, body)?))?)
    }

    pub fn delete<R: DeserializeOwned>(&mut self, endpoint: &str) -> Result<R, GatewayError> {
        decode(self.send_write(HttpMethod::Delete, endpoint, None)?)
    }

    /// Replay a queued mutation. The response payload is discarded; only the
    /// acknowledgement matters.
    pub fn replay(&mut self, mutation: &QueuedMutation) -> Result<(), GatewayError> {
        let (method, body) = match mutation.kind {
            MutationKind::Create => (HttpMethod::Post, Some(mutation.payload.to_string())),
            MutationKind::Update => (HttpMethod::Put, Some(mutation.payload.to_string())),
            MutationKind::Delete => (HttpMethod::Delete, None),
        };
        self.send_write(method, &mutation.endpoint, body)?;
        Ok(())
    }

    /// Backend health probe, on the tighter health timeout and with no
    /// retry — the monitor owns the retry schedule.
    pub fn health(&mut self) -> Result<HealthStatus, GatewayError> {
        let timeout = Duration::from_secs(self.health.timeout_secs);
        let data = self.send_once(HttpMethod::Get, "/health", None, timeout)?;
        decode(data)
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthSession {
        &mut self.auth
    }

    fn send_read(&mut self, endpoint: &str) -> Result<serde_json::Value, GatewayError> {
        let timeout = Duration::from_secs(self.api.timeout_secs);
        let mut attempt = 0;
        loop {
            match self.send_once(HttpMethod::Get, endpoint, None, timeout) {
                Ok(data) => return Ok(data),
                Err(e) if e.is_read_retryable() && attempt < self.api.read_retries => {
                    attempt += 1;
                    tracing::debug!(endpoint, attempt, "gateway: retrying read: {e}");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Writes go out exactly once. Whether a failed write becomes a queued
    /// mutation is the caller's decision.
    fn send_write(
        &mut self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
    ) -> Result<serde_json::Value, GatewayError> {
        let timeout = Duration::from_secs(self.api.timeout_secs);
        self.send_once(method, endpoint, body, timeout)
    }

    fn send_once(
        &mut self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
        timeout: Duration,
    ) -> Result<serde_json::Value, GatewayError> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(token) = self.auth.bearer_token() {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        let request = HttpRequest {
            method,
            url: format!("{}{endpoint}", self.api.base_url),
            headers,
            body,
            timeout,
        };

        let response = self
            .transport
            .execute(&request)
            .map_err(|e| GatewayError::Network {
                reason: e.to_string(),
            })?;

        if !(200..300).contains(&response.status) {
            let error = self.classify_failure(response.status, &response.body);
            tracing::warn!(
                method = method.as_str(),
                endpoint,
                status = response.status,
                "gateway: {error}"
            );
            return Err(error);
        }

        unwrap_envelope(&response.body)
    }

    /// Translate an HTTP failure status into the normalized taxonomy. The
    /// one side effect lives here: a 401 terminates the auth session before
    /// the error is returned, so no caller can observe a half-dead session.
    fn classify_failure(&mut self, status: u16, body: &str) -> GatewayError {
        let message = envelope_message(body);
        match status {
            401 => {
                self.auth.force_logout();
                GatewayError::Unauthorized
            }
            403 => GatewayError::Forbidden,
            400 => GatewayError::BadRequest {
                message: message.unwrap_or_else(|| "bad request".to_string()),
            },
            404 => GatewayError::NotFound {
                message: message.unwrap_or_else(|| "resource not found".to_string()),
            },
            status => GatewayError::Server {
                status,
                message: message.unwrap_or_else(|| "server failure".to_string()),
            },
        }
    }
}

impl<T: HttpTransport> std::fmt::Debug for Gateway<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.api.base_url)
            .field("auth", &self.auth)
            .finish()
    }
}

/// Unwrap the `{ data, message, success, timestamp }` envelope, validating
/// shape at the boundary instead of trusting the network.
fn unwrap_envelope(body: &str) -> Result<serde_json::Value, GatewayError> {
    let envelope: ApiEnvelope<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| GatewayError::Envelope {
            reason: format!("malformed envelope: {e}"),
        })?;
    if !envelope.success {
        return Err(GatewayError::Envelope {
            reason: format!("server reported failure: {}", envelope.message),
        });
    }
    Ok(envelope.data.unwrap_or(serde_json::Value::Null))
}

/// Best-effort extraction of the server's message from a failure body.
fn envelope_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
}

fn decode<R: DeserializeOwned>(data: serde_json::Value) -> Result<R, GatewayError> {
    serde_json::from_value(data).map_err(|e| GatewayError::Envelope {
        reason: format!("unexpected payload shape: {e}"),
    })
}

fn encode<B: Serialize>(endpoint: &str, body: &B) -> Result<String, GatewayError> {
    serde_json::to_string(body).map_err(|e| GatewayError::Envelope {
        reason: format!("unserializable request body for {endpoint}: {e}"),
    })
}

fn join_query(endpoint: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }
    let query: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{separator}{}", query.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_query_builds_a_query_string() {
        assert_eq!(
            join_query("/products", &[("page", "2".into()), ("size", "20".into())]),
            "/products?page=2&size=20"
        );
        assert_eq!(join_query("/products", &[]), "/products");
        assert_eq!(
            join_query("/products?sort=name", &[("page", "0".into())]),
            "/products?sort=name&page=0"
        );
    }

    #[test]
    fn unsuccessful_envelope_is_rejected() {
        let body = r#"{"data": null, "message": "nope", "success": false, "timestamp": null}"#;
        let err = unwrap_envelope(body).unwrap_err();
        assert!(matches!(err, GatewayError::Envelope { .. }));
    }

    #[test]
    fn missing_data_decodes_as_unit() {
        let body = r#"{"data": null, "message": "ok", "success": true, "timestamp": null}"#;
        let data = unwrap_envelope(body).unwrap();
        let _: () = decode(data).unwrap();
    }
}
