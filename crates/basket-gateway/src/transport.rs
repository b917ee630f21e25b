//! reqwest-backed production transport.

use basket_core::traits::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Blocking HTTP executor over a shared reqwest client. Timeouts come from
/// the request, not the client, so health probes can run tighter than
/// regular calls.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|e| TransportError {
            timed_out: e.is_timeout(),
            reason: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| TransportError {
            timed_out: e.is_timeout(),
            reason: e.to_string(),
        })?;

        Ok(HttpResponse { status, body })
    }
}
