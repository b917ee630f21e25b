//! Backend wire contract — the response envelope every endpoint returns,
//! the pagination shape, and the health probe payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope wrapping every backend response. The gateway unwraps this and
/// hands callers just `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
    pub success: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Pagination shape returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub size: u32,
    pub first: bool,
    pub last: bool,
}

/// Payload of the `GET /health` probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub version: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_unwraps_typed_data() {
        let json = r#"{"data": {"id": "p1"}, "message": "ok", "success": true, "timestamp": null}"#;
        #[derive(Deserialize)]
        struct P {
            id: String,
        }
        let envelope: ApiEnvelope<P> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap().id, "p1");
    }

    #[test]
    fn page_uses_camel_case_keys() {
        let json = r#"{"content": [1, 2], "totalElements": 2, "totalPages": 1,
                       "currentPage": 0, "size": 20, "first": true, "last": true}"#;
        let page: Page<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert!(page.first && page.last);
    }
}
