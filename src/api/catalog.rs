//! IPTV catalog backend client
//!
//! Thin async wrapper over the backend's JSON REST API: one method per
//! endpoint, no internal retries. Retry is the caller's concern (in
//! practice: the user pressing "retry"). Network and parse failures
//! surface as [`CatalogError`] so the state machine can map them to a
//! uniform "request failed" message.

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Category, ContentItem, ContentType, Credential, SearchResults};

/// Catalog backend error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Outcome of a setup or connection-test call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Success,
    DemoMode,
    Failure,
}

/// Response from `POST /api/setup` and `GET /api/xtream/test`
#[derive(Debug, Clone)]
pub struct ConnectionCheck {
    pub status: ApiStatus,
    pub message: Option<String>,
    pub categories_count: Option<usize>,
}

/// Response from `GET /api/playlist-info`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Response from `GET /api/health`
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub iptv_configured: bool,
}

/// Catalog backend API client
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a new client for the given backend base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// The backend base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request and deserialize the JSON body
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.get(&url).send().await?;
        Self::parse(response).await
    }

    /// Make a POST request with a JSON body and deserialize the response
    async fn post<B: serde::Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.post(&url).json(body).send().await?;
        Self::parse(response).await
    }

    async fn parse<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| {
                    CatalogError::InvalidResponse(format!("JSON parse error: {}", e))
                })
            }
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound),
            status => Err(CatalogError::ServerError(status.as_u16())),
        }
    }

    /// Register provider credentials with the backend. Called once at
    /// session start.
    pub async fn setup(&self, credential: &Credential) -> Result<ConnectionCheck, CatalogError> {
        let response: StatusResponse = self.post("/api/setup", credential).await?;
        Ok(response.into_check())
    }

    /// Test the backend's upstream provider connection. Idempotent, safe to
    /// call repeatedly.
    pub async fn test_connection(&self) -> Result<ConnectionCheck, CatalogError> {
        let response: StatusResponse = self.get("/api/xtream/test").await?;
        Ok(response.into_check())
    }

    /// Backend liveness probe
    pub async fn health(&self) -> Result<Health, CatalogError> {
        self.get("/api/health").await
    }

    /// Best-effort playlist metadata. Callers treat failure as non-fatal.
    pub async fn playlist_info(&self) -> Result<PlaylistInfo, CatalogError> {
        self.get("/api/playlist-info").await
    }

    /// Categories for one content type
    pub async fn categories(&self, content_type: ContentType) -> Result<Vec<Category>, CatalogError> {
        let endpoint = format!("/api/categories/{}", content_type.as_str());
        let response: CategoriesResponse = self.get(&endpoint).await?;
        Ok(response.categories)
    }

    /// Streams for one content type, optionally filtered by category.
    /// `None` means all categories for this type.
    pub async fn streams(
        &self,
        content_type: ContentType,
        category_id: Option<&str>,
    ) -> Result<Vec<ContentItem>, CatalogError> {
        let endpoint = match category_id {
            Some(id) => format!(
                "/api/streams/{}?category_id={}",
                content_type.as_str(),
                urlencoding::encode(id)
            ),
            None => format!("/api/streams/{}", content_type.as_str()),
        };
        let response: StreamsResponse = self.get(&endpoint).await?;
        Ok(response.streams)
    }

    /// Search across all three content types. The query must be non-empty;
    /// the empty-query short-circuit belongs to the caller.
    pub async fn search(&self, query: &str) -> Result<SearchResults, CatalogError> {
        debug_assert!(!query.trim().is_empty(), "empty query must not be sent");
        let endpoint = format!("/api/search?q={}", urlencoding::encode(query));
        self.get(&endpoint).await
    }

    /// Short EPG for a live channel. Returned as raw JSON since providers
    /// vary wildly in what they put here.
    pub async fn epg(&self, stream_id: u64, limit: u32) -> Result<serde_json::Value, CatalogError> {
        let endpoint = format!("/api/epg/{}?limit={}", stream_id, limit);
        let response: EpgResponse = self.get(&endpoint).await?;
        Ok(response.epg)
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    categories_count: Option<usize>,
}

impl StatusResponse {
    fn into_check(self) -> ConnectionCheck {
        let status = match self.status.as_str() {
            "success" => ApiStatus::Success,
            "demo_mode" => ApiStatus::DemoMode,
            _ => ApiStatus::Failure,
        };
        ConnectionCheck {
            status,
            message: self.message,
            categories_count: self.categories_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    #[serde(default)]
    streams: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
struct EpgResponse {
    #[serde(default)]
    epg: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let ok = StatusResponse {
            status: "success".into(),
            message: Some("Connection successful".into()),
            categories_count: Some(42),
        };
        let check = ok.into_check();
        assert_eq!(check.status, ApiStatus::Success);
        assert_eq!(check.categories_count, Some(42));

        let demo = StatusResponse {
            status: "demo_mode".into(),
            message: None,
            categories_count: None,
        };
        assert_eq!(demo.into_check().status, ApiStatus::DemoMode);

        let err = StatusResponse {
            status: "error".into(),
            message: Some("No data received".into()),
            categories_count: None,
        };
        assert_eq!(err.into_check().status, ApiStatus::Failure);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = CatalogClient::new("http://localhost:8001/");
        assert_eq!(client.base_url(), "http://localhost:8001");
    }
}
