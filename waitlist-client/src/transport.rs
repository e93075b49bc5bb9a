//! HTTP transport seam
//!
//! Components build [`ApiRequest`]s and hand them to a [`Transport`]. The
//! production implementation is [`HttpTransport`] (reqwest); tests plug in an
//! in-process backend.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use waitlist_common::ErrorBody;

/// Network-level failures, distinct from an HTTP status the server chose
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Request timed out")]
    Timeout,
    #[error("Server unreachable: {0}")]
    Unreachable(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// An outgoing request, relative to the API base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self, TransportError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set `Authorization: Bearer <token>`. Returns false if the token cannot
    /// be carried in a header.
    pub fn set_bearer(&mut self, token: &str) -> bool {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
                true
            }
            Err(_) => false,
        }
    }

    /// Token carried in the authorization header, if any
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// A response as received, before any interpretation
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 401 and 403 both mean the credential is no longer accepted
    pub fn is_auth_rejection(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Server-supplied `detail` message, if the body carries one
    pub fn detail(&self) -> Option<String> {
        ErrorBody::message_from(&self.body)
    }

    /// `detail` when present, otherwise the bare status
    pub fn describe(&self) -> String {
        self.detail()
            .unwrap_or_else(|| format!("HTTP {}", self.status))
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url`; `timeout` bounds each whole request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(request.headers);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_connect() {
                TransportError::Unreachable(e.to_string())
            } else {
                TransportError::Http(e)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "response received");

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_round_trip() {
        let mut req = ApiRequest::get("/api/admin/auth/me");
        assert!(req.bearer_token().is_none());
        assert!(req.set_bearer("tok-123"));
        assert_eq!(req.bearer_token(), Some("tok-123"));
    }

    #[test]
    fn test_bearer_rejects_header_breaking_token() {
        let mut req = ApiRequest::get("/api/admin/auth/me");
        assert!(!req.set_bearer("line\nbreak"));
        assert!(req.bearer_token().is_none());
    }

    #[test]
    fn test_response_classification() {
        assert!(ApiResponse::new(204, "").is_success());
        assert!(ApiResponse::new(401, "").is_auth_rejection());
        assert!(ApiResponse::new(403, "").is_auth_rejection());
        assert!(!ApiResponse::new(404, "").is_auth_rejection());
        assert!(!ApiResponse::new(500, "").is_success());
    }

    #[test]
    fn test_describe_prefers_detail() {
        let resp = ApiResponse::new(400, r#"{"detail":"Page number must be greater than 0"}"#);
        assert_eq!(resp.describe(), "Page number must be greater than 0");
        assert_eq!(ApiResponse::new(502, "bad gateway").describe(), "HTTP 502");
    }

    #[test]
    fn test_http_transport_trims_base_url() {
        let transport = HttpTransport::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000");
    }
}
