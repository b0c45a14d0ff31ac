//! HTTP transport seam for the LinkedIn REST client
//!
//! The publication sequencer owns all protocol decisions (payload shape,
//! status interpretation, header extraction); the transport only carries
//! one request/response exchange. Keeping the seam at the wire level
//! means the protocol logic itself is what gets exercised when tests
//! substitute [`super::mock::MockTransport`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{PublishError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
        }
    }
}

/// Request body: JSON for the REST calls, raw bytes for the binary PUT
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Bytes(Vec<u8>),
}

/// One outbound HTTP exchange, fully specified by the caller.
///
/// The transport adds nothing: every header, including content type,
/// is listed here so recorded requests can be asserted against the wire
/// contract verbatim.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl WireRequest {
    /// Case-insensitive request header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The response as observed on the wire
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive response header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// One HTTP exchange. Implementations must not retry, redirect-rewrite,
/// or otherwise reinterpret the request; failures below the HTTP layer
/// surface as `PublishError::Network`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: WireRequest) -> Result<WireResponse>;
}

/// Production transport over reqwest.
///
/// Uses the client's default timeout behavior; the publication sequence
/// deliberately exposes no timeout override.
pub struct RestTransport {
    client: reqwest::Client,
}

impl RestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for RestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for RestTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse> {
        let mut builder = match request.method {
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match request.body {
            // Serialized here rather than via .json() so the content
            // type stays exactly what the request listed
            Body::Json(value) => builder.body(value.to_string()),
            Body::Bytes(bytes) => builder.body(bytes),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        Ok(WireResponse {
            status,
            headers,
            body,
        })
    }
}
